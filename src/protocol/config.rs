use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::{Error, GroupParameters, Result};

/// Largest challenge space (in bits) a configuration may request.
const MAX_CHALLENGE_BITS: u32 = 4096;

/// How the response `s = r + c*x` is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseReduction {
    /// Plain integer `r + c*x`. Its magnitude reveals the size of `r`.
    #[default]
    None,
    /// `r + c*x mod n`, `n` being the exponent modulus.
    ModOrder,
}

impl ResponseReduction {
    /// Applies the reduction to a raw response.
    pub fn apply(self, params: &GroupParameters, s: BigUint) -> BigUint {
        match self {
            ResponseReduction::None => s,
            ResponseReduction::ModOrder => s % params.exponent_modulus(),
        }
    }
}

/// Limits for the verifier-side session manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionLimits {
    /// Maximum number of concurrently open sessions.
    pub max_sessions: usize,
    /// Seconds a session stays valid after its challenge is issued.
    pub expiry_seconds: u64,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 50_000,
            expiry_seconds: 300,
        }
    }
}

/// Protocol configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Reduction applied to interactive responses. Signatures are always
    /// reduced.
    pub response_reduction: ResponseReduction,
    /// Narrows interactive challenges to `[0, 2^bits)`; `None` uses the full
    /// exponent modulus.
    pub challenge_bits: Option<u32>,
    /// Session manager limits.
    pub sessions: SessionLimits,
}

impl ProtocolConfig {
    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `SCHNORR_` prefix, `__` separating nested keys
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `SCHNORR_CONFIG_PATH`. If not set,
    /// defaults to `./config/schnorr.toml`. A missing file is skipped.
    ///
    /// # Environment Variable Examples
    /// ```bash
    /// SCHNORR_RESPONSE_REDUCTION=mod_order
    /// SCHNORR_CHALLENGE_BITS=128
    /// SCHNORR_SESSIONS__MAX_SESSIONS=1000
    /// SCHNORR_SESSIONS__EXPIRY_SECONDS=60
    /// ```
    pub fn from_env() -> Result<Self> {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        let _ = dotenvy::dotenv();

        let config_path = std::env::var("SCHNORR_CONFIG_PATH")
            .unwrap_or_else(|_| "config/schnorr.toml".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("SCHNORR_").ignore(&["config_path"]).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.check_challenge_bits()?;

        if self.sessions.max_sessions == 0 {
            return Err(Error::Config("sessions.max_sessions must be positive".to_string()));
        }

        Ok(())
    }

    fn check_challenge_bits(&self) -> Result<()> {
        if let Some(bits) = self.challenge_bits {
            if bits == 0 || bits > MAX_CHALLENGE_BITS {
                return Err(Error::Config(format!(
                    "challenge_bits must be in 1..={MAX_CHALLENGE_BITS}, got {bits}"
                )));
            }
        }
        Ok(())
    }

    /// Exclusive upper bound for interactive challenges under `params`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `challenge_bits` is out of range or the bound
    /// would leave fewer than two challenges.
    pub fn challenge_bound(&self, params: &GroupParameters) -> Result<BigUint> {
        self.check_challenge_bits()?;

        let n = params.exponent_modulus();
        let bound = match self.challenge_bits {
            Some(bits) => (BigUint::one() << bits).min(n),
            None => n,
        };

        if bound < BigUint::from(2u32) {
            return Err(Error::Config("challenge bound must be at least 2".to_string()));
        }
        Ok(bound)
    }
}
