//! Verifier-side session management.
//!
//! A server verifying many provers at once keeps one [`Verifier`] per
//! session. Sessions are opened with the prover's commitment, answered once,
//! and expire if the response never arrives.

use std::collections::HashMap;
use std::sync::Arc;

use rand_core::CryptoRngCore;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    Challenge, Commitment, Error, GroupParameters, Phase, ProtocolConfig, PublicKey, Response,
    Result, Verifier,
};

/// Session identifiers and per-session data.
pub mod state;

pub use state::SessionId;
use state::SessionData;

/// Concurrent registry of in-flight interactive proofs.
///
/// Cloning is cheap and clones share the same sessions.
#[derive(Clone)]
pub struct SessionManager {
    params: GroupParameters,
    config: ProtocolConfig,
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
}

impl SessionManager {
    /// Creates an empty manager.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `config` does not validate.
    pub fn new(params: GroupParameters, config: ProtocolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            params,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Opens a session for `public_key` and challenges `commitment`.
    ///
    /// # Errors
    ///
    /// - [`Error::Capacity`] if `max_sessions` sessions are open
    /// - [`Error::InvalidGroupElement`] if the key or commitment is invalid
    /// - [`Error::RandomnessUnavailable`] if sampling fails
    pub async fn open<R: CryptoRngCore>(
        &self,
        public_key: PublicKey,
        commitment: &Commitment,
        rng: &mut R,
    ) -> Result<(SessionId, Challenge)> {
        let max_sessions = self.config.sessions.max_sessions;
        if self.sessions.read().await.len() >= max_sessions {
            return Err(capacity_error(max_sessions));
        }

        let mut verifier = Verifier::with_config(self.params.clone(), public_key, &self.config)?;
        let challenge = verifier.challenge(rng, commitment)?;
        let session_id = SessionId::random(rng)?;
        let data = SessionData::new(verifier, self.config.sessions.expiry_seconds);

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= max_sessions {
            return Err(capacity_error(max_sessions));
        }
        sessions.insert(session_id.clone(), data);
        debug!(%session_id, "session opened");

        Ok((session_id, challenge))
    }

    /// Checks the response for `session_id`, closing the session.
    ///
    /// A session answers exactly once, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolOrder`] if the session is unknown, already used or expired
    /// - [`Error::VerificationFailed`] if the proof does not verify
    pub async fn complete(
        &self,
        session_id: &SessionId,
        commitment: &Commitment,
        response: &Response,
    ) -> Result<()> {
        let removed = self.sessions.write().await.remove(session_id);

        let mut data = match removed {
            Some(data) if !data.is_expired() => data,
            Some(_) => {
                warn!(%session_id, "response for expired session");
                return Err(unknown_session());
            }
            None => {
                warn!(%session_id, "response for unknown session");
                return Err(unknown_session());
            }
        };

        let outcome = data.verifier.verify(commitment, response);
        if outcome.is_ok() {
            info!(%session_id, "session verified");
        }
        outcome
    }

    /// Drops expired sessions, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired());
        let removed = before - sessions.len();

        if removed > 0 {
            info!(removed, "expired sessions cleaned up");
        }
        removed
    }

    /// Number of open sessions, expired ones included until cleaned up.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn capacity_error(max_sessions: usize) -> Error {
    Error::Capacity(format!(
        "Session manager has reached maximum capacity ({max_sessions})"
    ))
}

fn unknown_session() -> Error {
    Error::ProtocolOrder {
        expected: Phase::Challenged,
        actual: Phase::Init,
    }
}
