//! Consumer-side session model.
//!
//! A dashboard client holds one [`ClientSession`]: the bearer token it
//! attaches to every admin call plus the account snapshot returned with it.
//! The session renews itself at `refresh_after` seconds and is torn down the
//! moment a renewal (or any authenticated call) is rejected.

use chrono::Duration;
use ghost_core::types::Timestamp;
use ghost_db::models::admin::AdminResponse;
use serde::{Deserialize, Serialize};

/// Token grant returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// Seconds after issue at which the client should renew.
    pub refresh_after: i64,
    pub admin: AdminResponse,
}

/// Result of feeding a renewal attempt into [`ClientSession::complete_renewal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalOutcome {
    Renewed,
    SignedOut,
}

#[derive(Debug, Clone)]
struct Established {
    grant: TokenGrant,
    issued_at: Timestamp,
}

/// Locally held session state. Starts signed out.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    current: Option<Established>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a grant received at `now`, replacing any previous one.
    pub fn establish(&mut self, grant: TokenGrant, now: Timestamp) {
        self.current = Some(Established {
            grant,
            issued_at: now,
        });
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.grant.token.as_str())
    }

    pub fn account(&self) -> Option<&AdminResponse> {
        self.current.as_ref().map(|s| &s.grant.admin)
    }

    /// When the current token should be renewed.
    pub fn renewal_due_at(&self) -> Option<Timestamp> {
        self.current
            .as_ref()
            .map(|s| s.issued_at + Duration::seconds(s.grant.refresh_after))
    }

    pub fn needs_renewal(&self, now: Timestamp) -> bool {
        self.renewal_due_at().is_some_and(|due| now >= due)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| now >= s.issued_at + Duration::seconds(s.grant.expires_in))
    }

    /// Apply the result of a renewal call.
    ///
    /// Any failure signs the session out immediately; it is never retried.
    pub fn complete_renewal<E>(
        &mut self,
        outcome: Result<TokenGrant, E>,
        now: Timestamp,
    ) -> RenewalOutcome {
        match outcome {
            Ok(grant) => {
                self.establish(grant, now);
                RenewalOutcome::Renewed
            }
            Err(_) => {
                self.sign_out();
                RenewalOutcome::SignedOut
            }
        }
    }

    /// Discard the token and the account snapshot.
    pub fn sign_out(&mut self) {
        self.current = None;
    }
}
