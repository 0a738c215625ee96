//! Request nonces for replay protection.
//!
//! A nonce has two components, a creation timestamp and a random salt, and
//! travels on the wire as `{epoch_seconds}|{salt}`. Example:
//! `1563274782|dd550e6e-a7b8-11e9-a5bc-a5e48a057a56`.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::error::{AuthError, AuthResult, RejectionKind};

/// Minimum salt length in characters.
const SALT_MIN_LEN: usize = 10;

/// Maximum salt length in characters.
const SALT_MAX_LEN: usize = 40;

/// Upper bound for the nonce time-to-live.
const TTL_MAX: Duration = Duration::from_secs(3600);

/// Default time-to-live for freshly created nonces.
const DEFAULT_TTL: Duration = Duration::from_secs(2);

/// A single-use replay token with a bounded validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce {
    /// Creation time as unix epoch seconds.
    creation: u64,

    /// Random salt, 10 to 40 characters.
    salt: String,

    /// Time-to-live governing the expiry window.
    ttl: Duration,
}

impl Nonce {
    /// Create a fresh nonce with the default 2 second time-to-live and a
    /// random UUID salt.
    pub fn create() -> Self {
        Self {
            creation: now_epoch_seconds(),
            salt: Uuid::new_v4().to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Create a fresh nonce with a custom time-to-live.
    pub fn create_with_ttl(ttl: Duration) -> AuthResult<Self> {
        let nonce = Self {
            creation: now_epoch_seconds(),
            salt: Uuid::new_v4().to_string(),
            ttl,
        };
        nonce.check_invariants()?;
        Ok(nonce)
    }

    /// Shorthand for `Nonce::create().to_string()`.
    pub fn create_string() -> String {
        Self::create().to_string()
    }

    /// Parse a nonce from its wire form.
    ///
    /// The text must consist of exactly two `|`-separated parts, the first an
    /// integer epoch-seconds timestamp. The resulting nonce must satisfy the
    /// salt-length and ttl-range invariants.
    pub fn parse(text: &str, ttl: Duration) -> AuthResult<Self> {
        if text.is_empty() {
            return Err(format_error("the nonce string cannot be empty"));
        }

        let parts: Vec<&str> = text.split('|').collect();
        if parts.len() != 2 {
            return Err(format_error("use the format '{unix_timestamp}|{salt}'"));
        }

        let creation: u64 = parts[0]
            .parse()
            .map_err(|_| format_error("could not parse the nonce creation timestamp"))?;

        let nonce = Self {
            creation,
            salt: parts[1].to_string(),
            ttl,
        };
        nonce.check_invariants()?;
        Ok(nonce)
    }

    /// Creation time as unix epoch seconds.
    pub fn creation(&self) -> u64 {
        self.creation
    }

    /// The random salt component.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The time-to-live this nonce was parsed or created with.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the nonce has expired, relative to the current wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_epoch_seconds())
    }

    /// Whether the nonce has expired at the given instant (epoch seconds).
    ///
    /// The creation timestamp is attacker-controlled, so it is bounded on
    /// both sides of `now`: a creation more than one ttl in the past or in
    /// the future is rejected, as is any nonce past its own deadline. The
    /// symmetric window tolerates bounded clock skew in either direction.
    pub fn is_expired_at(&self, now: u64) -> bool {
        let ttl = self.ttl.as_secs();

        // Oldest acceptable creation time.
        let earliest = now.saturating_sub(ttl);
        // Latest acceptable creation time.
        let latest = now + ttl;
        // When the nonce itself expires.
        let deadline = self.creation.saturating_add(ttl);

        self.creation < earliest || self.creation > latest || now > deadline
    }

    fn check_invariants(&self) -> AuthResult<()> {
        let salt_len = self.salt.chars().count();
        if !(SALT_MIN_LEN..=SALT_MAX_LEN).contains(&salt_len) {
            return Err(format_error(
                "length of the nonce salt should be between 10 to 40 characters",
            ));
        }

        if self.ttl.is_zero() || self.ttl > TTL_MAX {
            return Err(format_error(
                "nonce ttl should be a positive non-zero value of at most 60 minutes",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.creation, self.salt)
    }
}

fn format_error(message: &str) -> AuthError {
    AuthError::rejected(RejectionKind::NonceFormat {
        message: message.to_string(),
    })
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
