use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;

/// How long a challenge may sit unanswered before it is dead.
pub const CHALLENGE_TTL_SECS: i64 = 120;

#[derive(Debug, Clone)]
pub struct Challenge {
    pub challenger: serenity::UserId,
    pub challenged: serenity::UserId,
    pub stake: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    fn new(challenger: serenity::UserId, challenged: serenity::UserId, stake: i64) -> Self {
        let issued_at = Utc::now();
        Challenge {
            challenger,
            challenged,
            stake,
            issued_at,
            expires_at: issued_at + Duration::seconds(CHALLENGE_TTL_SECS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Pending two-party wagers, keyed by the (challenger, challenged) pair.
///
/// A new challenge for a pair supersedes any outstanding one, and an entry
/// past its expiry is never handed out. Expired entries are pruned whenever
/// the book is written to.
#[derive(Debug, Default)]
pub struct ChallengeBook {
    pending: RwLock<HashMap<(serenity::UserId, serenity::UserId), Challenge>>,
}

impl ChallengeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn propose(
        &self,
        challenger: serenity::UserId,
        challenged: serenity::UserId,
        stake: i64,
    ) {
        let mut pending = self.pending.write().await;
        pending.retain(|_, challenge| !challenge.is_expired());
        pending.insert(
            (challenger, challenged),
            Challenge::new(challenger, challenged, stake),
        );
    }

    /// Removes and returns the live challenge for the pair.
    ///
    /// Returns None for a pair with no entry, or whose entry has expired;
    /// either way nothing is left behind, so a second press on the same
    /// button pair resolves nothing.
    pub async fn take(
        &self,
        challenger: serenity::UserId,
        challenged: serenity::UserId,
    ) -> Option<Challenge> {
        let mut pending = self.pending.write().await;
        match pending.remove(&(challenger, challenged)) {
            Some(challenge) if !challenge.is_expired() => Some(challenge),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, challenge: Challenge) {
        let mut pending = self.pending.write().await;
        pending.insert((challenge.challenger, challenge.challenged), challenge);
    }
}
