use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Seconds between successful daily claims.
pub const DAILY_WINDOW_SECS: i64 = 86_400;
/// Seconds between successful work claims.
pub const WORK_WINDOW_SECS: i64 = 3_600;
/// Fixed payout of the daily claim.
pub const DAILY_REWARD: i64 = 100;
/// Inclusive bounds of the random work payout.
pub const WORK_REWARD_MIN: i64 = 1;
pub const WORK_REWARD_MAX: i64 = 50;

/// Per-user ledger record. Field names stay camelCase on disk so ledger
/// files written by earlier versions of the bot load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub balance: i64,
    pub last_daily: i64,
    pub last_work: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconomyError {
    #[error("claim is on cooldown for another {remaining}s")]
    CooldownActive { remaining: i64 },

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: i64, needed: i64 },
}

/// Result of a successful daily/work claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub reward: i64,
    pub new_balance: i64,
}

/// In-memory account map mirrored to a JSON file after every mutation.
///
/// All mutating operations validate, apply, and persist under a single
/// write guard, so overlapping commands cannot interleave between the
/// balance check and the balance update.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    accounts: RwLock<HashMap<String, Account>>,
}

impl Ledger {
    /// Loads the ledger file, or starts empty if it does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let accounts: HashMap<String, Account> = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        info!("Loaded economy ledger with {} accounts", accounts.len());

        Ok(Ledger {
            path,
            accounts: RwLock::new(accounts),
        })
    }

    pub async fn balance(&self, user_id: &str) -> i64 {
        let accounts = self.accounts.read().await;
        accounts.get(user_id).map_or(0, |a| a.balance)
    }

    /// Returns the user's account, or a zero-value default for unknown users.
    pub async fn account(&self, user_id: &str) -> Account {
        let accounts = self.accounts.read().await;
        accounts.get(user_id).cloned().unwrap_or_default()
    }

    /// Whether the user could put `stake` coins at risk right now.
    pub async fn can_cover(&self, user_id: &str, stake: i64) -> bool {
        stake > 0 && self.balance(user_id).await >= stake
    }

    pub async fn claim_daily(&self, user_id: &str, now: i64) -> Result<Claim, EconomyError> {
        let mut accounts = self.accounts.write().await;

        let elapsed = now - accounts.get(user_id).map_or(0, |a| a.last_daily);
        if elapsed < DAILY_WINDOW_SECS {
            return Err(EconomyError::CooldownActive {
                remaining: DAILY_WINDOW_SECS - elapsed,
            });
        }

        let account = accounts.entry(user_id.to_string()).or_default();
        account.balance += DAILY_REWARD;
        account.last_daily = now;
        let claim = Claim {
            reward: DAILY_REWARD,
            new_balance: account.balance,
        };

        self.persist(&accounts);
        Ok(claim)
    }

    /// Credits a work payout the caller has already drawn (uniform 1-50).
    pub async fn claim_work(
        &self,
        user_id: &str,
        now: i64,
        reward: i64,
    ) -> Result<Claim, EconomyError> {
        let mut accounts = self.accounts.write().await;

        let elapsed = now - accounts.get(user_id).map_or(0, |a| a.last_work);
        if elapsed < WORK_WINDOW_SECS {
            return Err(EconomyError::CooldownActive {
                remaining: WORK_WINDOW_SECS - elapsed,
            });
        }

        let account = accounts.entry(user_id.to_string()).or_default();
        account.balance += reward;
        account.last_work = now;
        let claim = Claim {
            reward,
            new_balance: account.balance,
        };

        self.persist(&accounts);
        Ok(claim)
    }

    /// Applies the signed payout of a single-shot wager.
    ///
    /// The stake is validated against the current balance before anything is
    /// touched; a rejected bet leaves both memory and file unchanged.
    pub async fn settle_bet(
        &self,
        user_id: &str,
        bet: i64,
        payout: i64,
    ) -> Result<i64, EconomyError> {
        if bet <= 0 {
            return Err(EconomyError::NonPositiveAmount(bet));
        }
        debug_assert!(payout >= -bet);

        let mut accounts = self.accounts.write().await;

        let balance = accounts.get(user_id).map_or(0, |a| a.balance);
        if balance < bet {
            return Err(EconomyError::InsufficientBalance {
                balance,
                needed: bet,
            });
        }

        let account = accounts.entry(user_id.to_string()).or_default();
        account.balance += payout;
        let new_balance = account.balance;

        self.persist(&accounts);
        Ok(new_balance)
    }

    /// Moves coins between two users. The recipient account is created
    /// lazily; the sender must already cover the amount.
    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
    ) -> Result<(i64, i64), EconomyError> {
        if amount <= 0 {
            return Err(EconomyError::NonPositiveAmount(amount));
        }

        let mut accounts = self.accounts.write().await;

        let from_balance = accounts.get(from).map_or(0, |a| a.balance);
        if from_balance < amount {
            return Err(EconomyError::InsufficientBalance {
                balance: from_balance,
                needed: amount,
            });
        }

        accounts.entry(from.to_string()).or_default().balance -= amount;
        let recipient = accounts.entry(to.to_string()).or_default();
        recipient.balance += amount;
        let to_balance = recipient.balance;

        self.persist(&accounts);
        Ok((from_balance - amount, to_balance))
    }

    /// Settles an accepted challenge: the stake moves loser -> winner.
    ///
    /// Both balances are re-validated here because either side may have
    /// spent coins between the proposal and the acceptance.
    pub async fn settle_duel(
        &self,
        winner: &str,
        loser: &str,
        stake: i64,
    ) -> Result<(i64, i64), EconomyError> {
        if stake <= 0 {
            return Err(EconomyError::NonPositiveAmount(stake));
        }

        let mut accounts = self.accounts.write().await;

        for id in [winner, loser] {
            let balance = accounts.get(id).map_or(0, |a| a.balance);
            if balance < stake {
                return Err(EconomyError::InsufficientBalance {
                    balance,
                    needed: stake,
                });
            }
        }

        let winner_account = accounts.entry(winner.to_string()).or_default();
        winner_account.balance += stake;
        let winner_balance = winner_account.balance;

        let loser_account = accounts.entry(loser.to_string()).or_default();
        loser_account.balance -= stake;
        let loser_balance = loser_account.balance;

        self.persist(&accounts);
        Ok((winner_balance, loser_balance))
    }

    // Full-map mirror to disk. A failed write is logged and swallowed: the
    // in-memory state stays authoritative for the running process.
    fn persist(&self, accounts: &HashMap<String, Account>) {
        match serde_json::to_string_pretty(accounts) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    error!("Failed to save economy ledger to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => error!("Failed to serialize economy ledger: {}", e),
        }
    }

    #[cfg(test)]
    pub(crate) async fn snapshot(&self) -> HashMap<String, Account> {
        self.accounts.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ledger(name: &str) -> Ledger {
        let path = std::env::temp_dir().join(format!(
            "economy-bot-test-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        Ledger::load(path).unwrap()
    }

    #[tokio::test]
    async fn unknown_user_defaults_to_zero() {
        let ledger = temp_ledger("zero-default");
        assert_eq!(ledger.balance("42").await, 0);
        assert_eq!(ledger.account("42").await, Account::default());
    }

    #[tokio::test]
    async fn daily_claim_credits_and_stamps() {
        let ledger = temp_ledger("daily-credit");
        let claim = ledger.claim_daily("1", 1_000_000).await.unwrap();
        assert_eq!(claim.reward, DAILY_REWARD);
        assert_eq!(claim.new_balance, DAILY_REWARD);

        let account = ledger.account("1").await;
        assert_eq!(account.balance, DAILY_REWARD);
        assert_eq!(account.last_daily, 1_000_000);
    }

    #[tokio::test]
    async fn daily_claim_rejects_inside_window() {
        let ledger = temp_ledger("daily-window");
        ledger.claim_daily("1", 1_000_000).await.unwrap();

        let err = ledger
            .claim_daily("1", 1_000_000 + DAILY_WINDOW_SECS - 1)
            .await
            .unwrap_err();
        assert_eq!(err, EconomyError::CooldownActive { remaining: 1 });

        // Rejection leaves the account untouched.
        let account = ledger.account("1").await;
        assert_eq!(account.balance, DAILY_REWARD);
        assert_eq!(account.last_daily, 1_000_000);

        // Exactly one success per rolling window.
        let claim = ledger
            .claim_daily("1", 1_000_000 + DAILY_WINDOW_SECS)
            .await
            .unwrap();
        assert_eq!(claim.new_balance, 2 * DAILY_REWARD);
    }

    #[tokio::test]
    async fn work_claim_credits_drawn_reward() {
        let ledger = temp_ledger("work-credit");
        let claim = ledger.claim_work("1", 5_000, 37).await.unwrap();
        assert_eq!(claim.reward, 37);
        assert_eq!(claim.new_balance, 37);

        let err = ledger.claim_work("1", 5_000 + 10, 12).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::CooldownActive {
                remaining: WORK_WINDOW_SECS - 10
            }
        );
        assert_eq!(ledger.balance("1").await, 37);

        let claim = ledger
            .claim_work("1", 5_000 + WORK_WINDOW_SECS, 12)
            .await
            .unwrap();
        assert_eq!(claim.new_balance, 49);
    }

    #[tokio::test]
    async fn settle_bet_applies_signed_payout() {
        let ledger = temp_ledger("bet-payout");
        ledger.claim_daily("1", 1_000_000).await.unwrap();

        // Win: +bet.
        assert_eq!(ledger.settle_bet("1", 40, 40).await.unwrap(), 140);
        // Loss: -bet.
        assert_eq!(ledger.settle_bet("1", 40, -40).await.unwrap(), 100);
        // Number-bet jackpot: +bet*5.
        assert_eq!(ledger.settle_bet("1", 20, 100).await.unwrap(), 200);
    }

    #[tokio::test]
    async fn rejected_bets_never_mutate_state() {
        let ledger = temp_ledger("bet-reject");
        ledger.claim_daily("1", 1_000_000).await.unwrap();
        let before = ledger.snapshot().await;

        let err = ledger.settle_bet("1", 0, 0).await.unwrap_err();
        assert_eq!(err, EconomyError::NonPositiveAmount(0));

        let err = ledger.settle_bet("1", -5, 5).await.unwrap_err();
        assert_eq!(err, EconomyError::NonPositiveAmount(-5));

        let err = ledger.settle_bet("1", 101, 101).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBalance {
                balance: 100,
                needed: 101
            }
        );

        // A user with no account cannot bet at all.
        let err = ledger.settle_bet("2", 1, 1).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBalance {
                balance: 0,
                needed: 1
            }
        );

        assert_eq!(ledger.snapshot().await, before);
    }

    #[tokio::test]
    async fn transfer_moves_coins_and_creates_recipient() {
        let ledger = temp_ledger("transfer");
        ledger.claim_daily("1", 1_000_000).await.unwrap();

        let (from, to) = ledger.transfer("1", "2", 30).await.unwrap();
        assert_eq!((from, to), (70, 30));
        assert_eq!(ledger.balance("2").await, 30);

        let err = ledger.transfer("1", "2", 71).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBalance {
                balance: 70,
                needed: 71
            }
        );
        assert_eq!(ledger.balance("1").await, 70);
        assert_eq!(ledger.balance("2").await, 30);
    }

    #[tokio::test]
    async fn duel_settlement_conserves_the_pair_total() {
        let ledger = temp_ledger("duel");
        ledger.claim_daily("1", 1_000_000).await.unwrap();
        ledger.claim_daily("2", 1_000_000).await.unwrap();

        let (winner, loser) = ledger.settle_duel("1", "2", 60).await.unwrap();
        assert_eq!((winner, loser), (160, 40));
        assert_eq!(
            ledger.balance("1").await + ledger.balance("2").await,
            200
        );
    }

    #[tokio::test]
    async fn duel_rejects_when_either_side_cannot_cover() {
        let ledger = temp_ledger("duel-reject");
        ledger.claim_daily("1", 1_000_000).await.unwrap();
        ledger.claim_daily("2", 1_000_000).await.unwrap();
        ledger.settle_bet("2", 80, -80).await.unwrap();

        // Loser side (balance 20) cannot cover 50.
        let err = ledger.settle_duel("1", "2", 50).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBalance {
                balance: 20,
                needed: 50
            }
        );
        assert_eq!(ledger.balance("1").await, 100);
        assert_eq!(ledger.balance("2").await, 20);

        // Winner side short works the same way.
        let err = ledger.settle_duel("2", "1", 50).await.unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientBalance {
                balance: 20,
                needed: 50
            }
        );
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let path = std::env::temp_dir().join(format!(
            "economy-bot-test-{}-roundtrip.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let ledger = Ledger::load(&path).unwrap();
        ledger.claim_daily("1", 1_000_000).await.unwrap();
        ledger.claim_work("2", 5_000, 25).await.unwrap();
        ledger.transfer("1", "3", 10).await.unwrap();
        let expected = ledger.snapshot().await;
        drop(ledger);

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.snapshot().await, expected);
    }

    #[tokio::test]
    async fn file_matches_memory_after_mutation() {
        let path = std::env::temp_dir().join(format!(
            "economy-bot-test-{}-mirror.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let ledger = Ledger::load(&path).unwrap();
        ledger.claim_daily("1", 1_000_000).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let on_disk: HashMap<String, Account> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, ledger.snapshot().await);
    }

    #[tokio::test]
    async fn legacy_ledger_files_load() {
        let path = std::env::temp_dir().join(format!(
            "economy-bot-test-{}-legacy.json",
            std::process::id()
        ));
        // Shape written by the original bot, including the retired
        // lastFightBet field.
        std::fs::write(
            &path,
            r#"{"123":{"balance":250,"lastDaily":1700000000,"lastWork":0,"lastFightBet":50}}"#,
        )
        .unwrap();

        let ledger = Ledger::load(&path).unwrap();
        let account = ledger.account("123").await;
        assert_eq!(account.balance, 250);
        assert_eq!(account.last_daily, 1_700_000_000);
        assert_eq!(account.last_work, 0);
    }
}
