//! Outcome and payout rules for the single-shot wager games.
//!
//! Everything here is pure over an `impl Rng` so the command handlers can
//! pass `thread_rng()` and the tests a seeded `StdRng`.

use std::fmt;

use rand::Rng;

/// Multiplier on a correct number-bet pick.
pub const NUMBER_BET_MULTIPLIER: i64 = 5;
/// Inclusive range of the number bet.
pub const NUMBER_BET_MIN: i64 = 1;
pub const NUMBER_BET_MAX: i64 = 10;

/// The slot machine's symbol alphabet.
pub const SLOT_SYMBOLS: [&str; 5] = ["\u{1F352}", "\u{1F34A}", "\u{1F514}", "\u{1F48E}", "\u{1F4B0}"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum CoinSide {
    #[name = "Heads"]
    Heads,
    #[name = "Tails"]
    Tails,
}

impl CoinSide {
    pub fn flip(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

/// Signed payout of a coinflip: match pays +bet, miss pays -bet.
pub fn coinflip_payout(choice: CoinSide, outcome: CoinSide, bet: i64) -> i64 {
    if choice == outcome {
        bet
    } else {
        -bet
    }
}

pub fn draw_winning_number(rng: &mut impl Rng) -> i64 {
    rng.gen_range(NUMBER_BET_MIN..=NUMBER_BET_MAX)
}

/// Signed payout of a number bet: a correct pick pays +bet*5, a miss -bet.
pub fn number_bet_payout(pick: i64, winning: i64, bet: i64) -> i64 {
    if pick == winning {
        bet * NUMBER_BET_MULTIPLIER
    } else {
        -bet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// All three reels equal.
    Jackpot,
    /// Exactly two reels equal.
    Pair,
    /// All reels distinct.
    Bust,
}

/// One pull of the slot machine: three independent symbol draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpin {
    pub reels: [usize; 3],
}

impl SlotSpin {
    pub fn spin(rng: &mut impl Rng) -> Self {
        let mut reels = [0usize; 3];
        for reel in &mut reels {
            *reel = rng.gen_range(0..SLOT_SYMBOLS.len());
        }
        SlotSpin { reels }
    }

    pub fn outcome(&self) -> SlotOutcome {
        let [a, b, c] = self.reels;
        if a == b && b == c {
            SlotOutcome::Jackpot
        } else if a == b || b == c || a == c {
            SlotOutcome::Pair
        } else {
            SlotOutcome::Bust
        }
    }

    /// Signed payout: jackpot +bet*3, pair +bet*1.5 (floored; balances are
    /// whole coins), bust -bet.
    pub fn payout(&self, bet: i64) -> i64 {
        match self.outcome() {
            SlotOutcome::Jackpot => bet * 3,
            SlotOutcome::Pair => bet * 3 / 2,
            SlotOutcome::Bust => -bet,
        }
    }
}

impl fmt::Display for SlotSpin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.reels;
        write!(
            f,
            "[ {} | {} | {} ]",
            SLOT_SYMBOLS[a], SLOT_SYMBOLS[b], SLOT_SYMBOLS[c]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn coinflip_pays_plus_or_minus_bet() {
        assert_eq!(coinflip_payout(CoinSide::Heads, CoinSide::Heads, 40), 40);
        assert_eq!(coinflip_payout(CoinSide::Heads, CoinSide::Tails, 40), -40);
        assert_eq!(coinflip_payout(CoinSide::Tails, CoinSide::Tails, 7), 7);
    }

    #[test]
    fn number_bet_pays_five_to_one() {
        assert_eq!(number_bet_payout(3, 3, 20), 100);
        assert_eq!(number_bet_payout(3, 4, 20), -20);
    }

    #[test]
    fn winning_numbers_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let n = draw_winning_number(&mut rng);
            assert!((NUMBER_BET_MIN..=NUMBER_BET_MAX).contains(&n));
        }
    }

    #[test]
    fn slot_payout_rules_hold_for_every_reel_combination() {
        for a in 0..SLOT_SYMBOLS.len() {
            for b in 0..SLOT_SYMBOLS.len() {
                for c in 0..SLOT_SYMBOLS.len() {
                    let spin = SlotSpin { reels: [a, b, c] };
                    let distinct =
                        [a, b, c].iter().collect::<std::collections::HashSet<_>>().len();
                    let expected = match distinct {
                        1 => 30,
                        2 => 15,
                        _ => -10,
                    };
                    assert_eq!(spin.payout(10), expected, "reels {:?}", [a, b, c]);
                }
            }
        }
    }

    #[test]
    fn pair_payout_floors_on_odd_bets() {
        let spin = SlotSpin { reels: [2, 2, 4] };
        assert_eq!(spin.outcome(), SlotOutcome::Pair);
        assert_eq!(spin.payout(5), 7);
    }

    #[test]
    fn spins_draw_each_reel_independently() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_mixed = false;
        for _ in 0..100 {
            let spin = SlotSpin::spin(&mut rng);
            for reel in spin.reels {
                assert!(reel < SLOT_SYMBOLS.len());
            }
            if spin.outcome() != SlotOutcome::Jackpot {
                saw_mixed = true;
            }
        }
        // A copied single draw would make every spin a jackpot.
        assert!(saw_mixed);
    }

    #[test]
    fn coin_flips_land_on_both_sides() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut heads = 0;
        let mut tails = 0;
        for _ in 0..200 {
            match CoinSide::flip(&mut rng) {
                CoinSide::Heads => heads += 1,
                CoinSide::Tails => tails += 1,
            }
        }
        assert!(heads > 0 && tails > 0);
    }
}
