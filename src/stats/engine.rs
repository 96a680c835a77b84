//! Read-only aggregate views over a finalized store: quick stats,
//! per-dimension breakdowns, and win/loss streaks. Every division
//! degrades to 0 on an empty denominator.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::state::BetStore;
use crate::types::{Bet, OddsBucket};

/// The export's settlement vocabulary drifted between "Won"/"Win" over
/// time; both count. Same for losses.
pub fn is_win(status: &str) -> bool {
    matches!(status.trim().to_ascii_lowercase().as_str(), "won" | "win")
}

pub fn is_loss(status: &str) -> bool {
    matches!(status.trim().to_ascii_lowercase().as_str(), "lost" | "lose")
}

// ---------------------------------------------------------------------------
// Quick stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuickStats {
    pub total_bets: usize,
    pub total_wagered: f64,
    /// Settled returns over winning bets.
    pub total_won: f64,
    pub profit_loss: f64,
    /// Percentage 0..100.
    pub win_rate: f64,
    /// Percentage; (returned - wagered) / wagered.
    pub roi: f64,
    /// Mean decimal odds over every leg of every bet.
    pub average_odds: f64,
    pub most_bet_sport: String,
    pub most_bet_player: String,
}

pub fn quick_stats(store: &BetStore) -> QuickStats {
    let total_bets = store.len();
    let total_wagered = store.metadata().total_wagered;

    let mut wins = 0usize;
    let mut total_won = 0.0;
    let mut total_returned = 0.0;
    let mut odds_sum = 0.0;
    let mut odds_count = 0usize;

    for bet in store.bets() {
        total_returned += bet.actual_payout;
        if is_win(&bet.status) {
            wins += 1;
            total_won += bet.actual_payout;
        }
        for leg in &bet.legs {
            odds_sum += leg.odds;
            odds_count += 1;
        }
    }

    let win_rate = if total_bets == 0 {
        0.0
    } else {
        wins as f64 / total_bets as f64 * 100.0
    };
    let roi = if total_wagered == 0.0 {
        0.0
    } else {
        (total_returned - total_wagered) / total_wagered * 100.0
    };
    let average_odds = if odds_count == 0 { 0.0 } else { odds_sum / odds_count as f64 };

    let most_bet_sport = most_frequent(store.sport_index().iter().map(|(k, v)| (k, v.len())));
    let most_bet_player = most_frequent(store.player_index().iter().map(|(k, v)| (k, v.len())));

    QuickStats {
        total_bets,
        total_wagered,
        total_won,
        profit_loss: total_won - total_wagered,
        win_rate,
        roi,
        average_odds,
        most_bet_sport,
        most_bet_player,
    }
}

/// Largest bucket wins; ties go to the first key in iteration order,
/// which is sorted and therefore deterministic.
fn most_frequent<'a>(buckets: impl Iterator<Item = (&'a String, usize)>) -> String {
    let mut best_key = String::new();
    let mut best_count = 0usize;
    for (key, count) in buckets {
        if count > best_count {
            best_count = count;
            best_key = key.clone();
        }
    }
    best_key
}

// ---------------------------------------------------------------------------
// Per-dimension breakdowns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct DimensionStats {
    pub bets: usize,
    pub wins: usize,
    pub wagered: f64,
    pub won: f64,
    pub profit_loss: f64,
    pub win_rate: f64,
}

/// Aggregates per bucket key. `by_month` iterates in ascending calendar
/// order; the other dimensions are sorted by key as a side effect of the
/// map type, which no caller should rely on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Breakdowns {
    pub by_month: BTreeMap<String, DimensionStats>,
    pub by_sport: BTreeMap<String, DimensionStats>,
    pub by_player: BTreeMap<String, DimensionStats>,
    pub by_prop_type: BTreeMap<String, DimensionStats>,
    pub by_odds_bucket: BTreeMap<String, DimensionStats>,
}

pub fn breakdowns(store: &BetStore) -> Breakdowns {
    let mut out = Breakdowns::default();

    for bet in store.bets() {
        let won_amount = if is_win(&bet.status) { bet.actual_payout } else { 0.0 };

        if let Some(t) = bet.placed_at.instant() {
            tally(&mut out.by_month, t.format("%Y-%m").to_string(), bet, won_amount);
        }
        tally(&mut out.by_sport, bet.sport.clone(), bet, won_amount);

        // A bet counts once per distinct key even when several legs share
        // a player, prop type, or odds bucket.
        let players: BTreeSet<&str> = bet
            .legs
            .iter()
            .map(|l| l.player.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        for player in players {
            tally(&mut out.by_player, player.to_string(), bet, won_amount);
        }
        let props: BTreeSet<&str> = bet
            .legs
            .iter()
            .map(|l| l.prop_type.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        for prop in props {
            tally(&mut out.by_prop_type, prop.to_string(), bet, won_amount);
        }
        let buckets: BTreeSet<String> = bet
            .legs
            .iter()
            .map(|l| OddsBucket::from_odds(l.odds).to_string())
            .collect();
        for bucket in buckets {
            tally(&mut out.by_odds_bucket, bucket, bet, won_amount);
        }
    }

    for dimension in [
        &mut out.by_month,
        &mut out.by_sport,
        &mut out.by_player,
        &mut out.by_prop_type,
        &mut out.by_odds_bucket,
    ] {
        for entry in dimension.values_mut() {
            entry.profit_loss = entry.won - entry.wagered;
            entry.win_rate = if entry.bets == 0 {
                0.0
            } else {
                entry.wins as f64 / entry.bets as f64 * 100.0
            };
        }
    }

    out
}

fn tally(map: &mut BTreeMap<String, DimensionStats>, key: String, bet: &Bet, won_amount: f64) {
    let entry = map.entry(key).or_default();
    entry.bets += 1;
    entry.wagered += bet.wager;
    entry.won += won_amount;
    if is_win(&bet.status) {
        entry.wins += 1;
    }
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

/// Win/loss streaks over settled bets in placement order. `current` is
/// positive for an active win streak, negative for a loss streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub longest_win: usize,
    pub longest_loss: usize,
    pub current: i64,
}

/// Bets without a parsed placement time have no defined position in the
/// sequence and are excluded, as are unsettled statuses.
pub fn streaks(store: &BetStore) -> Streaks {
    let mut settled: Vec<&Bet> = store
        .bets()
        .filter(|b| b.placed_at.is_parsed() && (is_win(&b.status) || is_loss(&b.status)))
        .collect();
    settled.sort_by(|a, b| {
        (a.placed_at.instant(), &a.id).cmp(&(b.placed_at.instant(), &b.id))
    });

    let mut run: i64 = 0;
    let mut longest_win = 0usize;
    let mut longest_loss = 0usize;
    for bet in settled {
        if is_win(&bet.status) {
            run = if run > 0 { run + 1 } else { 1 };
            longest_win = longest_win.max(run as usize);
        } else {
            run = if run < 0 { run - 1 } else { -1 };
            longest_loss = longest_loss.max((-run) as usize);
        }
    }

    Streaks { longest_win, longest_loss, current: run }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
