//! Stateful grouping of raw rows into parent bets and their legs.
//!
//! The export writes a parent row per bet slip followed by one row per
//! leg. The assembler is `Idle` until a parent row opens a bet, appends
//! leg rows to it, and freezes the bet when the next parent row arrives
//! or the input ends. Leg rows seen while `Idle` have no parent to join
//! and are dropped (counted, not an error).

mod classifier;

pub use classifier::{build_leg, classify, default_team, split_player_prop, RowKind};

use tracing::debug;

use crate::config::columns;
use crate::extract::RawRow;
use crate::normalize;
use crate::timestamp::TimestampParser;
use crate::types::{Bet, BetLeg, PlacedAt};

/// A finalized bet plus the source line of the row that opened it, for
/// diagnostics when the bet turns out to be unusable (no slip id).
#[derive(Debug)]
pub struct AssembledBet {
    pub bet: Bet,
    pub opened_line: usize,
}

struct InProgress {
    bet: Bet,
    /// Leg derived from the parent row itself. Used only when no leg
    /// rows follow: a single bet's one leg lives on its parent row.
    seed_leg: Option<BetLeg>,
    opened_line: usize,
}

#[derive(Default)]
pub struct RecordAssembler {
    parser: TimestampParser,
    current: Option<InProgress>,
    orphan_legs: usize,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one row in input order. Returns the previously accumulating
    /// bet when this row closes it.
    pub fn push(&mut self, row: &RawRow) -> Option<AssembledBet> {
        match classify(row, &self.parser) {
            RowKind::Parent => self.open(row),
            RowKind::Leg => {
                match self.current.as_mut() {
                    Some(open) => {
                        let leg = build_leg(row, &open.bet.sport, &open.bet.league, &self.parser);
                        open.bet.legs.push(leg);
                        fill_missing_scalars(&mut open.bet, row);
                    }
                    None => {
                        debug!(line = row.line, "leg row with no open bet, dropped");
                        self.orphan_legs += 1;
                    }
                }
                None
            }
            RowKind::Blank => None,
        }
    }

    /// End of input: freeze and emit whatever is still accumulating.
    pub fn finish(&mut self) -> Option<AssembledBet> {
        self.current.take().map(finalize)
    }

    pub fn orphan_legs(&self) -> usize {
        self.orphan_legs
    }

    fn open(&mut self, row: &RawRow) -> Option<AssembledBet> {
        let emitted = self.current.take().map(finalize);

        let date_text = row.text(columns::DATE_PLACED);
        let placed_at = match self.parser.parse(date_text) {
            Ok(t) => PlacedAt::Parsed(t),
            Err(_) => PlacedAt::Unparsed(date_text.to_string()),
        };

        let league = normalize::text(row.get(columns::LEAGUE));
        let sport = if league.is_empty() { "Unknown".to_string() } else { league.clone() };

        let bet = Bet {
            id: normalize::text(row.get(columns::BET_SLIP_ID)),
            placed_at,
            sport: sport.clone(),
            league,
            status: row.text(columns::STATUS).to_string(),
            wager: normalize::numeric(row.text(columns::WAGER)),
            potential_payout: normalize::numeric(row.text(columns::POTENTIAL_PAYOUT)),
            actual_payout: normalize::numeric(row.text(columns::PAYOUT)),
            winnings: normalize::numeric(row.text(columns::WINNINGS)),
            leg_count: 0,
            legs: Vec::new(),
        };

        // The parent row often carries the whole bet for singles.
        let has_market_text = !row.text(columns::BET_TYPE).trim().is_empty()
            || !row.text(columns::MARKET).trim().is_empty();
        let seed_leg =
            has_market_text.then(|| build_leg(row, &sport, &bet.league, &self.parser));

        self.current = Some(InProgress { bet, seed_leg, opened_line: row.line });
        emitted
    }
}

/// First-non-empty-wins backfill: a later row may supply a scalar the
/// opening row left blank, but never replaces a value already present.
fn fill_missing_scalars(bet: &mut Bet, row: &RawRow) {
    if bet.id.is_empty() {
        bet.id = normalize::text(row.get(columns::BET_SLIP_ID));
    }
    if bet.status.trim().is_empty() {
        bet.status = row.text(columns::STATUS).to_string();
    }
    if bet.league.is_empty() {
        bet.league = normalize::text(row.get(columns::LEAGUE));
        if bet.sport == "Unknown" && !bet.league.is_empty() {
            bet.sport = bet.league.clone();
        }
    }
    if bet.wager == 0.0 {
        bet.wager = normalize::numeric(row.text(columns::WAGER));
    }
    if bet.potential_payout == 0.0 {
        bet.potential_payout = normalize::numeric(row.text(columns::POTENTIAL_PAYOUT));
    }
    if bet.actual_payout == 0.0 {
        bet.actual_payout = normalize::numeric(row.text(columns::PAYOUT));
    }
    if bet.winnings == 0.0 {
        bet.winnings = normalize::numeric(row.text(columns::WINNINGS));
    }
}

fn finalize(open: InProgress) -> AssembledBet {
    let InProgress { mut bet, seed_leg, opened_line } = open;
    if bet.legs.is_empty() {
        if let Some(leg) = seed_leg {
            bet.legs.push(leg);
        }
    }
    bet.leg_count = bet.legs.len();
    AssembledBet { bet, opened_line }
}
