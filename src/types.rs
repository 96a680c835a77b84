use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Placement timestamp
// ---------------------------------------------------------------------------

/// Placement time of a bet. The export's timestamp text does not always
/// parse; such records keep the raw text instead of a fabricated time, and
/// the date indices / date range simply skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PlacedAt {
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl PlacedAt {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            PlacedAt::Parsed(t) => Some(*t),
            PlacedAt::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, PlacedAt::Parsed(_))
    }
}

// ---------------------------------------------------------------------------
// Leg result
// ---------------------------------------------------------------------------

/// Settled outcome of a single leg. The export is inconsistent between
/// "Win"/"Won" and "Lose"/"Lost", so both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegResult {
    Win,
    Lose,
    Unresolved,
}

impl LegResult {
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "win" | "won" => LegResult::Win,
            "lose" | "lost" => LegResult::Lose,
            _ => LegResult::Unresolved,
        }
    }
}

impl std::fmt::Display for LegResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LegResult::Win => "win",
            LegResult::Lose => "lose",
            LegResult::Unresolved => "unresolved",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Market / bet classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCategory {
    OverUnder,
    YesNo,
    Anytime,
    Other,
}

impl MarketCategory {
    /// Classify the market text ("Over 249.5", "Yes", "Anytime TD Scorer").
    /// Yes/No matches whole leading words only — plenty of team names
    /// contain "no" as a substring.
    pub fn from_market(text: &str) -> Self {
        let lower = text.trim().to_ascii_lowercase();
        if lower.contains("over") || lower.contains("under") {
            MarketCategory::OverUnder
        } else if lower.contains("anytime") {
            MarketCategory::Anytime
        } else if lower == "yes"
            || lower == "no"
            || lower.starts_with("yes ")
            || lower.starts_with("no ")
        {
            MarketCategory::YesNo
        } else {
            MarketCategory::Other
        }
    }
}

impl std::fmt::Display for MarketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MarketCategory::OverUnder => "over_under",
            MarketCategory::YesNo => "yes_no",
            MarketCategory::Anytime => "anytime",
            MarketCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetCategory {
    Rushing,
    Passing,
    Receiving,
    Touchdown,
    Defense,
    Other,
}

impl BetCategory {
    /// Classify from the combined bet-type + market text. Checked in
    /// priority order so "Passing Touchdowns" lands on Passing while
    /// "Anytime Touchdown Scorer" lands on Touchdown.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        if lower.contains("rush") {
            BetCategory::Rushing
        } else if lower.contains("pass") {
            BetCategory::Passing
        } else if lower.contains("receiv") || lower.contains("reception") {
            BetCategory::Receiving
        } else if lower.contains("touchdown") || lower.contains(" td") {
            BetCategory::Touchdown
        } else if lower.contains("defens")
            || lower.contains("sack")
            || lower.contains("tackle")
            || lower.contains("interception")
        {
            BetCategory::Defense
        } else {
            BetCategory::Other
        }
    }
}

impl std::fmt::Display for BetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BetCategory::Rushing => "rushing",
            BetCategory::Passing => "passing",
            BetCategory::Receiving => "receiving",
            BetCategory::Touchdown => "touchdown",
            BetCategory::Defense => "defense",
            BetCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Odds buckets
// ---------------------------------------------------------------------------

/// Fixed decimal-odds ranges used by the per-leg odds index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsBucket {
    /// odds < 1.5
    Short,
    /// 1.5 – 2.0
    Even,
    /// 2.0 – 3.0
    Mid,
    /// 3.0 – 5.0
    Long,
    /// >= 5.0
    VeryLong,
}

impl OddsBucket {
    pub fn from_odds(odds: f64) -> Self {
        use crate::config::odds_buckets::*;
        if odds < SHORT_MAX {
            OddsBucket::Short
        } else if odds < EVEN_MAX {
            OddsBucket::Even
        } else if odds < MID_MAX {
            OddsBucket::Mid
        } else if odds < LONG_MAX {
            OddsBucket::Long
        } else {
            OddsBucket::VeryLong
        }
    }
}

impl std::fmt::Display for OddsBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OddsBucket::Short => "<1.5",
            OddsBucket::Even => "1.5-2.0",
            OddsBucket::Mid => "2.0-3.0",
            OddsBucket::Long => "3.0-5.0",
            OddsBucket::VeryLong => "5.0+",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One wagered proposition within a bet. Owned by its parent bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLeg {
    pub player: String,
    pub team: String,
    pub prop_type: String,
    /// Raw market/line text, e.g. "Over 49.5".
    pub market: String,
    /// Decimal odds.
    pub odds: f64,
    pub result: LegResult,
    /// Event start, when the leg row carried one.
    pub event_time: Option<DateTime<Utc>>,
    pub sport: String,
    pub league: String,
    pub market_category: MarketCategory,
    pub bet_category: BetCategory,
}

/// A placed bet: one leg for singles, two or more for parlays.
/// Frozen before insertion into the store; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    /// Sportsbook bet-slip id. Unique per bet.
    pub id: String,
    pub placed_at: PlacedAt,
    pub sport: String,
    pub league: String,
    /// Settlement text exactly as exported ("Won", "Lost", "Cashed Out", ...).
    /// Case folding happens only at comparison sites.
    pub status: String,
    pub wager: f64,
    pub potential_payout: f64,
    /// Amount actually returned once settled; 0 until then.
    pub actual_payout: f64,
    pub winnings: f64,
    pub leg_count: usize,
    pub legs: Vec<BetLeg>,
}

impl Bet {
    pub fn is_parlay(&self) -> bool {
        self.legs.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_result_accepts_both_spellings() {
        assert_eq!(LegResult::from_text("Win"), LegResult::Win);
        assert_eq!(LegResult::from_text("WON"), LegResult::Win);
        assert_eq!(LegResult::from_text("lose"), LegResult::Lose);
        assert_eq!(LegResult::from_text("Lost"), LegResult::Lose);
        assert_eq!(LegResult::from_text("Pushed"), LegResult::Unresolved);
        assert_eq!(LegResult::from_text(""), LegResult::Unresolved);
    }

    #[test]
    fn market_category_rules() {
        assert_eq!(MarketCategory::from_market("Over 249.5"), MarketCategory::OverUnder);
        assert_eq!(MarketCategory::from_market("UNDER 1.5"), MarketCategory::OverUnder);
        assert_eq!(MarketCategory::from_market("Yes"), MarketCategory::YesNo);
        assert_eq!(MarketCategory::from_market("No"), MarketCategory::YesNo);
        assert_eq!(MarketCategory::from_market("Anytime TD Scorer"), MarketCategory::Anytime);
        assert_eq!(MarketCategory::from_market("Moneyline"), MarketCategory::Other);
        // "Broncos" must not read as a No market
        assert_eq!(MarketCategory::from_market("Broncos"), MarketCategory::Other);
    }

    #[test]
    fn bet_category_priority_order() {
        assert_eq!(BetCategory::from_text("Alt Rushing Yards"), BetCategory::Rushing);
        assert_eq!(BetCategory::from_text("Passing Touchdowns"), BetCategory::Passing);
        assert_eq!(BetCategory::from_text("Receiving Yards"), BetCategory::Receiving);
        assert_eq!(BetCategory::from_text("Receptions"), BetCategory::Receiving);
        assert_eq!(BetCategory::from_text("Anytime Touchdown Scorer"), BetCategory::Touchdown);
        assert_eq!(BetCategory::from_text("Sacks"), BetCategory::Defense);
        assert_eq!(BetCategory::from_text("Moneyline"), BetCategory::Other);
    }

    #[test]
    fn odds_bucket_edges() {
        assert_eq!(OddsBucket::from_odds(1.49), OddsBucket::Short);
        assert_eq!(OddsBucket::from_odds(1.5), OddsBucket::Even);
        assert_eq!(OddsBucket::from_odds(2.0), OddsBucket::Mid);
        assert_eq!(OddsBucket::from_odds(3.0), OddsBucket::Long);
        assert_eq!(OddsBucket::from_odds(5.0), OddsBucket::VeryLong);
        assert_eq!(OddsBucket::from_odds(12.0), OddsBucket::VeryLong);
    }
}
