//! Row tagging and leg-field derivation.
//!
//! Every raw row is tagged before any field extraction: a parent-bet row
//! is recognized by its placement-timestamp text (structural pattern
//! match) or a bet-slip id, everything else with content is a leg row.
//! The text-splitting helpers are deliberately standalone pure functions
//! so their edge cases live in unit tests instead of folklore.

use crate::config::columns;
use crate::extract::RawRow;
use crate::normalize;
use crate::timestamp::TimestampParser;
use crate::types::{BetCategory, BetLeg, LegResult, MarketCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Opens a new bet: timestamp-shaped `Date Placed` or a bet-slip id.
    Parent,
    /// Belongs to the currently open bet.
    Leg,
    /// Every consumed column absent or empty; filler to skip.
    Blank,
}

pub fn classify(row: &RawRow, parser: &TimestampParser) -> RowKind {
    if parser.matches(row.text(columns::DATE_PLACED))
        || !row.text(columns::BET_SLIP_ID).trim().is_empty()
    {
        return RowKind::Parent;
    }
    if columns::ALL.iter().any(|c| !row.text(c).trim().is_empty()) {
        RowKind::Leg
    } else {
        RowKind::Blank
    }
}

/// Split a bet-type cell into (player, prop type):
/// `"Josh Allen - Passing Yards"` → `("Josh Allen", "Passing Yards")`.
/// Extra separators stay with the prop type:
/// `"CeeDee Lamb - Alt Receiving - Yards"` → `("CeeDee Lamb", "Alt Receiving - Yards")`.
pub fn split_player_prop(bet_type: &str) -> (String, String) {
    let mut parts = bet_type.split(" - ");
    let player = parts.next().unwrap_or("").trim().to_string();
    let prop = parts.collect::<Vec<_>>().join(" - ").trim().to_string();
    (player, prop)
}

/// Default team attribution from match text: the first side of
/// `"X vs Y"`. Text without a `" vs "` token attributes nothing.
pub fn default_team(match_text: &str) -> String {
    match match_text.split_once(" vs ") {
        Some((first, _)) => first.trim().to_string(),
        None => String::new(),
    }
}

/// Build a leg from a leg row. The export reuses the `Result` column for
/// event times on leg rows; when that text is timestamp-shaped it becomes
/// the event time and the result falls back to the `Status` column.
pub fn build_leg(
    row: &RawRow,
    sport: &str,
    league: &str,
    parser: &TimestampParser,
) -> BetLeg {
    let bet_type = row.text(columns::BET_TYPE);
    let market = row.text(columns::MARKET);
    let (player, prop_type) = split_player_prop(bet_type);
    let team = default_team(row.text(columns::MATCH));

    let result_text = row.text(columns::RESULT);
    let (event_time, result) = if parser.matches(result_text) {
        (
            parser.parse(result_text).ok(),
            LegResult::from_text(row.text(columns::STATUS)),
        )
    } else if !result_text.trim().is_empty() {
        (None, LegResult::from_text(result_text))
    } else {
        (None, LegResult::from_text(row.text(columns::STATUS)))
    };

    let row_league = normalize::text(row.get(columns::LEAGUE));
    let league = if row_league.is_empty() { league.to_string() } else { row_league };

    BetLeg {
        player,
        team,
        prop_type,
        market: market.trim().to_string(),
        odds: normalize::numeric(row.text(columns::PRICE)),
        result,
        event_time,
        sport: sport.to_string(),
        league,
        market_category: MarketCategory::from_market(market),
        bet_category: BetCategory::from_text(&format!("{bet_type} {market}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(fields: &[(&str, &str)]) -> RawRow {
        RawRow {
            line: 2,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn timestamp_shaped_date_is_parent() {
        let parser = TimestampParser::new();
        let r = row(&[("Date Placed", "9 Feb 2025 @ 4:08pm")]);
        assert_eq!(classify(&r, &parser), RowKind::Parent);
    }

    #[test]
    fn slip_id_without_date_is_still_parent() {
        let parser = TimestampParser::new();
        let r = row(&[("Date Placed", ""), ("Bet Slip ID", "ABC123"), ("Wager", "10")]);
        assert_eq!(classify(&r, &parser), RowKind::Parent);
    }

    #[test]
    fn content_without_date_or_id_is_leg() {
        let parser = TimestampParser::new();
        let r = row(&[("Bet Type", "Josh Allen - Passing Yards"), ("Market", "Over 249.5")]);
        assert_eq!(classify(&r, &parser), RowKind::Leg);
    }

    #[test]
    fn empty_row_is_blank() {
        let parser = TimestampParser::new();
        assert_eq!(classify(&row(&[]), &parser), RowKind::Blank);
        assert_eq!(classify(&row(&[("Status", "  ")]), &parser), RowKind::Blank);
    }

    #[test]
    fn split_player_prop_basic() {
        let (player, prop) = split_player_prop("Josh Allen - Passing Yards");
        assert_eq!(player, "Josh Allen");
        assert_eq!(prop, "Passing Yards");
    }

    #[test]
    fn split_player_prop_extra_separators_join_into_prop() {
        let (player, prop) = split_player_prop("CeeDee Lamb - Alt Receiving - Yards");
        assert_eq!(player, "CeeDee Lamb");
        assert_eq!(prop, "Alt Receiving - Yards");
    }

    #[test]
    fn split_player_prop_no_separator() {
        let (player, prop) = split_player_prop("Moneyline");
        assert_eq!(player, "Moneyline");
        assert_eq!(prop, "");
    }

    #[test]
    fn default_team_takes_first_side() {
        assert_eq!(default_team("Buffalo Bills vs Kansas City Chiefs"), "Buffalo Bills");
        assert_eq!(default_team("no separator here"), "");
        assert_eq!(default_team(""), "");
    }

    #[test]
    fn leg_event_time_comes_from_timestamp_shaped_result() {
        let parser = TimestampParser::new();
        let r = row(&[
            ("Bet Type", "Josh Allen - Passing Yards"),
            ("Market", "Over 249.5"),
            ("Price", "1.91"),
            ("Result", "9 Feb 2025 @ 6:30pm"),
            ("Status", "Won"),
        ]);
        let leg = build_leg(&r, "NFL", "NFL", &parser);
        assert!(leg.event_time.is_some());
        assert_eq!(leg.result, LegResult::Win);
        assert_eq!(leg.player, "Josh Allen");
        assert_eq!(leg.prop_type, "Passing Yards");
        assert_eq!(leg.market_category, MarketCategory::OverUnder);
        assert_eq!(leg.bet_category, BetCategory::Passing);
        assert!((leg.odds - 1.91).abs() < 1e-9);
    }

    #[test]
    fn leg_result_read_from_result_column_when_not_a_time() {
        let parser = TimestampParser::new();
        let r = row(&[("Bet Type", "A - B"), ("Result", "Lose")]);
        let leg = build_leg(&r, "NFL", "NFL", &parser);
        assert!(leg.event_time.is_none());
        assert_eq!(leg.result, LegResult::Lose);
    }
}
