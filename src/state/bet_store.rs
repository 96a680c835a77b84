use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Bet, OddsBucket};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreMetadata {
    /// Min/max placement instant over all inserted bets with a parsed
    /// timestamp. None until the first such bet arrives.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub sports: BTreeSet<String>,
    pub teams: BTreeSet<String>,
    pub players: BTreeSet<String>,
    pub prop_types: BTreeSet<String>,
    pub total_bets: usize,
    pub total_wagered: f64,
}

// ---------------------------------------------------------------------------
// Index selection for the generic read contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Calendar date key, `YYYY-MM-DD`.
    Date,
    /// `YYYY`.
    Year,
    /// `YYYY-MM`.
    Month,
    Sport,
    Team,
    Player,
    PropType,
    /// Odds bucket label, e.g. `"1.5-2.0"`.
    OddsBucket,
}

// ---------------------------------------------------------------------------
// BetStore
// ---------------------------------------------------------------------------

/// Canonical bet collection plus secondary indices and running metadata.
///
/// Single-writer: `insert` takes `&mut self` and completes every index
/// and metadata update for one bet before returning, so readers (which
/// borrow `&self`) can never observe a half-indexed bet. Bets with an
/// unparsed placement timestamp are indexed everywhere except the
/// date/year/month indices and the date range.
#[derive(Debug, Default)]
pub struct BetStore {
    bets: HashMap<String, Bet>,
    by_date: BTreeMap<String, Vec<String>>,
    by_year: BTreeMap<String, Vec<String>>,
    by_month: BTreeMap<String, Vec<String>>,
    by_sport: BTreeMap<String, Vec<String>>,
    by_team: BTreeMap<String, Vec<String>>,
    by_player: BTreeMap<String, BTreeSet<String>>,
    by_prop_type: BTreeMap<String, BTreeSet<String>>,
    by_odds: BTreeMap<String, BTreeSet<String>>,
    metadata: StoreMetadata,
}

impl BetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a finalized bet, updating every index and the metadata.
    /// Returns false (store unchanged) for an empty or duplicate id.
    pub fn insert(&mut self, bet: Bet) -> bool {
        if bet.id.is_empty() || self.bets.contains_key(&bet.id) {
            return false;
        }
        let id = bet.id.clone();

        if let Some(t) = bet.placed_at.instant() {
            self.by_date
                .entry(t.format("%Y-%m-%d").to_string())
                .or_default()
                .push(id.clone());
            self.by_year
                .entry(t.format("%Y").to_string())
                .or_default()
                .push(id.clone());
            self.by_month
                .entry(t.format("%Y-%m").to_string())
                .or_default()
                .push(id.clone());

            self.metadata.date_range = Some(match self.metadata.date_range {
                None => (t, t),
                Some((start, end)) => (start.min(t), end.max(t)),
            });
        }

        self.by_sport.entry(bet.sport.clone()).or_default().push(id.clone());
        self.metadata.sports.insert(bet.sport.clone());

        for leg in &bet.legs {
            if !leg.player.is_empty() {
                self.metadata.players.insert(leg.player.clone());
                self.by_player
                    .entry(leg.player.clone())
                    .or_default()
                    .insert(id.clone());
            }
            if !leg.team.is_empty() {
                self.metadata.teams.insert(leg.team.clone());
                let ids = self.by_team.entry(leg.team.clone()).or_default();
                if ids.last() != Some(&id) {
                    ids.push(id.clone());
                }
            }
            if !leg.prop_type.is_empty() {
                self.metadata.prop_types.insert(leg.prop_type.clone());
                self.by_prop_type
                    .entry(leg.prop_type.clone())
                    .or_default()
                    .insert(id.clone());
            }
            self.by_odds
                .entry(OddsBucket::from_odds(leg.odds).to_string())
                .or_default()
                .insert(id.clone());
        }

        self.metadata.total_bets += 1;
        self.metadata.total_wagered += bet.wager;
        self.bets.insert(id, bet);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Bet> {
        self.bets.get(id)
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn bets(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    /// Bet ids under one key of one secondary index. Unknown keys yield
    /// an empty list.
    pub fn query(&self, kind: IndexKind, key: &str) -> Vec<String> {
        match kind {
            IndexKind::Date => vec_ids(&self.by_date, key),
            IndexKind::Year => vec_ids(&self.by_year, key),
            IndexKind::Month => vec_ids(&self.by_month, key),
            IndexKind::Sport => vec_ids(&self.by_sport, key),
            IndexKind::Team => vec_ids(&self.by_team, key),
            IndexKind::Player => set_ids(&self.by_player, key),
            IndexKind::PropType => set_ids(&self.by_prop_type, key),
            IndexKind::OddsBucket => set_ids(&self.by_odds, key),
        }
    }

    /// All keys of one secondary index, in sorted order.
    pub fn index_keys(&self, kind: IndexKind) -> Vec<String> {
        match kind {
            IndexKind::Date => self.by_date.keys().cloned().collect(),
            IndexKind::Year => self.by_year.keys().cloned().collect(),
            IndexKind::Month => self.by_month.keys().cloned().collect(),
            IndexKind::Sport => self.by_sport.keys().cloned().collect(),
            IndexKind::Team => self.by_team.keys().cloned().collect(),
            IndexKind::Player => self.by_player.keys().cloned().collect(),
            IndexKind::PropType => self.by_prop_type.keys().cloned().collect(),
            IndexKind::OddsBucket => self.by_odds.keys().cloned().collect(),
        }
    }

    /// sport → bet ids, in sorted key order. Read-side view for stats.
    pub fn sport_index(&self) -> &BTreeMap<String, Vec<String>> {
        &self.by_sport
    }

    /// player → bet ids, in sorted key order.
    pub fn player_index(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.by_player
    }
}

fn vec_ids(map: &BTreeMap<String, Vec<String>>, key: &str) -> Vec<String> {
    map.get(key).cloned().unwrap_or_default()
}

fn set_ids(map: &BTreeMap<String, BTreeSet<String>>, key: &str) -> Vec<String> {
    map.get(key)
        .map(|ids| ids.iter().cloned().collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
