/// Rows per ingestion batch. Progress is reported in batch fractions,
/// so this also sets the granularity of the percentage stream.
pub const BATCH_SIZE: usize = 1000;

/// Rows processed between cooperative yields inside a batch. The host
/// (UI thread, other tasks) gets control back at least this often.
pub const YIELD_EVERY_ROWS: usize = 100;

/// Decimal-odds boundaries for the per-leg odds index buckets.
pub mod odds_buckets {
    pub const SHORT_MAX: f64 = 1.5;
    pub const EVEN_MAX: f64 = 2.0;
    pub const MID_MAX: f64 = 3.0;
    pub const LONG_MAX: f64 = 5.0;
}

/// Column labels of the sportsbook export, as written in its header row.
pub mod columns {
    pub const DATE_PLACED: &str = "Date Placed";
    pub const STATUS: &str = "Status";
    pub const LEAGUE: &str = "League";
    pub const MATCH: &str = "Match";
    pub const BET_TYPE: &str = "Bet Type";
    pub const MARKET: &str = "Market";
    pub const PRICE: &str = "Price";
    pub const WAGER: &str = "Wager";
    pub const WINNINGS: &str = "Winnings";
    pub const PAYOUT: &str = "Payout";
    pub const POTENTIAL_PAYOUT: &str = "Potential Payout";
    pub const RESULT: &str = "Result";
    pub const BET_SLIP_ID: &str = "Bet Slip ID";

    /// Every column the core consumes. Rows where all of these are
    /// absent or empty are blank filler and get skipped.
    pub const ALL: &[&str] = &[
        DATE_PLACED,
        STATUS,
        LEAGUE,
        MATCH,
        BET_TYPE,
        MARKET,
        PRICE,
        WAGER,
        WINNINGS,
        PAYOUT,
        POTENTIAL_PAYOUT,
        RESULT,
        BET_SLIP_ID,
    ];
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
