mod engine;

pub use engine::{
    breakdowns, is_loss, is_win, quick_stats, streaks, Breakdowns, DimensionStats, QuickStats,
    Streaks,
};
