//! Batched, cooperative ingestion.
//!
//! Rows flow extraction → assembly → store in batches of
//! [`BATCH_SIZE`](crate::config::BATCH_SIZE). Every
//! [`YIELD_EVERY_ROWS`](crate::config::YIELD_EVERY_ROWS) rows and at each
//! batch boundary the pipeline reports progress, yields to the runtime,
//! and checks the cancellation flag. Store updates never span a yield:
//! a bet is fully assembled and indexed before control leaves the task,
//! so a cancelled run still hands back an internally consistent store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::assemble::{AssembledBet, RecordAssembler};
use crate::config::{BATCH_SIZE, YIELD_EVERY_ROWS};
use crate::error::Result;
use crate::extract::{self, SourceDocument};
use crate::state::BetStore;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cooperative cancellation flag, checked at every yield point. Clone it
/// before starting the run and flip it from anywhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// One row-scoped failure. Recorded, never thrown.
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// 1-based source row number.
    pub line: usize,
    pub reason: String,
}

/// Returned diagnostics for a run — the ingestion equivalent of a parse
/// report. Per-row failures land here instead of in a global log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Data rows seen (header excluded).
    pub rows: usize,
    /// Bets committed to the store.
    pub bets: usize,
    /// Leg rows with no open parent bet.
    pub orphan_legs: usize,
    /// Bets committed with an unparsed placement timestamp.
    pub unparsed_timestamps: usize,
    pub skipped: Vec<RowFailure>,
    pub cancelled: bool,
}

pub struct IngestOutcome {
    pub store: BetStore,
    pub report: IngestReport,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IngestionPipeline {
    cancel: CancelToken,
}

impl IngestionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ingest one document. `on_progress` receives a monotonically
    /// non-decreasing integer percentage, ending at 100 unless cancelled.
    /// Fatal extraction errors abort; row failures are fenced into the
    /// report and the run continues.
    pub async fn run<F>(&self, document: &SourceDocument, mut on_progress: F) -> Result<IngestOutcome>
    where
        F: FnMut(u8),
    {
        let rows = extract::extract(document)?;
        let total_batches = rows.len().div_ceil(BATCH_SIZE).max(1);

        let mut store = BetStore::new();
        let mut assembler = RecordAssembler::new();
        let mut report = IngestReport { rows: rows.len(), ..IngestReport::default() };
        let mut last_percent: u8 = 0;

        'batches: for (batch_idx, batch) in rows.chunks(BATCH_SIZE).enumerate() {
            for (i, row) in batch.iter().enumerate() {
                if let Some(done) = assembler.push(row) {
                    commit(&mut store, done, &mut report);
                }

                if (i + 1) % YIELD_EVERY_ROWS == 0 && i + 1 < batch.len() {
                    let pct = percent(batch_idx, i + 1, batch.len(), total_batches);
                    emit(pct, &mut last_percent, &mut on_progress);
                    tokio::task::yield_now().await;
                    if self.cancel.is_cancelled() {
                        report.cancelled = true;
                        break 'batches;
                    }
                }
            }

            let pct = percent(batch_idx + 1, 0, 1, total_batches);
            emit(pct, &mut last_percent, &mut on_progress);
            tokio::task::yield_now().await;
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break 'batches;
            }
        }

        if !report.cancelled {
            if let Some(done) = assembler.finish() {
                commit(&mut store, done, &mut report);
            }
            emit(100, &mut last_percent, &mut on_progress);
        }
        report.orphan_legs = assembler.orphan_legs();

        info!(
            rows = report.rows,
            bets = report.bets,
            skipped = report.skipped.len(),
            orphan_legs = report.orphan_legs,
            unparsed_timestamps = report.unparsed_timestamps,
            cancelled = report.cancelled,
            "ingestion finished"
        );

        Ok(IngestOutcome { store, report })
    }
}

fn percent(completed_batches: usize, rows_done: usize, batch_len: usize, total_batches: usize) -> u8 {
    let fraction = if batch_len == 0 { 0.0 } else { rows_done as f64 / batch_len as f64 };
    let pct = (completed_batches as f64 + fraction) / total_batches as f64 * 100.0;
    pct.min(100.0) as u8
}

fn emit<F: FnMut(u8)>(pct: u8, last: &mut u8, on_progress: &mut F) {
    if pct > *last {
        *last = pct;
        on_progress(pct);
    }
}

fn commit(store: &mut BetStore, done: AssembledBet, report: &mut IngestReport) {
    let AssembledBet { bet, opened_line } = done;
    if bet.id.is_empty() {
        warn!(line = opened_line, "bet has no slip id, skipped");
        report
            .skipped
            .push(RowFailure { line: opened_line, reason: "bet has no slip id".to_string() });
        return;
    }
    let id = bet.id.clone();
    let unparsed = !bet.placed_at.is_parsed();
    if store.insert(bet) {
        report.bets += 1;
        if unparsed {
            report.unparsed_timestamps += 1;
        }
    } else {
        warn!(line = opened_line, id = %id, "duplicate bet slip id, skipped");
        report.skipped.push(RowFailure {
            line: opened_line,
            reason: format!("duplicate bet slip id {id}"),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
