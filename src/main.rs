mod assemble;
mod config;
mod error;
mod extract;
mod normalize;
mod pipeline;
mod state;
mod stats;
mod timestamp;
mod types;

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::extract::{SourceDocument, TabularDocument};
use crate::pipeline::{IngestReport, IngestionPipeline};
use crate::state::BetStore;
use crate::stats::{Breakdowns, QuickStats, Streaks};

#[derive(Parser, Debug)]
#[command(
    name = "hardrock-analyzer",
    about = "Aggregate analytics over sportsbook betting-history exports"
)]
struct Args {
    /// Betting-history export: SpreadsheetML (.xls saved as XML) or
    /// tab-separated text
    #[arg(short, long)]
    input: PathBuf,

    /// Emit the full report as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    quick_stats: QuickStats,
    breakdowns: Breakdowns,
    streaks: Streaks,
    ingest: IngestReport,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let cfg = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(args).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let document = load_document(&args.input)?;

    let pipeline = IngestionPipeline::new();
    let outcome = pipeline
        .run(&document, |pct| debug!(pct, "ingest progress"))
        .await?;

    info!(
        bets = outcome.report.bets,
        rows = outcome.report.rows,
        skipped = outcome.report.skipped.len(),
        orphan_legs = outcome.report.orphan_legs,
        "loaded {}",
        args.input.display()
    );

    let report = Report {
        quick_stats: stats::quick_stats(&outcome.store),
        breakdowns: stats::breakdowns(&outcome.store),
        streaks: stats::streaks(&outcome.store),
        ingest: outcome.report,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&outcome.store, &report);
    }
    Ok(())
}

/// Sniff the encoding: the sportsbook's ".xls" export is XML text; plain
/// tab-separated dumps go through the delimited decoder.
fn load_document(path: &Path) -> Result<SourceDocument> {
    let text = std::fs::read_to_string(path)?;
    if looks_like_xml(&text) {
        Ok(SourceDocument::Xml(text))
    } else {
        Ok(SourceDocument::Tabular(TabularDocument::from_delimited(&text, '\t')))
    }
}

fn looks_like_xml(text: &str) -> bool {
    let head = text.trim_start();
    head.starts_with("<?xml") || head.starts_with("<Workbook") || head.starts_with("<ss:Workbook")
}

fn print_summary(store: &BetStore, report: &Report) {
    let q = &report.quick_stats;
    println!("Bets:          {}", q.total_bets);
    println!("Wagered:       ${:.2}", q.total_wagered);
    println!("Returned:      ${:.2}", q.total_won);
    println!("Profit/Loss:   ${:+.2}", q.profit_loss);
    println!("Win rate:      {:.1}%", q.win_rate);
    println!("ROI:           {:+.1}%", q.roi);
    println!("Average odds:  {:.2}", q.average_odds);
    if !q.most_bet_sport.is_empty() {
        println!("Top sport:     {}", q.most_bet_sport);
    }
    if !q.most_bet_player.is_empty() {
        println!("Top player:    {}", q.most_bet_player);
    }
    if let Some((start, end)) = store.metadata().date_range {
        println!("Date range:    {} .. {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
    }

    let s = &report.streaks;
    println!(
        "Streaks:       longest win {} | longest loss {} | current {:+}",
        s.longest_win, s.longest_loss, s.current
    );

    if !report.breakdowns.by_month.is_empty() {
        println!("\nBy month:");
        for (month, d) in &report.breakdowns.by_month {
            println!(
                "  {month}  bets {:>4}  wagered ${:>9.2}  p/l ${:>+9.2}  win {:>5.1}%",
                d.bets, d.wagered, d.profit_loss, d.win_rate
            );
        }
    }
    if !report.breakdowns.by_odds_bucket.is_empty() {
        println!("\nBy odds bucket:");
        for (bucket, d) in &report.breakdowns.by_odds_bucket {
            println!(
                "  {bucket:<8} bets {:>4}  wagered ${:>9.2}  p/l ${:>+9.2}  win {:>5.1}%",
                d.bets, d.wagered, d.profit_loss, d.win_rate
            );
        }
    }

    if !report.ingest.skipped.is_empty() || report.ingest.orphan_legs > 0 {
        println!(
            "\nSkipped {} row(s), dropped {} orphan leg(s) — see log for details",
            report.ingest.skipped.len(),
            report.ingest.orphan_legs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const XML_EXPORT: &str = r#"<?xml version="1.0"?>
<ss:Workbook xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">
 <ss:Worksheet ss:Name="Bet History"><ss:Table>
  <ss:Row>
   <ss:Cell><ss:Data>Date Placed</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Status</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>League</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Match</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Bet Type</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Market</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Price</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Wager</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Winnings</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Payout</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Potential Payout</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Result</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Bet Slip ID</ss:Data></ss:Cell>
  </ss:Row>
  <ss:Row>
   <ss:Cell><ss:Data>9 Feb 2025 @ 4:08pm</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Won</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>NFL</ss:Data></ss:Cell>
   <ss:Cell/><ss:Cell/><ss:Cell/><ss:Cell/>
   <ss:Cell><ss:Data>10</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>15</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>25</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>25</ss:Data></ss:Cell>
   <ss:Cell/>
   <ss:Cell><ss:Data>ABC123</ss:Data></ss:Cell>
  </ss:Row>
  <ss:Row>
   <ss:Cell/><ss:Cell/><ss:Cell/>
   <ss:Cell><ss:Data>Buffalo Bills vs Kansas City Chiefs</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Josh Allen - Passing Yards</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>Over 249.5</ss:Data></ss:Cell>
   <ss:Cell><ss:Data>1.85</ss:Data></ss:Cell>
  </ss:Row>
 </ss:Table></ss:Worksheet>
</ss:Workbook>"#;

    #[tokio::test]
    async fn xml_export_file_ingests_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(XML_EXPORT.as_bytes()).unwrap();

        let document = load_document(file.path()).unwrap();
        assert!(matches!(document, SourceDocument::Xml(_)));

        let outcome = IngestionPipeline::new().run(&document, |_| {}).await.unwrap();
        assert_eq!(outcome.report.bets, 1);

        let bet = outcome.store.get("ABC123").unwrap();
        assert_eq!(bet.legs.len(), 1);
        assert_eq!(bet.legs[0].player, "Josh Allen");
        assert_eq!(bet.legs[0].team, "Buffalo Bills");
        assert!((bet.wager - 10.0).abs() < 1e-9);

        let quick = stats::quick_stats(&outcome.store);
        assert!((quick.win_rate - 100.0).abs() < 1e-9);
        assert!((quick.profit_loss - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn tsv_file_is_sniffed_as_tabular() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date Placed\tStatus\tWager\tPayout\tBet Slip ID").unwrap();
        writeln!(file, "9 Feb 2025 @ 4:08pm\tWon\t10\t25\tT1").unwrap();

        let document = load_document(file.path()).unwrap();
        assert!(matches!(document, SourceDocument::Tabular(_)));

        let outcome = IngestionPipeline::new().run(&document, |_| {}).await.unwrap();
        assert_eq!(outcome.store.len(), 1);
        assert!(outcome.store.get("T1").is_some());
    }
}
