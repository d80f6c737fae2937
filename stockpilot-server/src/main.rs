mod assistant;
mod config;
mod document;
mod history;
mod llm;
mod side_effects;
mod store;

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use stockpilot_engine::engine::analyze_csv;
use stockpilot_engine::side_effect::{run_side_effects, ReportSideEffect, SideEffectInput};
use stockpilot_engine::IntelligenceReport;

use config::Config;
use history::TimelineKind;
use llm::LlmClient;
use side_effects::SaveHistorySideEffect;
use store::HistoryStore;

/// Default forecast horizon when the caller does not pass one.
const DEFAULT_HORIZON: u32 = 30;

fn usage() -> ! {
    eprintln!("Usage: stockpilot <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  analyze <sales.csv> [--horizon N] [--json]");
    eprintln!("      Run the intelligence engine on a sales export.");
    eprintln!("  ask <question> [--doc <file>]");
    eprintln!("      Ask the supply-chain assistant, grounded in the latest forecast.");
    eprintln!("  history [--limit N] [--report <id>] [--chat <id>]");
    eprintln!("      Show recent activity, or replay one stored entry.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  stockpilot analyze fixtures/sales_jan.csv --horizon 14 --json");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = Config::from_env();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage();
    }

    match args[1].as_str() {
        "analyze" => run_analyze(&args[2..], &config).await,
        "ask" => run_ask(&args[2..], &config).await,
        "history" => run_history(&args[2..], &config),
        other => {
            eprintln!("Unknown command: {other}");
            usage();
        }
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

async fn run_analyze(args: &[String], config: &Config) {
    let mut csv_path: Option<&str> = None;
    let mut horizon = DEFAULT_HORIZON;
    let mut json_output = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--horizon" => {
                horizon = args.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("Error: --horizon requires a positive integer");
                    process::exit(1);
                });
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            path if !path.starts_with("--") => {
                csv_path = Some(path);
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
    }

    let Some(csv_path) = csv_path else { usage() };

    let bytes = match std::fs::read(csv_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error reading {csv_path}: {e}");
            process::exit(1);
        }
    };

    let started = Instant::now();
    let report = match analyze_csv(&bytes, horizon) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(if e.is_client_error() { 2 } else { 1 });
        }
    };
    let elapsed_ms = started.elapsed().as_millis();

    // Persistence is best-effort: a missing or broken store costs the audit
    // trail, never the report.
    match HistoryStore::open(Path::new(&config.database_path)) {
        Ok(store) => {
            let effects: Vec<Box<dyn ReportSideEffect>> =
                vec![Box::new(SaveHistorySideEffect::new(Arc::new(store)))];
            let filename = Path::new(csv_path)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown.csv")
                .to_string();
            let input = SideEffectInput { filename, report: report.clone() };
            run_side_effects(&effects, &input).await;
        }
        Err(e) => log::warn!("history store unavailable (report not saved): {e}"),
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
    } else {
        print_human(&report, horizon, elapsed_ms);
    }
}

fn print_human(report: &IntelligenceReport, horizon: u32, elapsed_ms: u128) {
    println!();
    println!("  STOCKPILOT \u{2014} Inventory Intelligence");
    println!("  {:\u{2550}<62}", "");
    println!(
        "  total stock {}  \u{00b7}  potential stockouts {}  \u{00b7}  accuracy {}",
        report.summary.total_stock, report.summary.stockout_count, report.summary.accuracy
    );
    println!();

    if !report.best_sellers.is_empty() {
        println!("  Best sellers:");
        for p in &report.best_sellers {
            println!("    {:24} {:>10.0}", p.product, p.total);
        }
        println!("  Dead stock candidates:");
        for p in &report.worst_sellers {
            println!("    {:24} {:>10.0}", p.product, p.total);
        }
        println!();
    }

    if report.stock_alerts.is_empty() {
        println!("  No stock alerts (no product/stock columns, or nothing urgent).");
    } else {
        println!("  Stock alerts (most urgent first):");
        for alert in &report.stock_alerts {
            println!(
                "    {:10} {:20} {:>4.0}d left  stock {:>6}  ROP {:>5}  {}",
                alert.status.to_string(),
                alert.product,
                alert.days_left,
                alert.current_stock,
                alert.reorder_point,
                alert.action,
            );
        }
    }
    println!();

    if let (Some(first), Some(last)) = (report.forecast_chart.first(), report.forecast_chart.last())
    {
        println!(
            "  Forecast: {} days, {} \u{2192} {}  (first {:.1}, last {:.1})",
            horizon, first.date, last.date, first.predicted, last.predicted
        );
    }
    println!("  \u{23f1}  analyzed in {elapsed_ms}ms");
    println!();
}

// ---------------------------------------------------------------------------
// ask
// ---------------------------------------------------------------------------

async fn run_ask(args: &[String], config: &Config) {
    let mut question: Option<&str> = None;
    let mut doc_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--doc" => {
                doc_path = args.get(i + 1).map(|s| s.as_str());
                if doc_path.is_none() {
                    eprintln!("Error: --doc requires a file path");
                    process::exit(1);
                }
                i += 2;
            }
            q if !q.starts_with("--") => {
                question = Some(q);
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
    }

    let Some(question) = question else { usage() };
    let Some(api_key) = config.api_key.clone() else {
        eprintln!("Error: STOCKPILOT_API_KEY is not set; the assistant is unavailable.");
        process::exit(1);
    };

    // A broken store degrades the assistant to fallback grounding; it does
    // not block the consultation.
    let store = HistoryStore::open(Path::new(&config.database_path)).unwrap_or_else(|e| {
        log::warn!("history store unavailable (degraded grounding): {e}");
        HistoryStore::open_in_memory().expect("in-memory store")
    });

    let document = doc_path.map(|p| document::read_context(Path::new(p)));
    let client = LlmClient::new(api_key, config.model.clone());

    match assistant::ask(&client, &store, question, document.as_deref()).await {
        Ok(answer) => println!("{answer}"),
        Err(e) => {
            eprintln!("Error contacting assistant: {e}");
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

fn run_history(args: &[String], config: &Config) {
    let mut limit = 20usize;
    let mut report_id: Option<i64> = None;
    let mut chat_id: Option<i64> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                limit = args.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("Error: --limit requires a positive integer");
                    process::exit(1);
                });
                i += 2;
            }
            "--report" => {
                report_id = args.get(i + 1).and_then(|s| s.parse().ok());
                if report_id.is_none() {
                    eprintln!("Error: --report requires a numeric id");
                    process::exit(1);
                }
                i += 2;
            }
            "--chat" => {
                chat_id = args.get(i + 1).and_then(|s| s.parse().ok());
                if chat_id.is_none() {
                    eprintln!("Error: --chat requires a numeric id");
                    process::exit(1);
                }
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
    }

    let store = match HistoryStore::open(Path::new(&config.database_path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening history store: {e}");
            process::exit(1);
        }
    };

    // Detail lookups replay one stored entry instead of the timeline.
    if let Some(id) = report_id {
        match store.report_by_id(id) {
            Ok(Some(stored)) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&stored.report).expect("report serializes")
                );
            }
            Ok(None) => {
                eprintln!("No stored report with id {id}");
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error reading history: {e}");
                process::exit(1);
            }
        }
        return;
    }
    if let Some(id) = chat_id {
        match store.chat_by_id(id) {
            Ok(Some(chat)) => {
                println!("[{}] Q: {}", chat.created_at, chat.question);
                println!();
                println!("{}", chat.answer);
            }
            Ok(None) => {
                eprintln!("No stored chat with id {id}");
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error reading history: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let stats = match store.stats() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading history: {e}");
            process::exit(1);
        }
    };
    println!(
        "  {} analysis runs \u{00b7} {} consultations",
        stats.total_predictions, stats.total_consultations
    );
    println!();

    match history::combined_timeline(&store) {
        Ok(timeline) => {
            for entry in timeline.into_iter().take(limit) {
                let tag = match entry.kind {
                    TimelineKind::Forecast => "forecast",
                    TimelineKind::Chat => "chat",
                };
                println!(
                    "  [{tag:8}] #{:<4} {}  \u{2014}  {}  ({})",
                    entry.id, entry.title, entry.description, entry.timestamp
                );
            }
        }
        Err(e) => {
            eprintln!("Error reading history: {e}");
            process::exit(1);
        }
    }
}
