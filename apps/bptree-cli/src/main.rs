//! # bptree-cli
//!
//! A REPL over a single named B+ tree index: `insert <lo> <hi>`,
//! `scan <lo> <hi>`, `delete <lo> <hi>`, `print`, `stats`, `quit`.
//!
//! Keys are zero-padded 4-digit decimals; each inserted key `k` carries a
//! record id `(k, k+1)`, matching the driver convention used to build the
//! end-to-end test scenarios.

use crate::config::EngineConfig;
use crate::engine_environment::EngineEnvironment;
use btree::entry::RecordId;
use btree::maintenance::PrintOption;
use page::page_id::PageId;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

mod config;
mod engine_environment;

const INDEX_NAME: &str = "default";

fn main() {
    let cfg = match EngineConfig::load_or_default("bptree-cli.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let _logging_guard = match init_logging(&cfg.storage.logs_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            None
        }
    };

    let env = EngineEnvironment::new(cfg);
    let index = match env.open_index(INDEX_NAME) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("failed to open index {INDEX_NAME:?}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(name = INDEX_NAME, "index opened");

    run_repl(&index, io::stdin().lock(), io::stdout());
}

fn run_repl(
    index: &btree::IndexFile<file::disk_file_manager::DiskFileManager>,
    stdin: impl BufRead,
    mut stdout: impl Write,
) {
    for line in stdin.lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else { continue };
        let args: Vec<&str> = parts.collect();

        match dispatch(index, command, &args) {
            Ok(output) => {
                let _ = writeln!(stdout, "{output}");
            }
            Err(Stop) => break,
        }
    }
}

struct Stop;

fn dispatch(
    index: &btree::IndexFile<file::disk_file_manager::DiskFileManager>,
    command: &str,
    args: &[&str],
) -> Result<String, Stop> {
    match command {
        "quit" | "exit" => Err(Stop),
        "insert" => Ok(run_range(args, |k| {
            let key = zero_pad(k);
            match index.insert(key.as_bytes(), rid_for(k)) {
                Ok(()) => format!("insert {key}: ok"),
                Err(e) => format!("insert {key}: error: {e}"),
            }
        })),
        "delete" => Ok(run_range(args, |k| {
            let key = zero_pad(k);
            match index.delete(key.as_bytes(), rid_for(k)) {
                Ok(()) => format!("delete {key}: ok"),
                Err(e) => format!("delete {key}: error: {e}"),
            }
        })),
        "scan" => Ok(run_scan(index, args)),
        "print" => Ok(match index.print_tree(PrintOption::Recursive) {
            Ok(dump) => dump,
            Err(e) => format!("error: {e}"),
        }),
        "stats" => Ok(match index.dump_statistics() {
            Ok(stats) => format!(
                "leaf_pages={} index_pages={} leaf_entries={} index_entries={} height={} leaf_fill_avg={:.1} index_fill_avg={:.1}",
                stats.leaf_pages,
                stats.index_pages,
                stats.leaf_entries,
                stats.index_entries,
                stats.height,
                stats.leaf_fill.average(),
                stats.index_fill.average(),
            ),
            Err(e) => format!("error: {e}"),
        }),
        other => Ok(format!("unrecognized command: {other}")),
    }
}

/// Runs `op` over every integer key in the inclusive `<lo> <hi>` range given
/// in `args`, joining each result onto its own line.
fn run_range(args: &[&str], op: impl Fn(u32) -> String) -> String {
    let (Some(lo), Some(hi)) = (args.first().and_then(|s| s.parse::<u32>().ok()), args.get(1).and_then(|s| s.parse::<u32>().ok())) else {
        return "usage: <command> <lo> <hi>".to_string();
    };
    if lo > hi {
        return format!("invalid range: {lo} > {hi}");
    }
    (lo..=hi).map(op).collect::<Vec<_>>().join("\n")
}

fn run_scan(index: &btree::IndexFile<file::disk_file_manager::DiskFileManager>, args: &[&str]) -> String {
    let lo = args.first().and_then(|s| s.parse::<u32>().ok()).map(zero_pad);
    let hi = args.get(1).and_then(|s| s.parse::<u32>().ok()).map(zero_pad);

    let mut cursor = match index.open_scan(lo.as_deref().map(str::as_bytes), hi.as_deref().map(str::as_bytes)) {
        Ok(cursor) => cursor,
        Err(e) => return format!("error: {e}"),
    };

    let mut lines = Vec::new();
    loop {
        match cursor.get_next() {
            Ok(Some((key, rid))) => lines.push(format!("{} -> {}", String::from_utf8_lossy(&key), rid)),
            Ok(None) => break,
            Err(e) => {
                lines.push(format!("error: {e}"));
                break;
            }
        }
    }
    if lines.is_empty() {
        "(no matching entries)".to_string()
    } else {
        lines.join("\n")
    }
}

/// Zero-pads an integer key to 4 decimal digits (driver convention).
fn zero_pad(k: u32) -> String {
    format!("{k:04}")
}

/// `rid = (k, k+1)` (driver convention); the record's page lives in the same
/// file as the index itself since this REPL has no separate data file.
fn rid_for(k: u32) -> RecordId {
    RecordId::new(PageId::new(0, k), k + 1)
}

/// Sets up logging the way a long-running engine process does: a compact
/// console layer plus a daily-rolling JSON file layer.
pub fn init_logging(log_dir: &PathBuf) -> Result<WorkerGuard, Box<dyn Error + Send + Sync>> {
    let file_appender = tracing_appender::rolling::daily(log_dir, "bptree-cli.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
