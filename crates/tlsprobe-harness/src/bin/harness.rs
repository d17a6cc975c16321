//! CLI entrypoint for the tlsprobe verification harness.

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tlsprobe_core::StorageScope;
use tlsprobe_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use tlsprobe_harness::{ProbeReport, run_in_process, run_probe, verify_capture};

/// Verification tooling for the tlsprobe storage-scope demo.
#[derive(Debug, Parser)]
#[command(name = "tlsprobe-harness")]
#[command(about = "Verification harness for the tlsprobe storage-scope demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a scenario in-process and verify every trace.
    Probe {
        /// Storage scope to exercise (process/normal or thread/tls).
        #[arg(long, default_value = "thread")]
        scope: StorageScope,
        /// Run the five-worker variant instead of single-threaded.
        #[arg(long)]
        threaded: bool,
        /// Output report path (JSON). If omitted, prints to stdout.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Spawn a probe executable, capture its output, and verify it.
    Run {
        /// Path to the probe executable.
        #[arg(long)]
        probe: PathBuf,
        /// Output report path (JSON). If omitted, prints to stdout.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Assemble text through an external assembler and print the code bytes as hex.
    AsmHex {
        /// Assembly source text. If omitted, reads from stdin.
        source: Option<String>,
        /// Assembler executable.
        #[arg(long, default_value = "as")]
        assembler: String,
        /// objcopy executable used to extract the flat binary.
        #[arg(long, default_value = "objcopy")]
        objcopy: String,
    },
}

fn emit_outcome(
    log: Option<&PathBuf>,
    run_id: &str,
    entry: LogEntry,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = log {
        let mut emitter = LogEmitter::to_file(path, run_id)?;
        emitter.emit_entry(entry)?;
        emitter.flush()?;
    }
    Ok(())
}

fn finish_report(
    report: ProbeReport,
    path: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = report.to_json()?;
    if let Some(path) = path {
        std::fs::write(path, &json)?;
        eprintln!("Wrote report to {}", path.display());
    } else {
        println!("{json}");
    }
    if !report.passed() {
        return Err("probe verification failed".into());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Probe {
            scope,
            threaded,
            report,
            log,
        } => {
            let case = if threaded { "workers" } else { "single" };
            eprintln!("Running {scope} scope in-process ({case})");
            let started = Instant::now();
            let probe_report = run_in_process(scope, threaded);
            let outcome = if probe_report.passed() {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            emit_outcome(
                log.as_ref(),
                "probe",
                LogEntry::new("", LogLevel::Info, "in_process_probe")
                    .with_scope(scope)
                    .with_case(case)
                    .with_outcome(outcome)
                    .with_duration_ms(started.elapsed().as_millis() as u64),
            )?;
            finish_report(probe_report, report.as_ref())?;
        }
        Command::Run { probe, report, log } => {
            eprintln!("Spawning probe {}", probe.display());
            let started = Instant::now();
            let capture = run_probe(&probe)?;
            let source = probe.display().to_string();
            let probe_report = verify_capture(&capture, &source)?;
            let outcome = if probe_report.passed() {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            emit_outcome(
                log.as_ref(),
                "run",
                LogEntry::new("", LogLevel::Info, "capture_probe")
                    .with_case("capture")
                    .with_probe(&source)
                    .with_outcome(outcome)
                    .with_duration_ms(started.elapsed().as_millis() as u64),
            )?;
            finish_report(probe_report, report.as_ref())?;
        }
        Command::AsmHex {
            source,
            assembler,
            objcopy,
        } => {
            let source = match source {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let hex = tlsprobe_harness::asm_hex::assemble_hex(&source, &assembler, &objcopy)?;
            println!("{hex}");
        }
    }

    Ok(())
}
