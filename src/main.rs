#![warn(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use log::{LevelFilter, Metadata, Record};
use rust_decimal::Decimal;
use statement_withdrawals::{
    extract_text, Diagnostic, DiagnosticSink, Extraction, LogSink, ParserConfig,
    StatementParser, Strategy, Transaction,
};

/// Extracts the withdrawals from a bank statement PDF to CSV
#[derive(Debug, Parser)]
struct Args {
    /// An SBI, Standard Chartered or other bank statement PDF
    input: PathBuf,
    /// CSV destination file
    output: PathBuf,
    /// Prints the raw lines found in the PDF
    #[arg(long)]
    print_lines: bool,
    /// Reads the input as already-extracted plain text instead of a PDF
    #[arg(long)]
    text: bool,
    /// TOML file with parser settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Upper bound (exclusive) for a single withdrawal
    #[arg(long)]
    max_amount: Option<Decimal>,
    /// More output on stderr (-v for info, -vv for every record)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|e| eyre!("Could not install logger: {e}"))?;
    log::set_max_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    });
    Ok(())
}

/// Forwards to the log and remembers how many records each strategy skipped.
#[derive(Default)]
struct SummarySink {
    skipped: Vec<(Strategy, usize)>,
}

impl DiagnosticSink for SummarySink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if let Diagnostic::StrategyFinished {
            strategy, skipped, ..
        } = &diagnostic
        {
            self.skipped.push((*strategy, *skipped));
        }
        LogSink.emit(diagnostic);
    }
}

fn load_config(path: Option<&Path>, max_amount: Option<Decimal>) -> Result<ParserConfig> {
    let mut config = match path {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    if let Some(max_amount) = max_amount {
        config.max_amount = max_amount;
    }
    config.validate()?;
    Ok(config)
}

fn read_text(input: &Path, plain_text: bool) -> Result<String> {
    if plain_text {
        return fs::read_to_string(input)
            .with_context(|| format!("Could not read input file {input:?}"));
    }
    let bytes = fs::read(input).with_context(|| format!("Could not read input file {input:?}"))?;
    extract_text(&bytes).with_context(|| format!("Could not extract PDF content from file {input:?}"))
}

fn write_to_csv(transactions: &[Transaction], file: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(file)
        .with_context(|| format!("Could not create output file {file:?}"))?;
    for transaction in transactions {
        writer.serialize(transaction)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_summary(extraction: &Extraction, sink: &SummarySink) {
    let transactions = &extraction.transactions;
    eprintln!("Detected format: {}", extraction.format);
    let Some(strategy) = extraction.strategy else {
        eprintln!("Warning: no withdrawals found in statement");
        return;
    };
    let skipped = sink
        .skipped
        .iter()
        .find(|(s, _)| *s == strategy)
        .map_or(0, |(_, skipped)| *skipped);
    let total: Decimal = transactions.iter().map(|t| t.amount).sum();
    eprintln!("Strategy: {strategy}");
    eprintln!("Withdrawals: {}", transactions.len());
    eprintln!("Skipped records: {skipped}");
    eprintln!("Total: {total}");
    let first = transactions.iter().map(|t| t.date).min();
    let last = transactions.iter().map(|t| t.date).max();
    if let (Some(first), Some(last)) = (first, last) {
        eprintln!("Date range: {first} to {last}");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let Args {
        input,
        output,
        print_lines,
        text,
        config,
        max_amount,
        verbose,
    } = Args::parse();
    init_logging(verbose)?;

    let config = load_config(config.as_deref(), max_amount)?;
    let text = read_text(&input, text)?;
    if print_lines {
        text.lines().for_each(|line| println!("{line}"));
    }

    let mut sink = SummarySink::default();
    let extraction = StatementParser::new(config).extract(&text, &mut sink);
    write_to_csv(&extraction.transactions, output.as_path())?;
    print_summary(&extraction, &sink);
    Ok(())
}
