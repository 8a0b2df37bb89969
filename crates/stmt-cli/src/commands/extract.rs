//! Extract command - extract records from a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rust_decimal::Decimal;
use stmt_core::models::{FieldValue, PayloadMode};
use stmt_core::publish::{flatten, publish_extraction, write_local, JsonLinesSink};
use stmt_core::statement::rules::format_br_amount;
use stmt_core::{AccountRouter, Extraction, StatementExtractor};

use super::{account_for, load_config, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input statement (xlsx, xlsm, xlsb, xls, ods)
    #[arg(required = true)]
    input: PathBuf,

    /// Account stamped on every record (default: routed from the parent folder)
    #[arg(short, long)]
    account: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Sheet to read (default: first sheet)
    #[arg(short, long)]
    sheet: Option<String>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let router = AccountRouter::new(&config.accounts);
    let account = account_for(&router, args.account.as_deref(), &args.input)?;
    info!("Processing file: {} (account={})", args.input.display(), account);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Reading statement...");

    let sheet = args.sheet.clone().or_else(|| config.workbook.sheet.clone());
    let extractor = StatementExtractor::with_config(config.clone()).with_sheet(sheet);
    let extraction = extractor.extract_path(&args.input, &account)?;

    pb.finish_and_clear();

    match (&args.output, args.format) {
        (Some(output_path), OutputFormat::Json) => {
            write_local(&extraction.blocks, output_path)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        }
        (Some(output_path), format) => {
            fs::write(output_path, render(&extraction, format)?)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        }
        (None, format) => print!("{}", render(&extraction, format)?),
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render an extraction in the requested format.
pub fn render(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&extraction.blocks)? + "\n"),
        OutputFormat::Jsonl => {
            let mut sink = JsonLinesSink::new(Vec::new());
            publish_extraction(&mut sink, &extraction.blocks, PayloadMode::PerRecord)?;
            Ok(String::from_utf8(sink.into_inner()?)?)
        }
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_csv(extraction: &Extraction) -> anyhow::Result<String> {
    let records = flatten(extraction.blocks.clone());

    // Union of keys in first-seen order; blocks may have different headers.
    let mut columns: Vec<&str> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&columns)?;
    for record in &records {
        wtr.write_record(
            columns
                .iter()
                .map(|c| record.get(c).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &Extraction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", extraction.account));
    output.push_str(&format!("Blocks: {}\n", extraction.blocks.len()));
    output.push_str(&format!("Records: {}\n", extraction.record_count()));
    if extraction.stopped_early {
        output.push_str(&format!(
            "Stopped early after {} rows\n",
            extraction.rows_scanned
        ));
    }
    output.push('\n');

    for (i, block) in extraction.blocks.iter().enumerate() {
        let total = block
            .iter()
            .flat_map(|r| r.iter())
            .filter_map(|(_, value)| match value {
                FieldValue::Amount(amount) => Some(*amount),
                _ => None,
            })
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount));
        output.push_str(&format!(
            "  Block {}: {} records, total {}\n",
            i + 1,
            block.len(),
            total.map(format_br_amount).unwrap_or_else(|| "overflow".to_string())
        ));
    }

    output
}
