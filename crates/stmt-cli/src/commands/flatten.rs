//! Flatten command - turn a published payload back into a flat record list.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use stmt_core::publish::{decode_blocks, flatten};

/// Arguments for the flatten command.
#[derive(Args)]
pub struct FlattenArgs {
    /// Payload file holding a JSON array of blocks
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: FlattenArgs) -> anyhow::Result<()> {
    let payload = fs::read(&args.input)?;
    let blocks = decode_blocks(&payload)?;
    info!("Payload received: {} block(s)", blocks.len());

    let records = flatten(blocks);
    let output = serde_json::to_string_pretty(&records)? + "\n";

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => print!("{}", output),
    }

    info!("{} record(s) flattened", records.len());
    Ok(())
}
