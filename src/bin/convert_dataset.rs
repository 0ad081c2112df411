//! Dataset conversion CLI.
//!
//! Usage:
//!   convert_dataset --database mahjong.db --output-dir ./converted
//!
//! Produces eight `*.json.gz` archives (one per decision table) inside the
//! output directory. Each line in those archives is one mjai event; each
//! row of the database becomes one synthetic game log.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mjai_export::export::run_conversion;

#[derive(Parser, Debug)]
#[command(
    name = "convert_dataset",
    about = "Convert the Kaggle SQLite dataset into mjai logs"
)]
struct Args {
    /// Path to the Kaggle SQLite database.
    #[arg(long)]
    database: PathBuf,

    /// Directory to store the converted mjai logs.
    #[arg(long)]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let results = run_conversion(&args.database, &args.output_dir)?;
    for result in &results {
        println!(
            "Exported {} rows from {} to {}",
            result.rows,
            result.table,
            result.output.display()
        );
    }

    Ok(())
}
