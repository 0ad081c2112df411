//! Reads category tables from the SQLite dataset and writes one mjai log
//! archive per category.
//!
//! Conversion is strictly fail-fast: a malformed row aborts the whole run
//! with a message naming the row and table, rather than silently dropping
//! samples from the emitted corpus.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use rusqlite::Connection;

use crate::convert::{Category, build_row_events};
use crate::snapshot::Snapshot;

/// Summary of one exported category table.
#[derive(Debug, Clone)]
pub struct TableExport {
    pub table: &'static str,
    pub rows: usize,
    pub output: PathBuf,
}

/// Convert every category table of `database`, writing one
/// `<table>.json.gz` per category into `output_dir`. Stops at the first
/// failing table.
pub fn run_conversion(database: &Path, output_dir: &Path) -> Result<Vec<TableExport>> {
    let conn = Connection::open(database)
        .with_context(|| format!("failed to open {}", database.display()))?;

    Category::ALL
        .iter()
        .map(|&category| export_category(&conn, category, output_dir))
        .collect()
}

/// Export a single category: fetch all rows, build each row's event
/// sequence, and stream the serialized lines into the category's archive
/// in row order.
pub fn export_category(
    conn: &Connection,
    category: Category,
    output_dir: &Path,
) -> Result<TableExport> {
    let table = category.table_name();
    let rows = fetch_rows(conn, table)?;
    ensure!(!rows.is_empty(), "table {table} is empty");

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let output = output_dir.join(format!("{}.json.gz", table.to_lowercase()));
    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut gz = GzEncoder::new(BufWriter::new(file), Compression::default());

    for (id, blob) in &rows {
        let snapshot = decode_row(blob)
            .with_context(|| format!("failed to decode row {id} in {table}"))?;
        let events = build_row_events(category, &snapshot)
            .with_context(|| format!("failed to convert row {id} in {table}"))?;
        for event in &events {
            let line = serde_json::to_string(event)
                .with_context(|| format!("failed to serialize event for row {id} in {table}"))?;
            gz.write_all(line.as_bytes())?;
            gz.write_all(b"\n")?;
        }
    }
    gz.finish()
        .with_context(|| format!("failed to finish {}", output.display()))?;

    Ok(TableExport {
        table,
        rows: rows.len(),
        output,
    })
}

/// All `(id, blob)` pairs of a table, in storage order.
fn fetch_rows(conn: &Connection, table: &str) -> Result<Vec<(i64, Vec<u8>)>> {
    let mut stmt = conn
        .prepare(&format!("SELECT id, data FROM {table}"))
        .with_context(|| format!("failed to query table {table}"))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .with_context(|| format!("failed to read table {table}"))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read table {table}"))
}

/// Decompress and decode one row's snapshot blob.
fn decode_row(blob: &[u8]) -> Result<Snapshot> {
    let mut json = String::new();
    GzDecoder::new(blob)
        .read_to_string(&mut json)
        .context("failed to decompress snapshot blob")?;
    serde_json::from_str(&json).context("failed to decode snapshot")
}
