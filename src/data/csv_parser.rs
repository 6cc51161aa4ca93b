//! CSV and TSV parsing
//!
//! Parses delimited text with a header row into a `TabularDataset`,
//! inferring each column's type from its values.
//!
//! ## Memory Limits
//!
//! The eager reader stops with [`DataError::TooManyRows`] once `max_rows`
//! data rows have been read; callers switch to the polars loader in
//! `lazy_source` for such files.

use crate::constants::DELIMITER_SNIFF_LINES;
use crate::data::error::{DataError, DataResult};
use crate::data::infer::infer_column;
use crate::types::{Column, TabularDataset};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a CSV or TSV file into a dataset
///
/// The delimiter comes from the extension (`.tsv` uses tab) or, failing
/// that, from whichever of `,` `;` `\t` dominates the first lines.
pub fn parse_csv_file(path: &Path, max_rows: usize) -> DataResult<TabularDataset> {
    let content = String::from_utf8(std::fs::read(path)?)
        .map_err(|e| DataError::Parse(format!("{} is not valid UTF-8: {}", path.display(), e)))?;
    let delimiter = detect_delimiter(path, &content);
    parse_csv_content(&content, delimiter, max_rows)
}

/// Parse delimited content from a string
pub fn parse_csv_content(
    content: &str,
    delimiter: u8,
    max_rows: usize,
) -> DataResult<TabularDataset> {
    if content.trim().is_empty() {
        return Err(DataError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(DataError::EmptyFile);
    }

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if rows.len() >= max_rows {
            return Err(DataError::TooManyRows {
                rows: rows.len() + 1,
                max_rows,
            });
        }
        rows.push(record);
    }

    // Short rows are padded with missing values, long rows are truncated
    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values = rows
                .iter()
                .map(|row| row.get(i).filter(|s| !s.is_empty()).map(str::to_string))
                .collect();
            Column::new(name.clone(), infer_column(values))
        })
        .collect();

    TabularDataset::new(columns)
}

/// Read the first few lines of a file for delimiter detection
pub fn read_sample(path: &Path) -> DataResult<String> {
    let reader = BufReader::new(File::open(path)?);
    let mut sample = String::new();
    for line in reader.lines().take(DELIMITER_SNIFF_LINES) {
        let line = line.map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => {
                DataError::Parse(format!("{} is not valid UTF-8", path.display()))
            }
            _ => DataError::Io(e),
        })?;
        sample.push_str(&line);
        sample.push('\n');
    }
    Ok(sample)
}

/// Detect the delimiter to use for parsing
pub fn detect_delimiter(path: &Path, content: &str) -> u8 {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if ext.eq_ignore_ascii_case("tsv") {
            return b'\t';
        }
    }

    let first_lines: String = content
        .lines()
        .take(DELIMITER_SNIFF_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let semicolon_count = first_lines.matches(';').count();

    if tab_count > comma_count && tab_count > semicolon_count {
        b'\t'
    } else if semicolon_count > comma_count {
        b';'
    } else {
        b','
    }
}
