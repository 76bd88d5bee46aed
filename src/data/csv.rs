//! Roster CSV loading

use crate::data::{RawNomination, RawSurveyRow, FRIEND_SLOTS};
use crate::error::AnalysisError;
use anyhow::{Context, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of export metadata lines preceding the header row
const METADATA_LINES: usize = 5;

const COL_GROUP: &str = "Group";
const COL_SUBJECT: &str = "Select your Number";

/// (friend column, strength column) per nomination slot
const FRIEND_COLUMNS: [(&str, &str); FRIEND_SLOTS] = [
    ("Select Close Friend 1", "How close are you to Close Friend 1?"),
    ("Select Close Friend 2", "How close are you to Close Friend 2?"),
    ("Select Close Friend 3", "How close are you to Close Friend 3?"),
];

/// Load a survey roster from a CSV export file
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<RawSurveyRow>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening roster {}", path.display()))?;
    read_roster(BufReader::new(file))
}

/// Read a roster export: skip the metadata lines preceding the header
/// row, then parse the data rows.
///
/// The export carries 5 metadata lines before the header; both are
/// consumed here so callers receive only data rows, in file order.
/// Field values are kept raw: per-group validation happens later so a
/// malformed row cannot abort the whole roster.
pub fn read_roster<R: BufRead>(mut reader: R) -> Result<Vec<RawSurveyRow>> {
    let mut skipped = String::new();
    for _ in 0..METADATA_LINES {
        skipped.clear();
        reader
            .read_line(&mut skipped)
            .context("skipping roster metadata")?;
    }

    parse_roster(reader)
}

/// Parse roster rows from a reader positioned at the header row
pub fn parse_roster<R: std::io::Read>(reader: R) -> Result<Vec<RawSurveyRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let group_col = column_index(&headers, COL_GROUP)?;
    let subject_col = column_index(&headers, COL_SUBJECT)?;
    let mut friend_cols = Vec::with_capacity(FRIEND_SLOTS);
    for (friend, strength) in FRIEND_COLUMNS {
        friend_cols.push((column_index(&headers, friend)?, column_index(&headers, strength)?));
    }

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        rows.push(read_row(&record, index + 1, group_col, subject_col, &friend_cols));
    }

    log::debug!("Parsed {} roster rows", rows.len());

    Ok(rows)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| AnalysisError::data(format!("missing column '{name}'")).into())
}

fn read_row(
    record: &StringRecord,
    line: usize,
    group_col: usize,
    subject_col: usize,
    friend_cols: &[(usize, usize)],
) -> RawSurveyRow {
    let mut nominations: [Option<RawNomination>; FRIEND_SLOTS] = [None, None, None];
    for (slot, &(friend_col, strength_col)) in friend_cols.iter().enumerate() {
        let friend = field(record, friend_col);
        if friend.is_empty() {
            continue;
        }
        nominations[slot] = Some(RawNomination {
            friend: friend.to_string(),
            strength: field(record, strength_col).to_string(),
        });
    }

    RawSurveyRow {
        group: field(record, group_col).to_string(),
        subject: field(record, subject_col).to_string(),
        line,
        nominations,
    }
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("").trim()
}
