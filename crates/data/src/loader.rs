//! CSV loading and normalization.
//!
//! Headers are trimmed and lowercased, then resolved against the alias lists
//! in [`ColumnConfig`]. Cells are coerced to typed values; anything that fails
//! to parse becomes `None` and is counted, never dropped and never fatal.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use sentiment_desk_core::{Classification, ColumnConfig, Side};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::DataError;
use crate::models::{Column, ColumnSet, SentimentRecord, SentimentTable, TradeRecord, TradeTable};

/// Row and coercion counts for one loaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub source: PathBuf,
    /// Data rows read from the file
    pub rows_read: usize,
    /// Rows that could not be kept at all (sentiment rows without a date)
    pub rows_dropped: usize,
    /// Cells that were present but failed to parse, by column
    pub unparseable: BTreeMap<Column, usize>,
}

impl LoadReport {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            ..Self::default()
        }
    }

    fn count_unparseable(&mut self, column: Column) {
        *self.unparseable.entry(column).or_insert(0) += 1;
    }

    #[must_use]
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }

    /// Formats a one-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{}: read {}, kept {}",
            self.source.display(),
            self.rows_read,
            self.rows_kept()
        );
        for (column, count) in &self.unparseable {
            s.push_str(&format!(", {count} unparseable {column}"));
        }
        s
    }
}

/// Trims and lowercases a header cell.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Finds the first alias present among normalized headers.
fn resolve(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

fn is_blank(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("null")
}

/// Parses a decimal, accepting plain and scientific notation. Magnitudes
/// outside the decimal range (about 7.9e28) do not parse.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let t = raw.trim();
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .ok()
}

#[must_use]
pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a timestamp using RFC 3339, the configured formats, date-only
/// formats, or epoch seconds/milliseconds, in that order.
#[must_use]
pub fn parse_timestamp(raw: &str, formats: &[String], date_formats: &[String]) -> Option<NaiveDateTime> {
    let t = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.naive_local());
    }

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, format) {
            return Some(dt);
        }
    }

    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(t, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    let epoch = t.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)?;
    #[allow(clippy::cast_possible_truncation)]
    let dt = if epoch >= 1e11 {
        DateTime::from_timestamp_millis(epoch as i64)
    } else {
        DateTime::from_timestamp(epoch as i64, 0)
    };
    dt.map(|d| d.naive_utc())
}

/// Parses a calendar date, falling back to a full timestamp.
#[must_use]
pub fn parse_date(raw: &str, date_formats: &[String], timestamp_formats: &[String]) -> Option<NaiveDate> {
    let t = raw.trim();
    date_formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(t, format).ok())
        .or_else(|| parse_timestamp(t, timestamp_formats, &[]).map(|dt| dt.date()))
}

/// Reads a cell, distinguishing "column absent", "blank" and "present".
fn cell<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| record.get(i))
        .filter(|raw| !is_blank(raw))
}

fn text(record: &StringRecord, index: Option<usize>) -> Option<String> {
    cell(record, index).map(|raw| raw.trim().to_string())
}

/// Loads the trade and sentiment files described by a [`ColumnConfig`].
#[derive(Debug, Clone)]
pub struct Loader {
    columns: ColumnConfig,
}

impl Loader {
    #[must_use]
    pub fn new(columns: ColumnConfig) -> Self {
        Self { columns }
    }

    fn open(path: &Path, kind: &'static str) -> Result<(csv::Reader<std::fs::File>, Vec<String>), DataError> {
        if !path.is_file() {
            return Err(DataError::MissingInput {
                kind,
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::csv(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::csv(path, e))?
            .iter()
            .map(normalize_header)
            .collect();

        Ok((reader, headers))
    }

    /// Loads the trade history.
    ///
    /// # Errors
    /// Returns `DataError::MissingInput` if the file does not exist, or a CSV
    /// error if the file is not readable as CSV.
    pub fn load_trades(&self, path: &Path) -> Result<(TradeTable, LoadReport), DataError> {
        let (mut reader, headers) = Self::open(path, "trade")?;
        let cfg = &self.columns;

        let pnl = resolve(&headers, &cfg.pnl);
        let timestamp = resolve(&headers, &cfg.timestamp);
        let side = resolve(&headers, &cfg.side);
        let price = resolve(&headers, &cfg.execution_price);
        let size = resolve(&headers, &cfg.size);
        let account = resolve(&headers, &cfg.account);
        let coin = resolve(&headers, &cfg.coin);

        let columns: ColumnSet = [
            (pnl, Column::ClosedPnl),
            (timestamp, Column::Timestamp),
            (side, Column::Side),
            (price, Column::ExecutionPrice),
            (size, Column::Size),
            (account, Column::Account),
            (coin, Column::Coin),
        ]
        .into_iter()
        .filter_map(|(index, column)| index.map(|_| column))
        .collect();

        for (index, column) in [(pnl, Column::ClosedPnl), (timestamp, Column::Timestamp), (side, Column::Side)] {
            if index.is_none() {
                tracing::warn!("{}: no {} column, dependent sections will be skipped", path.display(), column);
            }
        }

        let mut report = LoadReport::new(path);
        let mut records = Vec::new();

        for (i, result) in reader.records().enumerate() {
            let record = result.map_err(|e| DataError::csv(path, e))?;
            report.rows_read += 1;

            let mut trade = TradeRecord {
                source_row: i + 1,
                ..TradeRecord::default()
            };

            if let Some(raw) = cell(&record, timestamp) {
                trade.timestamp = parse_timestamp(raw, &cfg.timestamp_formats, &cfg.date_formats);
                if trade.timestamp.is_none() {
                    report.count_unparseable(Column::Timestamp);
                }
            }
            trade.date = trade.timestamp.map(|ts| ts.date());

            if let Some(raw) = cell(&record, pnl) {
                trade.closed_pnl = parse_decimal(raw);
                if trade.closed_pnl.is_none() {
                    report.count_unparseable(Column::ClosedPnl);
                }
            }
            if let Some(raw) = cell(&record, price) {
                trade.execution_price = parse_decimal(raw);
                if trade.execution_price.is_none() {
                    report.count_unparseable(Column::ExecutionPrice);
                }
            }
            if let Some(raw) = cell(&record, size) {
                trade.size = parse_decimal(raw);
                if trade.size.is_none() {
                    report.count_unparseable(Column::Size);
                }
            }

            trade.side = cell(&record, side).and_then(Side::parse_label);
            trade.account = text(&record, account);
            trade.coin = text(&record, coin);

            records.push(trade);
        }

        tracing::info!("Loaded trades {}", report.summary());
        Ok((TradeTable::new(records, columns), report))
    }

    /// Loads the sentiment index.
    ///
    /// A file without a date column yields an empty table whose classification
    /// and value columns are marked absent, since nothing in it can be joined.
    ///
    /// # Errors
    /// Returns `DataError::MissingInput` if the file does not exist, or a CSV
    /// error if the file is not readable as CSV.
    pub fn load_sentiment(&self, path: &Path) -> Result<(SentimentTable, LoadReport), DataError> {
        let (mut reader, headers) = Self::open(path, "sentiment")?;
        let cfg = &self.columns;

        let date = resolve(&headers, &cfg.sentiment_date);
        let classification = resolve(&headers, &cfg.classification);
        let value = resolve(&headers, &cfg.value);

        let mut report = LoadReport::new(path);

        let Some(date) = date else {
            tracing::warn!("{}: no date column, sentiment cannot be joined", path.display());
            report.rows_read = reader.records().count();
            report.rows_dropped = report.rows_read;
            return Ok((SentimentTable::default(), report));
        };

        let mut columns = ColumnSet::new();
        if classification.is_some() {
            columns.insert(Column::Classification);
        }
        if value.is_some() {
            columns.insert(Column::Value);
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| DataError::csv(path, e))?;
            report.rows_read += 1;

            let Some(day) = cell(&record, Some(date))
                .and_then(|raw| parse_date(raw, &cfg.date_formats, &cfg.timestamp_formats))
            else {
                report.rows_dropped += 1;
                continue;
            };

            let parsed_value = cell(&record, value).and_then(|raw| {
                let parsed = parse_f64(raw);
                if parsed.is_none() {
                    report.count_unparseable(Column::Value);
                }
                parsed
            });

            records.push(SentimentRecord {
                date: day,
                classification: cell(&record, classification).and_then(Classification::parse_label),
                value: parsed_value,
            });
        }

        if report.rows_dropped > 0 {
            tracing::warn!(
                "{}: dropped {} sentiment rows without a parseable date",
                path.display(),
                report.rows_dropped
            );
        }
        tracing::info!("Loaded sentiment {}", report.summary());
        Ok((SentimentTable::new(records, columns), report))
    }
}
