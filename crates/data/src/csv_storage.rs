use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::error::DataError;
use crate::features::AnalysisTable;

pub struct CsvStorage;

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvStorage {
    pub const HEADER: [&'static str; 12] = [
        "timestamp",
        "date",
        "account",
        "coin",
        "side",
        "execution_price",
        "size",
        "closed_pnl",
        "classification",
        "value",
        "volume_change",
        "price_return",
    ];

    /// Writes the analysis table to a CSV file, one row per trade in table order.
    ///
    /// Missing cells are written as empty strings.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_analysis_table(path: &Path, table: &AnalysisTable) -> Result<(), DataError> {
        let file = File::create(path).map_err(|e| DataError::io(path, e))?;
        let mut writer = Writer::from_writer(file);

        writer
            .write_record(Self::HEADER)
            .map_err(|e| DataError::csv(path, e))?;

        for row in table.rows() {
            let trade = row.trade();
            writer
                .write_record(&[
                    opt(trade.timestamp.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S"))),
                    opt(trade.date),
                    trade.account.clone().unwrap_or_default(),
                    trade.coin.clone().unwrap_or_default(),
                    opt(trade.side.as_ref()),
                    opt(trade.execution_price),
                    opt(trade.size),
                    opt(trade.closed_pnl),
                    opt(row.classification()),
                    opt(row.sentiment_value()),
                    opt(row.volume_change()),
                    opt(row.price_return()),
                ])
                .map_err(|e| DataError::csv(path, e))?;
        }

        writer.flush().map_err(|e| DataError::io(path, e))?;
        tracing::info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }
}
