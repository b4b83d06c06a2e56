use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sentiment_desk_analytics::{Pipeline, ReportFormatter, Section};
use sentiment_desk_core::{AppConfig, Classification};
use sentiment_desk_data::{Column, FilterSpec};
use std::fs;
use tempfile::TempDir;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

fn pipeline(dir: &TempDir, trades: &str, sentiment: &str) -> Pipeline {
    let trades_path = dir.path().join("historical_data.csv");
    let sentiment_path = dir.path().join("fear_greed_index.csv");
    fs::write(&trades_path, trades).unwrap();
    fs::write(&sentiment_path, sentiment).unwrap();

    let mut config = AppConfig::default();
    config.data.trades_path = trades_path;
    config.data.sentiment_path = sentiment_path;
    Pipeline::new(config)
}

const TRADES: &str = "Account,Coin,Execution Price,Size Tokens,Side,Timestamp IST,Closed PnL\n\
                      0xabc,BTC,100,1,BUY,01-01-2023 09:00,10\n\
                      0xabc,BTC,110,1,SELL,01-01-2023 15:30,-5\n\
                      0xdef,ETH,99,2,BUY,02-01-2023 11:00,20\n";

const SENTIMENT: &str = "timestamp,value,classification,date\n\
                         1672531200,20,Fear,2023-01-01\n\
                         1672617600,30,Greed,2023-01-02\n";

#[test]
fn merged_example_matches_hand_computation() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = pipeline(&dir, TRADES, SENTIMENT);

    let dataset = pipeline.dataset().unwrap();
    let table = &dataset.table;
    assert_eq!(table.len(), 3);
    assert_eq!(dataset.duplicate_sentiment_dates, 0);

    for row in table.rows() {
        if row.date() == Some(d(1)) {
            assert_eq!(row.volume_change(), None);
            assert_eq!(row.classification(), Some(&Classification::Fear));
        } else {
            assert_eq!(row.volume_change(), Some(0.5));
            assert_eq!(row.classification(), Some(&Classification::Greed));
        }
    }

    let report = pipeline.report(&FilterSpec::new()).unwrap();
    assert_eq!(report.kpis.total_trades, 3);
    assert_eq!(report.kpis.total_pnl, Some(dec!(25)));
    let win_rate = report.kpis.win_rate.unwrap();
    assert!((win_rate - 66.67).abs() < 0.01);
    assert!(report.recommendations.is_some());

    let Section::Available(sides) = &report.side_ratios else {
        panic!("side ratios should be available");
    };
    let fear_total: f64 = sides
        .iter()
        .filter(|s| s.classification == Classification::Fear)
        .map(|s| s.ratio)
        .sum();
    assert!((fear_total - 1.0).abs() < 1e-12);

    // Three rows cannot feed an 80/20 split with both classes.
    assert!(!report.classifier.is_available());

    let text = ReportFormatter::format(&report);
    assert!(text.contains("Total PnL:             25.00"));
    assert!(text.contains("Win Rate:              66.67%"));
}

#[test]
fn filtering_keeps_frozen_volume_change() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = pipeline(&dir, TRADES, SENTIMENT);

    let greed_only = pipeline
        .select(&FilterSpec::new().with_classifications([Classification::Greed]))
        .unwrap();
    assert_eq!(greed_only.len(), 1);
    // Still measured against 2023-01-01, which the filter removed.
    assert_eq!(greed_only.rows()[0].volume_change(), Some(0.5));
}

#[test]
fn range_without_rows_reports_na() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = pipeline(&dir, TRADES, SENTIMENT);

    let filter = FilterSpec::new()
        .with_start(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .with_end(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    let report = pipeline.report(&filter).unwrap();

    assert_eq!(report.kpis.total_trades, 0);
    assert_eq!(report.kpis.total_pnl, None);
    assert_eq!(report.kpis.win_rate, None);
    assert!(report.recommendations.is_none());
    assert_eq!(report.classifier.reason(), Some("no trades in selection"));

    let text = ReportFormatter::format(&report);
    assert!(text.contains("Win Rate:              N/A"));
}

#[test]
fn end_date_is_inclusive() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = pipeline(&dir, TRADES, SENTIMENT);

    let report = pipeline
        .report(&FilterSpec::new().with_start(d(1)).with_end(d(1)))
        .unwrap();
    // The 15:30 trade on the end date is included.
    assert_eq!(report.kpis.total_trades, 2);
    assert_eq!(report.kpis.total_pnl, Some(dec!(5)));
}

#[test]
fn missing_side_column_only_disables_its_section() {
    let dir = TempDir::new().unwrap();
    let trades = "Timestamp IST,Closed PnL\n\
                  01-01-2023 09:00,10\n\
                  02-01-2023 09:00,oops\n";
    let mut pipeline = pipeline(&dir, trades, SENTIMENT);

    let report = pipeline.report(&FilterSpec::new()).unwrap();
    assert_eq!(report.side_ratios.reason(), Some("missing column: side"));
    assert!(report.daily_pnl.is_available());
    assert_eq!(report.kpis.total_trades, 2);
    assert_eq!(report.kpis.trades_with_pnl, 1);
    assert_eq!(report.kpis.win_rate, Some(100.0));

    let dataset = pipeline.dataset().unwrap();
    assert!(!dataset.table.columns().contains(Column::Side));
    assert_eq!(
        dataset.trades_report.unparseable.get(&Column::ClosedPnl),
        Some(&1)
    );
}

#[test]
fn sentiment_without_values_disables_classifier() {
    let dir = TempDir::new().unwrap();
    let sentiment = "date,classification\n2023-01-01,Fear\n2023-01-02,Greed\n";
    let mut pipeline = pipeline(&dir, TRADES, sentiment);

    let section = pipeline.classifier(&FilterSpec::new()).unwrap();
    assert_eq!(
        section.reason(),
        Some("required features not available: volume_change")
    );
}
