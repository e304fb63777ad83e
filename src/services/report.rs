use chrono::NaiveDateTime;

use crate::domain::comparison::{ComparisonRecord, CorruptLogRecord, StoredComparison};
use crate::domain::types::DISPLAY_FORMAT;
use crate::repository::ComparisonLogReader;

use super::{ServiceError, ServiceResult};

/// One history entry. A row whose payload cannot be decoded is reported on
/// its own and does not hide the others.
pub type ReportRow = Result<ComparisonRecord, CorruptLogRecord>;

const CSV_HEADERS: [&str; 9] = [
    "ts1",
    "ts2",
    "new_count",
    "removed_count",
    "updated_count",
    "new_items",
    "removed_items",
    "updated_items",
    "log_time",
];

fn load_comparisons<R>(repo: &R) -> ServiceResult<Vec<StoredComparison>>
where
    R: ComparisonLogReader,
{
    match repo.list_comparisons() {
        Ok(rows) => Ok(rows),
        Err(e) => {
            log::error!("Failed to list comparison log: {e}");
            Err(e.into())
        }
    }
}

/// Returns the comparison history, most recent first, with payloads decoded.
pub fn show_comparison_log<R>(repo: &R) -> ServiceResult<Vec<ReportRow>>
where
    R: ComparisonLogReader,
{
    let rows = load_comparisons(repo)?
        .iter()
        .map(|stored| {
            let decoded = stored.decode();
            if let Err(e) = &decoded {
                log::warn!("{e}");
            }
            decoded
        })
        .collect();

    Ok(rows)
}

/// Renders the comparison history as CSV, most recent first.
///
/// Payload columns are written as stored so corrupt rows still export.
pub fn export_comparison_log_csv<R>(repo: &R) -> ServiceResult<Vec<u8>>
where
    R: ComparisonLogReader,
{
    let rows = load_comparisons(repo)?;

    let mut writer = csv::Writer::from_writer(vec![]);
    if let Err(e) = writer.write_record(CSV_HEADERS) {
        log::error!("Failed to render comparison log csv: {e}");
        return Err(ServiceError::Internal);
    }
    for row in &rows {
        let record = [
            escape_csv_cell(row.ts1.as_deref().unwrap_or_default()),
            escape_csv_cell(row.ts2.as_deref().unwrap_or_default()),
            row.new_count.to_string(),
            row.removed_count.to_string(),
            row.updated_count.to_string(),
            escape_csv_cell(&row.new_items),
            escape_csv_cell(&row.removed_items),
            escape_csv_cell(&row.updated_items),
            time_cell(row.log_time),
        ];
        if let Err(e) = writer.write_record(&record) {
            log::error!("Failed to render comparison log csv: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match writer.into_inner() {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            log::error!("Failed to render comparison log csv: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn time_cell(time: NaiveDateTime) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

fn escape_csv_cell(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}
