//! Append-only CSV log of per-cycle predictions.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use common::{Error, PredictionRecord, Result};
use tracing::{debug, warn};

pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    /// Open a log at `path`, creating parent directories as needed. The file
    /// itself is created lazily on first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. The header row is written only when the file is
    /// first created. Records are never updated or deleted; write failures
    /// are logged as warnings, not escalated.
    pub fn append(&self, record: &PredictionRecord) {
        if let Err(e) = self.try_append(record) {
            warn!("Prediction log write failed: {}", e);
        }
    }

    fn try_append(&self, record: &PredictionRecord) -> Result<()> {
        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| Error::Log(e.to_string()))?;
        writer.flush()?;

        debug!("Appended prediction to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(sentiment_score: i64) -> PredictionRecord {
        PredictionRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            spx: Some(5900.5),
            es: None,
            vix: Some(17.4),
            sentiment_score,
            predicted_trend: "📉 Bearish".to_string(),
            predicted_move_pts: None,
        }
    }

    fn temp_log(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("premarket-{}-{}.csv", name, std::process::id()))
    }

    #[test]
    fn test_header_written_exactly_once() {
        let path = temp_log("header-once");
        let _ = std::fs::remove_file(&path);

        let log = PredictionLog::open(&path).unwrap();
        log.append(&make_record(0));
        log.append(&make_record(3));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "date,spx,es,vix,sentiment_score,predicted_trend,predicted_move_pts"
        );
        assert!(lines[1].starts_with("2025-07-14,"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_signals_serialize_as_empty_cells() {
        let path = temp_log("missing-cells");
        let _ = std::fs::remove_file(&path);

        let log = PredictionLog::open(&path).unwrap();
        log.append(&make_record(-3));

        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        // es and predicted_move_pts are Missing: empty cells, not zeros.
        assert_eq!(row, "2025-07-14,5900.5,,17.4,-3,📉 Bearish,");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_reopen_does_not_rewrite_header() {
        let path = temp_log("reopen");
        let _ = std::fs::remove_file(&path);

        {
            let log = PredictionLog::open(&path).unwrap();
            log.append(&make_record(0));
        }
        {
            let log = PredictionLog::open(&path).unwrap();
            log.append(&make_record(6));
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let header_count = contents
            .lines()
            .filter(|l| l.starts_with("date,"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 3);

        let _ = std::fs::remove_file(&path);
    }
}
