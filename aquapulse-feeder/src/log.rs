use std::fs::OpenOptions;
use std::path::PathBuf;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::FeederError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Append-only CSV record of feeding decisions. The header is written when
/// the file is first created.
pub struct FeedLog {
    path: PathBuf,
}

impl FeedLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(
        &self,
        at: OffsetDateTime,
        coverage_pct: f64,
        action: &str,
    ) -> Result<(), FeederError> {
        let is_new = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if is_new {
            writer.write_record(["Timestamp", "Coverage(%)", "Action"])?;
        }

        writer.write_record([
            at.format(&TIMESTAMP_FORMAT)?,
            format!("{coverage_pct:.2}"),
            action.to_string(),
        ])?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use time::macros::datetime;

    use super::*;

    #[test]
    fn header_written_once_rows_appended() {
        let path = std::env::temp_dir().join(format!("aquapulse-feedlog-{}.csv", std::process::id()));
        let _ = fs::remove_file(&path);

        let log = FeedLog::new(path.clone());
        log.append(datetime!(2026-08-28 04:00 UTC), 22.5, "DISPENSED")
            .unwrap();
        log.append(datetime!(2026-08-28 22:00 UTC), 41.0, "SKIPPED")
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Timestamp,Coverage(%),Action\n\
             2026-08-28 04:00:00,22.50,DISPENSED\n\
             2026-08-28 22:00:00,41.00,SKIPPED\n"
        );
    }
}
