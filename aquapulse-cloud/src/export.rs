use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::errors::ExportError;
use crate::telemetry::Telemetry;
use crate::telemetry::coerce;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const STATUS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]");

/// Header of the combined export after renaming, first column being the
/// timestamp.
pub const RENAMED_HEADER: [&str; 4] = ["date", "pH", "Temperature", "EC"];

const SPLIT_FILES: [(usize, &str); 3] = [
    (1, "edenic1_ph.csv"),
    (2, "edenic1_temp.csv"),
    (3, "edenic1_ec.csv"),
];

fn render_ms(ts_ms: i64) -> Result<String, ExportError> {
    let when = OffsetDateTime::from_unix_timestamp_nanos(ts_ms as i128 * 1_000_000)?;
    Ok(when.format(&TIMESTAMP_FORMAT)?)
}

/// Write one `edenic_<param>.csv` per telemetry series, header
/// `timestamp,<param>`. Series with no usable samples are skipped. Returns
/// the written paths.
pub fn export_per_parameter(
    telemetry: &Telemetry,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();

    for (key, samples) in telemetry {
        let points = coerce(samples, key);
        if points.is_empty() {
            tracing::warn!(key, "no usable samples, skipping export");
            continue;
        }

        let path = out_dir.join(format!("edenic_{key}.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["timestamp", key.as_str()])?;
        for point in &points {
            writer.write_record([render_ms(point.ts)?, point.value.to_string()])?;
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), records = points.len(), "exported series");
        written.push(path);
    }

    Ok(written)
}

/// Read a previously exported combined CSV, rewrite it with the renamed
/// header as `export_mod.csv`, and produce one two-column file per
/// measurement. Returns the written paths, combined file first.
pub fn rename_and_split(input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    let mut reader = csv::Reader::from_path(input)?;

    // The reader rejects ragged data rows itself, so the header is the one
    // place the shape has to be checked. This also catches a wrong-shape
    // file with no data rows at all.
    let header_width = reader.headers()?.len();
    if header_width != RENAMED_HEADER.len() {
        return Err(ExportError::ColumnCount {
            found: header_width,
            expected: RENAMED_HEADER.len(),
        });
    }

    let rows = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;

    let mut written = Vec::new();

    let combined = out_dir.join("export_mod.csv");
    let mut writer = csv::Writer::from_path(&combined)?;
    writer.write_record(RENAMED_HEADER)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    written.push(combined);

    for (column, name) in SPLIT_FILES {
        let path = out_dir.join(name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([RENAMED_HEADER[0], RENAMED_HEADER[column]])?;
        for row in &rows {
            writer.write_record([
                row.get(0).unwrap_or_default(),
                row.get(column).unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        written.push(path);
    }

    Ok(written)
}

/// Append-only log of spot temperature readings, one row per poll. The
/// header is written when the file is first created; timestamps are rendered
/// in the configured fixed UTC offset.
pub struct StatusLog {
    path: PathBuf,
    offset: UtcOffset,
}

impl StatusLog {
    pub fn new(path: PathBuf, utc_offset_hours: i8) -> Result<Self, ExportError> {
        let offset = UtcOffset::from_hms(utc_offset_hours, 0, 0)?;
        Ok(Self { path, offset })
    }

    pub fn append(&self, temperature: f64) -> Result<(), ExportError> {
        self.append_at(OffsetDateTime::now_utc(), temperature)
    }

    pub fn append_at(&self, at: OffsetDateTime, temperature: f64) -> Result<(), ExportError> {
        let is_new = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if is_new {
            writer.write_record(["DateTime", "Temperature"])?;
        }

        let local = at.to_offset(self.offset);
        writer.write_record([local.format(&STATUS_FORMAT)?, temperature.to_string()])?;
        writer.flush()?;

        tracing::info!(temperature, path = %self.path.display(), "appended reading");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use time::macros::datetime;

    use super::*;
    use crate::telemetry::Sample;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("aquapulse-export-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample(ts: i64, value: &str) -> Sample {
        Sample {
            ts,
            value: value.to_string(),
        }
    }

    #[test]
    fn renders_epoch_ms_as_utc() {
        // 2025-07-01 00:00:00 UTC
        assert_eq!(render_ms(1_751_328_000_000).unwrap(), "2025-07-01 00:00:00");
    }

    #[test]
    fn per_parameter_export_writes_one_file_per_series() {
        let dir = scratch_dir("per-param");
        let mut telemetry = Telemetry::new();
        telemetry.insert(
            "temperature".to_string(),
            vec![sample(1_751_328_000_000, "24.6"), sample(1_751_338_800_000, "bad")],
        );
        telemetry.insert("ph".to_string(), vec![sample(1_751_328_000_000, "6.8")]);
        telemetry.insert("electrical_conductivity".to_string(), vec![]);

        let written = export_per_parameter(&telemetry, &dir).unwrap();

        // The empty series is skipped.
        assert_eq!(written.len(), 2);

        let temperature = fs::read_to_string(dir.join("edenic_temperature.csv")).unwrap();
        let mut lines = temperature.lines();
        assert_eq!(lines.next(), Some("timestamp,temperature"));
        assert_eq!(lines.next(), Some("2025-07-01 00:00:00,24.6"));
        // The non-numeric sample is dropped.
        assert_eq!(lines.next(), None);

        let ph = fs::read_to_string(dir.join("edenic_ph.csv")).unwrap();
        assert!(ph.starts_with("timestamp,ph\n"));
    }

    #[test]
    fn rename_and_split_produces_expected_headers() {
        let dir = scratch_dir("rename");
        let input = dir.join("export.csv");
        fs::write(
            &input,
            ",ph,temperature,electrical_conductivity\n\
             2025-07-01 00:00:00,6.8,24.6,1.52\n\
             2025-07-01 03:00:00,6.9,24.9,1.49\n",
        )
        .unwrap();

        let written = rename_and_split(&input, &dir).unwrap();
        assert_eq!(written.len(), 4);

        let combined = fs::read_to_string(dir.join("export_mod.csv")).unwrap();
        assert!(combined.starts_with("date,pH,Temperature,EC\n"));
        assert!(combined.contains("2025-07-01 03:00:00,6.9,24.9,1.49"));

        let ph = fs::read_to_string(dir.join("edenic1_ph.csv")).unwrap();
        assert_eq!(
            ph,
            "date,pH\n2025-07-01 00:00:00,6.8\n2025-07-01 03:00:00,6.9\n"
        );

        let temp = fs::read_to_string(dir.join("edenic1_temp.csv")).unwrap();
        assert!(temp.starts_with("date,Temperature\n"));

        let ec = fs::read_to_string(dir.join("edenic1_ec.csv")).unwrap();
        assert!(ec.starts_with("date,EC\n"));
    }

    #[test]
    fn rename_rejects_wrong_column_count() {
        let dir = scratch_dir("rename-bad");
        let input = dir.join("export.csv");
        fs::write(&input, "a,b\n1,2\n").unwrap();

        match rename_and_split(&input, &dir) {
            Err(ExportError::ColumnCount { found, expected }) => {
                assert_eq!(found, 2);
                assert_eq!(expected, 4);
            }
            other => panic!("expected column-count error, got {other:?}"),
        }
    }

    #[test]
    fn rename_rejects_wrong_header_with_no_data_rows() {
        let dir = scratch_dir("rename-empty");
        let input = dir.join("export.csv");
        fs::write(&input, "a,b\n").unwrap();

        match rename_and_split(&input, &dir) {
            Err(ExportError::ColumnCount { found, expected }) => {
                assert_eq!(found, 2);
                assert_eq!(expected, 4);
            }
            other => panic!("expected column-count error, got {other:?}"),
        }
        assert!(!dir.join("export_mod.csv").exists());
    }

    #[test]
    fn status_log_writes_header_once_and_offsets_time() {
        let dir = scratch_dir("status-log");
        let path = dir.join("device.csv");
        let log = StatusLog::new(path.clone(), 8).unwrap();

        log.append_at(datetime!(2026-08-28 01:30 UTC), 25.3).unwrap();
        log.append_at(datetime!(2026-08-28 02:30 UTC), 25.5).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "DateTime,Temperature\n2026/08/28 09:30,25.3\n2026/08/28 10:30,25.5\n"
        );
    }
}
