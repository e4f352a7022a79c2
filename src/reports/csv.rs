use crate::Result;
use crate::facts::{HEADER, Row};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeZone};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

/// Prefix of every generated report file name.
const FILE_PREFIX: &str = "sonarcloud";

/// Render `rows` as CSV, header first.
///
/// The header is written even when there are no rows. Counts are plain decimal
/// text and missing values are empty fields.
pub fn generate<W: Write>(rows: &[Row], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Name of the report file for a run started at `now`, e.g. `sonarcloud_2024-03-05_10-15-00.csv`.
#[must_use]
pub fn file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: core::fmt::Display,
{
    format!("{FILE_PREFIX}_{}.csv", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write the report for `rows` into `dir` and return the path of the new file.
pub fn write_file<Tz: TimeZone>(dir: &Utf8Path, rows: &[Row], now: &DateTime<Tz>) -> Result<Utf8PathBuf>
where
    Tz::Offset: core::fmt::Display,
{
    let path = dir.join(file_name(now));
    let file = fs::File::create(&path).into_app_err_with(|| format!("creating report file '{path}'"))?;
    generate(rows, file).into_app_err_with(|| format!("writing report file '{path}'"))?;
    Ok(path)
}
