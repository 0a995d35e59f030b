// Copyright (c) 2026 rezky_nightky

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::color::RainNorm;
use crate::error::{Error, Result};
use crate::runtime::SpiralConfig;

/// Lines before the first data row in the Observatory's daily export:
/// three lines of title and notes, then the bilingual column header.
pub const DEFAULT_SKIP_ROWS: usize = 4;

const COL_YEAR: usize = 0;
const COL_MONTH: usize = 1;
const COL_VALUE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthRecord {
    pub year: i32,
    pub month: u32,
    pub rainfall_mm: f64,
}

impl MonthRecord {
    pub fn new(year: i32, month: u32, rainfall_mm: f64) -> Self {
        Self {
            year,
            month,
            rainfall_mm,
        }
    }

    pub fn rain_norm(&self, cfg: &SpiralConfig) -> Result<RainNorm> {
        RainNorm::from_rainfall(self.rainfall_mm, cfg.rain_low_mm, cfg.rain_high_mm)
    }

    pub fn caption(&self) -> String {
        format!(
            "{}-{}  Rain: {:.1} mm",
            self.year, self.month, self.rainfall_mm
        )
    }
}

/// Daily values that are blank, flagged as trace, or otherwise not a
/// number count as no rain.
fn parse_daily_value(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Sums daily rainfall rows into monthly totals, ordered by (year, month).
///
/// Rows whose year or month column is not an integer are skipped; the
/// export ends with a few lines of footnotes that look like that.
pub fn monthly_totals_from_reader<R: Read>(rdr: R, skip_rows: usize) -> Result<Vec<MonthRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for (row, rec) in reader.records().enumerate() {
        let rec = rec?;
        if row < skip_rows {
            continue;
        }
        let year = rec.get(COL_YEAR).and_then(|v| v.parse::<i32>().ok());
        let month = rec
            .get(COL_MONTH)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m));
        let (Some(year), Some(month)) = (year, month) else {
            skipped += 1;
            log::trace!("skipping row {}: {:?}", row + 1, rec);
            continue;
        };
        let value = rec.get(COL_VALUE).map(parse_daily_value).unwrap_or(0.0);
        *totals.entry((year, month)).or_insert(0.0) += value;
    }

    if skipped > 0 {
        log::debug!("skipped {} non-data rows", skipped);
    }

    Ok(totals
        .into_iter()
        .map(|((year, month), total)| MonthRecord::new(year, month, total))
        .collect())
}

pub fn load_monthly_totals(path: &Path, skip_rows: usize) -> Result<Vec<MonthRecord>> {
    let file = File::open(path)?;
    let records = monthly_totals_from_reader(file, skip_rows)?;
    if records.is_empty() {
        return Err(Error::EmptyInput(path.display().to_string()));
    }
    log::info!(
        "loaded {} months from {} ({}-{} .. {}-{})",
        records.len(),
        path.display(),
        records[0].year,
        records[0].month,
        records[records.len() - 1].year,
        records[records.len() - 1].month
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Daily Total Rainfall (mm) at the Hong Kong Observatory
*** indicates there was incomplete data
Trace means rainfall less than 0.05mm
年/Year,月/Month,日/Day,數值/Value,數據完整性/data Completeness
1884,3,1,***,
1884,3,2,1.5,C
1884,3,3,Trace,C
1884,4,1,10.0,C
1884,4,2,  2.25 ,C
1884,3,4,0.5,C
*** 沒有數據/unavailable
";

    #[test]
    fn sums_days_into_sorted_months() {
        let months = monthly_totals_from_reader(SAMPLE.as_bytes(), DEFAULT_SKIP_ROWS).unwrap();
        assert_eq!(
            months,
            vec![
                MonthRecord::new(1884, 3, 2.0),
                MonthRecord::new(1884, 4, 12.25),
            ]
        );
    }

    #[test]
    fn non_numeric_values_count_as_zero() {
        assert_eq!(parse_daily_value("Trace"), 0.0);
        assert_eq!(parse_daily_value(""), 0.0);
        assert_eq!(parse_daily_value("***"), 0.0);
        assert_eq!(parse_daily_value("NaN"), 0.0);
        assert_eq!(parse_daily_value(" 3.5"), 3.5);
    }

    #[test]
    fn caption_format() {
        assert_eq!(
            MonthRecord::new(2024, 6, 180.0).caption(),
            "2024-6  Rain: 180.0 mm"
        );
        assert_eq!(
            MonthRecord::new(1884, 12, 12.345).caption(),
            "1884-12  Rain: 12.3 mm"
        );
    }

    #[test]
    fn rain_norm_uses_configured_window() {
        let cfg = SpiralConfig::default();
        let n = MonthRecord::new(2024, 6, 180.0).rain_norm(&cfg).unwrap();
        assert!((n.value() - 0.52).abs() < 1e-12);
        let n = MonthRecord::new(2024, 1, 10.0).rain_norm(&cfg).unwrap();
        assert_eq!(n, RainNorm::ZERO);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_monthly_totals(Path::new("/nonexistent/rain.csv"), 4).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
