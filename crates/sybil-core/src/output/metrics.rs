//! Metrics Output
//!
//! Writes the full metrics time series as a JSON array.

use std::fs;
use std::path::Path;

use sybil_events::TimeSeries;

/// Write the time series to `path` as pretty JSON
pub fn write_time_series(series: &TimeSeries, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(series.rows())?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the time series to `<dir>/metrics.json`
pub fn write_metrics_to_dir(series: &TimeSeries, output_dir: impl AsRef<Path>) -> std::io::Result<()> {
    write_time_series(series, output_dir.as_ref().join("metrics.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sybil_events::MetricsRow;

    #[test]
    fn test_write_time_series() {
        let mut series = TimeSeries::new();
        series.push(MetricsRow {
            tick: 0,
            normal: 9,
            sybil: 1,
            average_confidence: 1.0,
        });
        series.push(MetricsRow {
            tick: 1,
            normal: 8,
            sybil: 2,
            average_confidence: 0.95,
        });

        let dir = tempfile::tempdir().unwrap();
        write_metrics_to_dir(&series, dir.path()).unwrap();

        let written = fs::read_to_string(dir.path().join("metrics.json")).unwrap();
        let rows: Vec<MetricsRow> = serde_json::from_str(&written).unwrap();
        assert_eq!(rows, series.rows());
    }
}
