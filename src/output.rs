use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV report");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "Wrote JSON summary");
    Ok(())
}

/// Render up to `max_rows` rows as a Markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CityTimeRow, Overview, TimeStats};

    fn rows() -> Vec<CityTimeRow> {
        vec![
            CityTimeRow {
                city: "Metropolitian".to_string(),
                avg_time: 27.23,
                std_time: 9.12,
            },
            CityTimeRow {
                city: "Urban".to_string(),
                avg_time: 22.94,
                std_time: f64::NAN,
            },
        ]
    }

    #[test]
    fn test_render_table_limits_rows() {
        let table = render_table(&rows(), 1).unwrap();
        assert!(table.contains("Metropolitian"));
        assert!(!table.contains("Urban"));
        assert!(render_table::<CityTimeRow>(&[], 5).is_none());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("by_city.csv");
        write_csv(&path, &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("City,AvgTime,StdTime"));
        assert_eq!(lines.next(), Some("Metropolitian,27.23,9.12"));
        assert_eq!(lines.next(), Some("Urban,22.94,NaN"));
    }

    #[test]
    fn test_write_json_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = Overview {
            unique_delivery_persons: 3,
            avg_distance_km: 12.5,
            festival: TimeStats {
                avg_time: 45.0,
                std_time: 7.07,
            },
            no_festival: TimeStats {
                avg_time: f64::NAN,
                std_time: f64::NAN,
            },
        };
        write_json(&path, &summary).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["unique_delivery_persons"], 3);
        assert_eq!(v["festival"]["avg_time"], 45.0);
        assert!(v["no_festival"]["avg_time"].is_null());
    }
}
