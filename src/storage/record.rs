//! Leaf-analysis record types
//!
//! A dataset row has seven columns, in this order:
//!
//! ```text
//! nsu,nome_da_imagem,categoria_detectada,area_verde_pixels,area_manchas_pixels,porcentagem_doenca_folha,data_registro
//! ```
//!
//! The same names are used as JSON keys on the wire.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};

/// Column names of the dataset header row, in file order.
pub const COLUMNS: [&str; 7] = [
    "nsu",
    "nome_da_imagem",
    "categoria_detectada",
    "area_verde_pixels",
    "area_manchas_pixels",
    "porcentagem_doenca_folha",
    "data_registro",
];

/// Format used when stamping `recorded_at` at creation time.
pub const RECORDED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Validated measurement submitted by the detection pipeline.
///
/// Carries everything except the identifier and the creation timestamp,
/// which the write path assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub image_name: String,
    pub detected_category: String,
    pub green_area_pixels: f64,
    pub spot_area_pixels: f64,
    pub disease_percentage: f64,
}

/// One persisted leaf-analysis measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "nsu")]
    pub id: u64,
    #[serde(rename = "nome_da_imagem")]
    pub image_name: String,
    #[serde(rename = "categoria_detectada")]
    pub detected_category: String,
    #[serde(rename = "area_verde_pixels")]
    pub green_area_pixels: f64,
    #[serde(rename = "area_manchas_pixels")]
    pub spot_area_pixels: f64,
    #[serde(rename = "porcentagem_doenca_folha")]
    pub disease_percentage: f64,
    /// Creation time as written to the dataset. Kept verbatim so rows with
    /// an unparseable timestamp still load.
    #[serde(rename = "data_registro")]
    pub recorded_at: String,
}

impl Record {
    /// Builds a record from a validated submission.
    pub fn new(id: u64, new: NewRecord, recorded_at: NaiveDateTime) -> Self {
        Self {
            id,
            image_name: new.image_name,
            detected_category: new.detected_category,
            green_area_pixels: new.green_area_pixels,
            spot_area_pixels: new.spot_area_pixels,
            disease_percentage: new.disease_percentage,
            recorded_at: recorded_at.format(RECORDED_AT_FORMAT).to_string(),
        }
    }

    /// Returns the record's cells in column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.image_name.clone(),
            self.detected_category.clone(),
            format_float(self.green_area_pixels),
            format_float(self.spot_area_pixels),
            format_float(self.disease_percentage),
            self.recorded_at.clone(),
        ]
    }

    /// Parses a data row. `line` is the 1-based file line, used for error context.
    pub fn from_row(row: &[String], line: usize) -> StorageResult<Self> {
        if row.len() != COLUMNS.len() {
            return Err(StorageError::corrupt_at_line(
                line,
                format!("expected {} columns, found {}", COLUMNS.len(), row.len()),
            ));
        }

        let id = row[0].trim().parse::<u64>().map_err(|e| {
            StorageError::corrupt_at_line(line, format!("invalid nsu '{}': {}", row[0], e))
        })?;

        Ok(Self {
            id,
            image_name: row[1].clone(),
            detected_category: row[2].clone(),
            green_area_pixels: parse_float(&row[3], COLUMNS[3], line)?,
            spot_area_pixels: parse_float(&row[4], COLUMNS[4], line)?,
            disease_percentage: parse_float(&row[5], COLUMNS[5], line)?,
            recorded_at: row[6].clone(),
        })
    }
}

// Debug formatting of f64 is the shortest representation that round-trips
// and always carries a fractional part ("100.0", not "100").
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn parse_float(cell: &str, column: &str, line: usize) -> StorageResult<f64> {
    cell.trim().parse::<f64>().map_err(|e| {
        StorageError::corrupt_at_line(line, format!("invalid {} '{}': {}", column, cell, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_new() -> NewRecord {
        NewRecord {
            image_name: "leaf_001.jpg".to_string(),
            detected_category: "ferrugem".to_string(),
            green_area_pixels: 15234.5,
            spot_area_pixels: 812.0,
            disease_percentage: 5.06,
        }
    }

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(14, 5, 7, 120034)
            .unwrap()
    }

    #[test]
    fn test_new_stamps_iso_timestamp() {
        let record = Record::new(4, sample_new(), fixed_time());
        assert_eq!(record.id, 4);
        assert_eq!(record.recorded_at, "2024-03-09T14:05:07.120034");
    }

    #[test]
    fn test_row_round_trip() {
        let record = Record::new(1, sample_new(), fixed_time());
        let row = record.to_row();
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row[4], "812.0");

        let parsed = Record::from_row(&row, 2).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_from_row_rejects_wrong_width() {
        let row = vec!["1".to_string(), "a.jpg".to_string()];
        let err = Record::from_row(&row, 3).unwrap_err();
        assert_eq!(err.details(), Some("line: 3"));
    }

    #[test]
    fn test_from_row_rejects_non_numeric_measurement() {
        let mut row = Record::new(1, sample_new(), fixed_time()).to_row();
        row[5] = "muito".to_string();
        let err = Record::from_row(&row, 2).unwrap_err();
        assert!(err.message().contains("porcentagem_doenca_folha"));
    }

    #[test]
    fn test_from_row_keeps_unparseable_timestamp() {
        let mut row = Record::new(1, sample_new(), fixed_time()).to_row();
        row[6] = "yesterday".to_string();
        let parsed = Record::from_row(&row, 2).unwrap();
        assert_eq!(parsed.recorded_at, "yesterday");
    }

    #[test]
    fn test_json_uses_wire_names() {
        let record = Record::new(9, sample_new(), fixed_time());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nsu"], 9);
        assert_eq!(json["nome_da_imagem"], "leaf_001.jpg");
        assert_eq!(json["categoria_detectada"], "ferrugem");
        assert_eq!(json["data_registro"], "2024-03-09T14:05:07.120034");
    }
}
