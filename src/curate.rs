use std::collections::HashMap;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::domain::{GeoSeriesAccession, NA, SampleLabels, parse_sample_id};
use crate::error::CurateError;
use crate::matrix::{ExpressionRecord, GENE_COLUMN, SAMPLE_COLUMN, VALUE_COLUMN};

pub const MATERIAL_TYPE: &str = "RNA";
pub const RESULT_UNITS: &str = "FPKM";

pub const CURATED_COLUMNS: [&str; 12] = [
    "STUDY_ID",
    "PATIENT_ID",
    "UNIQUE_PATIENT_ID",
    "SEX",
    "AGE",
    SAMPLE_COLUMN,
    "SAMPLE_GENERAL_PATHOLOGY",
    "MATERIAL_TYPE",
    GENE_COLUMN,
    VALUE_COLUMN,
    "RESULT_UNITS",
    "STATUS",
];

/// One output line. Field order is the column order of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CuratedRow {
    pub study_id: String,
    pub patient_id: String,
    pub unique_patient_id: String,
    pub sex: String,
    pub age: String,
    pub sample_id: String,
    pub sample_general_pathology: String,
    pub material_type: String,
    pub gene_symbol: String,
    pub result: String,
    pub result_units: String,
    pub status: String,
}

impl CuratedRow {
    pub fn new(
        study: &GeoSeriesAccession,
        labels: &SampleLabels,
        record: &ExpressionRecord,
    ) -> Self {
        Self {
            study_id: study.as_str().to_string(),
            patient_id: labels.patient_id.clone(),
            unique_patient_id: format!("{}_{}", study.as_str(), record.sample_id),
            sex: NA.to_string(),
            age: NA.to_string(),
            sample_id: record.sample_id.clone(),
            sample_general_pathology: labels.pathology.clone(),
            material_type: MATERIAL_TYPE.to_string(),
            gene_symbol: or_na(record.gene.as_deref()),
            result: or_na(record.value.as_deref()),
            result_units: RESULT_UNITS.to_string(),
            status: NA.to_string(),
        }
    }
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NA).to_string()
}

pub fn assemble(study: &GeoSeriesAccession, records: &[ExpressionRecord]) -> Vec<CuratedRow> {
    let mut labels: HashMap<&str, SampleLabels> = HashMap::new();
    records
        .iter()
        .map(|record| {
            let sample_labels = labels
                .entry(record.sample_id.as_str())
                .or_insert_with(|| parse_sample_id(&record.sample_id));
            CuratedRow::new(study, sample_labels, record)
        })
        .collect()
}

/// Writes the table to `path`, replacing any existing file. The header is
/// written even when `rows` is empty. Returns the number of data rows.
pub fn write_csv(path: &Path, rows: &[CuratedRow]) -> Result<usize, CurateError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| CurateError::Filesystem(err.to_string()))?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| CurateError::CsvWrite(err.to_string()))?;
    writer
        .write_record(CURATED_COLUMNS)
        .map_err(|err| CurateError::CsvWrite(err.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| CurateError::CsvWrite(err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| CurateError::CsvWrite(err.to_string()))?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "wrote curation table");
    Ok(rows.len())
}
