//! Wide FPKM matrix loading and the wide-to-long pivot.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::MultiGzDecoder;

use crate::error::CurateError;

pub const GENE_COLUMN: &str = "GENE_SYMBOL";
pub const SAMPLE_COLUMN: &str = "SAMPLE_ID";
pub const VALUE_COLUMN: &str = "RESULT";

/// Cell contents read as "no value" rather than passed through.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

fn cell(value: &str) -> Option<String> {
    (!is_missing(value)).then(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneRow {
    pub gene: Option<String>,
    pub values: Vec<Option<String>>,
}

/// Genes × samples table. The gene column is always first and is renamed
/// to [`GENE_COLUMN`] on load.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    pub samples: Vec<String>,
    pub rows: Vec<GeneRow>,
}

/// One (gene, sample, value) cell of the long table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRecord {
    pub gene: Option<String>,
    pub sample_id: String,
    pub value: Option<String>,
}

impl ExpressionMatrix {
    /// Reads every gzip member of `path`, so bgzip and concatenated
    /// archives load completely.
    pub fn read_gz(path: &Path) -> Result<Self, CurateError> {
        let file = File::open(path).map_err(|err| {
            CurateError::Filesystem(format!("open matrix {}: {err}", path.display()))
        })?;
        Self::from_reader(MultiGzDecoder::new(file))
    }

    /// Parses tab-separated text with a header row. Short rows are padded
    /// with missing values; long rows are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CurateError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|err| CurateError::MatrixParse(err.to_string()))?
            .clone();
        if headers.is_empty() {
            return Err(CurateError::MatrixParse("missing header row".to_string()));
        }
        let samples: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|err| CurateError::MatrixParse(err.to_string()))?;
            if record.len() > headers.len() {
                return Err(CurateError::MatrixParse(format!(
                    "line {}: expected {} fields, got {}",
                    idx + 2,
                    headers.len(),
                    record.len()
                )));
            }
            let gene = record.get(0).and_then(cell);
            let values = (1..headers.len())
                .map(|col| record.get(col).and_then(cell))
                .collect();
            rows.push(GeneRow { gene, values });
        }

        tracing::debug!(genes = rows.len(), samples = samples.len(), "parsed matrix");
        Ok(Self { samples, rows })
    }

    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.samples.len()
    }

    /// Pivots to one record per (gene, sample) cell, all genes of the first
    /// sample before those of the second.
    pub fn melt(&self) -> Vec<ExpressionRecord> {
        let mut records = Vec::with_capacity(self.cell_count());
        for (col, sample) in self.samples.iter().enumerate() {
            for row in &self.rows {
                records.push(ExpressionRecord {
                    gene: row.gene.clone(),
                    sample_id: sample.clone(),
                    value: row.values[col].clone(),
                });
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const WIDE: &str = "GeneID\tCRC001N\tCRC001T\tCRC002M\n\
                        TP53\t1.5\t2.25\t0\n\
                        KRAS\tNaN\t\t3.125\n";

    #[test]
    fn melt_is_sample_major() {
        let matrix = ExpressionMatrix::from_reader(WIDE.as_bytes()).unwrap();
        let records = matrix.melt();
        assert_eq!(records.len(), 6);
        let order: Vec<_> = records
            .iter()
            .map(|r| (r.sample_id.as_str(), r.gene.as_deref().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("CRC001N", "TP53"),
                ("CRC001N", "KRAS"),
                ("CRC001T", "TP53"),
                ("CRC001T", "KRAS"),
                ("CRC002M", "TP53"),
                ("CRC002M", "KRAS"),
            ]
        );
    }

    #[test]
    fn values_pass_through_as_text() {
        let matrix = ExpressionMatrix::from_reader(WIDE.as_bytes()).unwrap();
        assert_eq!(matrix.rows[0].values[1].as_deref(), Some("2.25"));
        assert_eq!(matrix.rows[0].values[2].as_deref(), Some("0"));
        assert_eq!(matrix.rows[1].values[0], None);
        assert_eq!(matrix.rows[1].values[1], None);
    }

    #[test]
    fn short_rows_are_padded() {
        let text = "GeneID\tA\tB\nGAPDH\t7\n";
        let matrix = ExpressionMatrix::from_reader(text.as_bytes()).unwrap();
        assert_eq!(matrix.rows[0].values, vec![Some("7".to_string()), None]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let text = "GeneID\tA\nGAPDH\t7\t8\n";
        let err = ExpressionMatrix::from_reader(text.as_bytes()).unwrap_err();
        assert_matches!(err, CurateError::MatrixParse(_));
    }

    #[test]
    fn header_only_matrix_has_no_records() {
        let matrix = ExpressionMatrix::from_reader("GeneID\tA\tB\n".as_bytes()).unwrap();
        assert_eq!(matrix.samples, vec!["A", "B"]);
        assert!(matrix.melt().is_empty());
    }
}
