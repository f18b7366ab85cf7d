use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CurateError {
    #[error("invalid GEO series accession: {0}")]
    InvalidSeriesAccession(String),

    #[error("invalid GEO sample accession: {0}")]
    InvalidSampleAccession(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("GEO request failed: {0}")]
    GeoHttp(String),

    #[error("GEO returned status {status}: {message}")]
    GeoStatus { status: u16, message: String },

    #[error("GEO response is not valid UTF-8: {0}")]
    GeoEncoding(String),

    #[error("malformed expression matrix: {0}")]
    MatrixParse(String),

    #[error("failed to write curation table: {0}")]
    CsvWrite(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
