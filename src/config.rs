use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{GeoSampleAccession, GeoSeriesAccession};
use crate::error::CurateError;

pub const DEFAULT_CONFIG_FILE: &str = "kira-ec.json";
pub const DEFAULT_SERIES: &str = "GSE144259";
pub const DEFAULT_SAMPLE: &str = "GSM4284531";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT: &str = "curated_data.csv";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub sample: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CurationConfig {
    pub series: GeoSeriesAccession,
    pub sample: GeoSampleAccession,
    pub data_dir: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

impl CurationConfig {
    /// Name of the supplementary FPKM matrix published with the series.
    pub fn matrix_filename(&self) -> String {
        format!("{}_all.fpkm.exp.txt.gz", self.series.as_str())
    }

    pub fn matrix_url(&self) -> String {
        format!(
            "https://ftp.ncbi.nlm.nih.gov/geo/series/{prefix}/{acc}/suppl/{file}",
            prefix = self.series.directory_prefix(),
            acc = self.series.as_str(),
            file = self.matrix_filename()
        )
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `kira-ec.json` when present. Without either the
    /// built-in defaults are used.
    pub fn resolve(path: Option<&str>) -> Result<CurationConfig, CurateError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| CurateError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CurateError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<CurationConfig, CurateError> {
        let series: GeoSeriesAccession = config
            .series
            .as_deref()
            .unwrap_or(DEFAULT_SERIES)
            .parse()?;
        let sample: GeoSampleAccession = config
            .sample
            .as_deref()
            .unwrap_or(DEFAULT_SAMPLE)
            .parse()?;
        let data_dir = config
            .data_dir
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR));
        let output = config
            .output
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT));

        Ok(CurationConfig {
            series,
            sample,
            data_dir,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_dataset() {
        let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
        assert_eq!(resolved.series.as_str(), "GSE144259");
        assert_eq!(resolved.sample.as_str(), "GSM4284531");
        assert_eq!(resolved.output, Utf8PathBuf::from("curated_data.csv"));
        assert_eq!(
            resolved.matrix_url(),
            "https://ftp.ncbi.nlm.nih.gov/geo/series/GSE144nnn/GSE144259/suppl/GSE144259_all.fpkm.exp.txt.gz"
        );
    }
}
