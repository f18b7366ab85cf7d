use std::time::{Duration, Instant};

use camino::Utf8Path;
use serde::Serialize;

use crate::config::CurationConfig;
use crate::curate;
use crate::domain::GeoSampleAccession;
use crate::error::CurateError;
use crate::geo::GeoClient;
use crate::matrix::ExpressionMatrix;
use crate::soft::{FieldAvailability, SampleMetadata, extract_sample_metadata};
use crate::store::{Provenance, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchAction {
    Cached,
    Downloaded,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub action: FetchAction,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurationResult {
    pub study_id: String,
    pub matrix: FetchOutcome,
    pub genes: usize,
    pub samples: usize,
    pub rows_written: usize,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectResult {
    pub sample_id: String,
    pub metadata: SampleMetadata,
    pub availability: FieldAvailability,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Clone)]
pub struct App<G: GeoClient> {
    store: Store,
    geo: G,
}

impl<G: GeoClient> App<G> {
    pub fn new(store: Store, geo: G) -> Self {
        Self { store, geo }
    }

    /// Downloads `url` to `dest` unless `dest` already exists. A fresh
    /// download also records where it came from; a cached file reports the
    /// recorded source URL when one is on disk.
    pub fn fetch(
        &self,
        accession: &str,
        url: &str,
        dest: &Utf8Path,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutcome, CurateError> {
        let filename = dest.file_name().unwrap_or(dest.as_str());
        if self.store.exists(dest) {
            tracing::debug!(path = %dest, "using cached download");
            sink.event(ProgressEvent {
                message: format!("{filename} already exists."),
                elapsed: None,
            });
            return Ok(FetchOutcome {
                action: FetchAction::Cached,
                path: dest.to_string(),
                url: self.recorded_url(accession).unwrap_or_else(|| url.to_string()),
            });
        }

        sink.event(ProgressEvent {
            message: format!("Downloading {filename}..."),
            elapsed: None,
        });
        self.store.ensure_root()?;
        let start = Instant::now();
        Store::write_file_atomic(dest, |temp| self.geo.download_url(url, temp))?;
        let elapsed = start.elapsed();
        tracing::info!(url, latency_ms = elapsed.as_millis() as u64, "downloaded");

        let provenance = Provenance {
            source: "geo".to_string(),
            accession: accession.to_string(),
            url: url.to_string(),
            downloaded_at: chrono::Utc::now().to_rfc3339(),
            tool: format!("kira-ec/{}", env!("CARGO_PKG_VERSION")),
            resolved_path: dest.to_string(),
        };
        Store::write_provenance(&self.store.provenance_path(accession), &provenance)?;
        sink.event(ProgressEvent {
            message: format!("Downloaded {filename}"),
            elapsed: Some(elapsed),
        });

        Ok(FetchOutcome {
            action: FetchAction::Downloaded,
            path: dest.to_string(),
            url: url.to_string(),
        })
    }

    fn recorded_url(&self, accession: &str) -> Option<String> {
        let path = self.store.provenance_path(accession);
        if !self.store.exists(&path) {
            return None;
        }
        match Store::read_provenance(&path) {
            Ok(provenance) => Some(provenance.url),
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "unreadable provenance record");
                None
            }
        }
    }

    /// Fetch, reshape and write the curation table.
    pub fn curate(
        &self,
        config: &CurationConfig,
        sink: &dyn ProgressSink,
    ) -> Result<CurationResult, CurateError> {
        let matrix_path = self.store.file_path(&config.matrix_filename());
        let fetched = self.fetch(
            config.series.as_str(),
            &config.matrix_url(),
            &matrix_path,
            sink,
        )?;

        let matrix = ExpressionMatrix::read_gz(matrix_path.as_std_path())?;
        let records = matrix.melt();
        let rows = curate::assemble(&config.series, &records);
        let rows_written = curate::write_csv(config.output.as_std_path(), &rows)?;
        sink.event(ProgressEvent {
            message: format!("Saved {}", config.output),
            elapsed: None,
        });

        Ok(CurationResult {
            study_id: config.series.as_str().to_string(),
            matrix: fetched,
            genes: matrix.rows.len(),
            samples: matrix.samples.len(),
            rows_written,
            output: config.output.to_string(),
        })
    }

    /// Re-fetches the sample's SOFT record and checks it for demographic fields.
    pub fn inspect(
        &self,
        sample: &GeoSampleAccession,
        sink: &dyn ProgressSink,
    ) -> Result<InspectResult, CurateError> {
        sink.event(ProgressEvent {
            message: format!("Fetching SOFT metadata for {sample}"),
            elapsed: None,
        });
        let lines = self.geo.fetch_sample_soft(sample)?;
        let metadata = extract_sample_metadata(&lines);
        let availability = FieldAvailability::from_characteristics(&metadata.characteristics);
        tracing::debug!(
            sample = sample.as_str(),
            lines = lines.len(),
            characteristics = metadata.characteristics.len(),
            "extracted sample metadata"
        );
        Ok(InspectResult {
            sample_id: sample.as_str().to_string(),
            metadata,
            availability,
        })
    }
}
