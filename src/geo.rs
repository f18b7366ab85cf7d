use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::GeoSampleAccession;
use crate::error::CurateError;

pub trait GeoClient: Send + Sync {
    /// Streams the body of `url` into `destination`, which must not be read
    /// as complete until this returns `Ok`.
    fn download_url(&self, url: &str, destination: &Path) -> Result<(), CurateError>;
    /// Returns the SOFT record of one sample, one trimmed line per entry.
    fn fetch_sample_soft(&self, accession: &GeoSampleAccession)
    -> Result<Vec<String>, CurateError>;
}

#[derive(Clone)]
pub struct GeoHttpClient {
    client: Client,
}

impl GeoHttpClient {
    pub fn new() -> Result<Self, CurateError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-ec/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| CurateError::GeoHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| CurateError::GeoHttp(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn sample_soft_url(accession: &GeoSampleAccession) -> String {
        format!(
            "https://www.ncbi.nlm.nih.gov/geo/tools/geometa.cgi?acc={}&scope=full&mode=soft",
            accession.as_str()
        )
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, CurateError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| CurateError::GeoHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "GEO request failed".to_string());
            return Err(CurateError::GeoStatus { status, message });
        }
        Ok(response)
    }
}

impl GeoClient for GeoHttpClient {
    fn download_url(&self, url: &str, destination: &Path) -> Result<(), CurateError> {
        let response = self.get(url)?;
        copy_body(response, destination)
    }

    fn fetch_sample_soft(
        &self,
        accession: &GeoSampleAccession,
    ) -> Result<Vec<String>, CurateError> {
        let response = self.get(&Self::sample_soft_url(accession))?;
        let bytes = response
            .bytes()
            .map_err(|err| CurateError::GeoHttp(err.to_string()))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|err| CurateError::GeoEncoding(err.to_string()))?;
        Ok(soft_lines(&text))
    }
}

/// Streams `body` into a new file at `destination`. Read failures are
/// network errors, write failures are filesystem errors.
pub fn copy_body<R: Read>(mut body: R, destination: &Path) -> Result<(), CurateError> {
    let mut file =
        File::create(destination).map_err(|err| CurateError::Filesystem(err.to_string()))?;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CurateError::GeoHttp(err.to_string())),
        };
        file.write_all(&buf[..read])
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
    }
    file.flush()
        .map_err(|err| CurateError::Filesystem(err.to_string()))
}

pub fn soft_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}
