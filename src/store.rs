use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tempfile::Builder;

use crate::error::CurateError;

/// Local layout for downloaded inputs: `<data_dir>/<file>` plus
/// `<data_dir>/metadata/<accession>.json` provenance records.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: Utf8PathBuf,
}

impl Store {
    pub fn new(data_dir: Utf8PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn file_path(&self, filename: &str) -> Utf8PathBuf {
        self.data_dir.join(filename)
    }

    pub fn provenance_path(&self, accession: &str) -> Utf8PathBuf {
        self.data_dir.join("metadata").join(format!("{accession}.json"))
    }

    pub fn ensure_root(&self) -> Result<(), CurateError> {
        fs::create_dir_all(self.data_dir.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))
    }

    pub fn exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    /// Runs `fill` against a temporary file next to `dest` and moves it into
    /// place only if `fill` succeeds.
    pub fn write_file_atomic<F>(dest: &Utf8Path, fill: F) -> Result<(), CurateError>
    where
        F: FnOnce(&Path) -> Result<(), CurateError>,
    {
        let parent = dest
            .parent()
            .ok_or_else(|| CurateError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        let temp = Builder::new()
            .prefix("kira-ec-download")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        fill(temp.path())?;
        temp.persist(dest.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        Ok(())
    }

    pub fn write_provenance(path: &Utf8Path, provenance: &Provenance) -> Result<(), CurateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent.as_std_path())
                .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(provenance)
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        fs::write(tmp_path.as_std_path(), &content)
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        fs::rename(tmp_path.as_std_path(), path.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        Ok(())
    }

    pub fn read_provenance(path: &Utf8Path) -> Result<Provenance, CurateError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| CurateError::Filesystem(err.to_string()))?;
        serde_json::from_str(&content).map_err(|err| CurateError::Filesystem(err.to_string()))
    }
}

/// Where a cached input came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: String,
    pub accession: String,
    pub url: String,
    pub downloaded_at: String,
    pub tool: String,
    pub resolved_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let store = Store::new(Utf8PathBuf::from("data"));
        let matrix = store.file_path("GSE144259_all.fpkm.exp.txt.gz");
        assert!(matrix.ends_with("data/GSE144259_all.fpkm.exp.txt.gz"));
        let meta = store.provenance_path("GSE144259");
        assert!(meta.ends_with("data/metadata/GSE144259.json"));
    }

    #[test]
    fn failed_fill_leaves_no_file() {
        let temp = tempfile::tempdir().unwrap();
        let dest = Utf8PathBuf::from_path_buf(temp.path().join("nested/out.gz")).unwrap();
        let result = Store::write_file_atomic(&dest, |_| {
            Err(CurateError::GeoHttp("connection reset".to_string()))
        });
        assert!(result.is_err());
        assert!(!dest.as_std_path().exists());
    }
}
