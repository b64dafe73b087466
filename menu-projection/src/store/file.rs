//! JSON-file store.
//!
//! Layout under the data directory:
//!
//! ```text
//! institutions/<id>.json
//! plans/<year>-W<ww>.json
//! ```

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{persisted, plan_key, MenuStore, StoreError};
use crate::types::{Institution, WeeklyMenuPlan};
use crate::week::WeekKey;

/// Store reading and writing one JSON file per record.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn institutions_dir(&self) -> PathBuf {
        self.root.join("institutions")
    }

    fn plans_dir(&self) -> PathBuf {
        self.root.join("plans")
    }

    fn institution_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.institutions_dir().join(format!("{}.json", id)))
    }

    fn plan_path(&self, key: WeekKey) -> PathBuf {
        self.plans_dir().join(format!("{}.json", key.record_key()))
    }
}

/// Institution ids become file names, so only a safe alphabet is accepted.
fn validate_id(id: &str) -> Result<(), StoreError> {
    let safe = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if safe {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(id.to_string()))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Write via a unique temp file + rename so readers never see a partial
/// record. Concurrent writers of one record each persist a complete file;
/// the last rename wins.
async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    let target = path.to_path_buf();

    tokio::task::spawn_blocking(move || atomic_write(&target, &json))
        .await
        .map_err(|e| io_error(path, std::io::Error::other(e)))??;

    debug!(path = %path.display(), "Record written");
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::InvalidKey(path.display().to_string()))?;
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    // Dot prefix keeps in-flight files out of directory listings
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| io_error(dir, e))?;
    tmp.write_all(data).map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

#[async_trait]
impl MenuStore for FileStore {
    async fn institution(&self, id: &str) -> Result<Option<Institution>, StoreError> {
        // An id that cannot be a file name cannot have been saved
        let Ok(path) = self.institution_path(id) else {
            debug!(institution_id = %id, "Unusable institution id, treating as missing");
            return Ok(None);
        };
        read_json(&path).await
    }

    async fn institutions(&self) -> Result<Vec<Institution>, StoreError> {
        let dir = self.institutions_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut institutions = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            let path = entry.path();
            let is_record = path.extension().map(|ext| ext == "json").unwrap_or(false)
                && !entry.file_name().to_string_lossy().starts_with('.');
            if !is_record {
                continue;
            }
            if let Some(institution) = read_json::<Institution>(&path).await? {
                institutions.push(institution);
            }
        }

        institutions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(institutions)
    }

    async fn save_institution(&self, institution: &Institution) -> Result<(), StoreError> {
        let path = self.institution_path(&institution.id)?;
        write_json(&path, institution).await
    }

    async fn plan(&self, key: WeekKey) -> Result<Option<WeeklyMenuPlan>, StoreError> {
        read_json(&self.plan_path(key)).await
    }

    async fn save_plan(&self, plan: &WeeklyMenuPlan) -> Result<(), StoreError> {
        let key = plan_key(plan)?;
        write_json(&self.plan_path(key), &persisted(plan)).await
    }
}
