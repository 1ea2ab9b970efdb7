use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::HmpiError;
use crate::model::{Profile, WaterSample};
use crate::store::{SampleStore, StoreDocument};

/// Store backed by a single JSON document on disk.
///
/// The document is held in memory and rewritten after every mutation via a
/// temporary file and rename, so a crash never leaves a half-written store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, HmpiError> {
        let doc = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| HmpiError::Store {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            log::info!("no store at {}, starting empty", path.display());
            StoreDocument::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), HmpiError> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        let tmp = temp_path(&self.path);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!(
            "wrote {} sample(s) to {}",
            self.doc.samples.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Sibling of `path` with `.tmp` appended to the full file name.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl SampleStore for JsonFileStore {
    fn insert(&mut self, sample: WaterSample) -> Result<WaterSample, HmpiError> {
        let stored = self.doc.insert(sample)?;
        self.persist()?;
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> Result<Option<WaterSample>, HmpiError> {
        Ok(self.doc.get(id))
    }

    fn update(&mut self, sample: WaterSample) -> Result<(), HmpiError> {
        self.doc.update(sample)?;
        self.persist()
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, HmpiError> {
        let removed = self.doc.delete(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn list_all(&self) -> Result<Vec<WaterSample>, HmpiError> {
        Ok(self.doc.samples.clone())
    }

    fn put_profile(&mut self, profile: Profile) -> Result<(), HmpiError> {
        self.doc.put_profile(profile);
        self.persist()
    }

    fn profile(&self, user_id: &str) -> Result<Option<Profile>, HmpiError> {
        Ok(self.doc.profile(user_id))
    }
}
