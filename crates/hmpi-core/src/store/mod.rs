pub mod json_file;
pub mod memory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HmpiError;
use crate::model::{Profile, WaterSample};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Persistence boundary for samples and profiles.
pub trait SampleStore {
    /// Store a new sample. The sample must carry an owner and a fresh id.
    fn insert(&mut self, sample: WaterSample) -> Result<WaterSample, HmpiError>;

    fn get(&self, id: Uuid) -> Result<Option<WaterSample>, HmpiError>;

    /// Replace an existing sample.
    fn update(&mut self, sample: WaterSample) -> Result<(), HmpiError>;

    /// Returns whether a sample was removed.
    fn delete(&mut self, id: Uuid) -> Result<bool, HmpiError>;

    fn list_all(&self) -> Result<Vec<WaterSample>, HmpiError>;

    /// Samples owned by `user_id`, newest first.
    fn list_by_owner(&self, user_id: &str) -> Result<Vec<WaterSample>, HmpiError> {
        let mut samples: Vec<WaterSample> = self
            .list_all()?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        samples.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(samples)
    }

    fn put_profile(&mut self, profile: Profile) -> Result<(), HmpiError>;

    fn profile(&self, user_id: &str) -> Result<Option<Profile>, HmpiError>;
}

/// The stored state shared by every store implementation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub samples: Vec<WaterSample>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl StoreDocument {
    pub(crate) fn insert(&mut self, sample: WaterSample) -> Result<WaterSample, HmpiError> {
        if sample.user_id.trim().is_empty() {
            return Err(HmpiError::InvalidSample(
                "user_id must be set on creation".into(),
            ));
        }
        if self.samples.iter().any(|s| s.id == sample.id) {
            return Err(HmpiError::InvalidSample(format!(
                "sample {} already exists",
                sample.id
            )));
        }
        self.samples.push(sample.clone());
        Ok(sample)
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<WaterSample> {
        self.samples.iter().find(|s| s.id == id).cloned()
    }

    pub(crate) fn update(&mut self, sample: WaterSample) -> Result<(), HmpiError> {
        match self.samples.iter_mut().find(|s| s.id == sample.id) {
            Some(slot) => {
                *slot = sample;
                Ok(())
            }
            None => Err(HmpiError::SampleNotFound(sample.id)),
        }
    }

    pub(crate) fn delete(&mut self, id: Uuid) -> bool {
        let before = self.samples.len();
        self.samples.retain(|s| s.id != id);
        self.samples.len() != before
    }

    pub(crate) fn put_profile(&mut self, profile: Profile) {
        match self
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    pub(crate) fn profile(&self, user_id: &str) -> Option<Profile> {
        self.profiles.iter().find(|p| p.user_id == user_id).cloned()
    }
}
