use uuid::Uuid;

use crate::error::HmpiError;
use crate::model::{Profile, WaterSample};
use crate::store::{SampleStore, StoreDocument};

/// Non-persistent store, for batch runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: StoreDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SampleStore for MemoryStore {
    fn insert(&mut self, sample: WaterSample) -> Result<WaterSample, HmpiError> {
        self.doc.insert(sample)
    }

    fn get(&self, id: Uuid) -> Result<Option<WaterSample>, HmpiError> {
        Ok(self.doc.get(id))
    }

    fn update(&mut self, sample: WaterSample) -> Result<(), HmpiError> {
        self.doc.update(sample)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, HmpiError> {
        Ok(self.doc.delete(id))
    }

    fn list_all(&self) -> Result<Vec<WaterSample>, HmpiError> {
        Ok(self.doc.samples.clone())
    }

    fn put_profile(&mut self, profile: Profile) -> Result<(), HmpiError> {
        self.doc.put_profile(profile);
        Ok(())
    }

    fn profile(&self, user_id: &str) -> Result<Option<Profile>, HmpiError> {
        Ok(self.doc.profile(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnvironmentalReadings, MetalReadings, NewSample};
    use chrono::{Duration, NaiveDate, Utc};

    fn sample(owner: &str, minutes_ago: i64) -> WaterSample {
        let new = NewSample {
            test_name: format!("T-{minutes_ago}"),
            location_name: "Tube well".into(),
            latitude: 12.9,
            longitude: 77.6,
            collection_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            testing_date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            notes: None,
            metals: MetalReadings::default(),
            environment: EnvironmentalReadings::default(),
        };
        WaterSample::new(new, owner.into(), Utc::now() - Duration::minutes(minutes_ago))
    }

    #[test]
    fn test_insert_requires_owner() {
        let mut store = MemoryStore::new();
        assert!(store.insert(sample("", 0)).is_err());
        assert!(store.insert(sample("u1", 0)).is_ok());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = MemoryStore::new();
        let s = sample("u1", 0);
        store.insert(s.clone()).unwrap();
        assert!(store.insert(s).is_err());
    }

    #[test]
    fn test_list_by_owner_newest_first() {
        let mut store = MemoryStore::new();
        store.insert(sample("u1", 30)).unwrap();
        store.insert(sample("u2", 20)).unwrap();
        store.insert(sample("u1", 10)).unwrap();

        let mine = store.list_by_owner("u1").unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].test_name, "T-10");
        assert_eq!(mine[1].test_name, "T-30");
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = MemoryStore::new();
        let mut s = store.insert(sample("u1", 0)).unwrap();
        s.notes = Some("duplicate vial".into());
        store.update(s.clone()).unwrap();
        assert_eq!(store.get(s.id).unwrap().unwrap().notes, s.notes);

        assert!(store.delete(s.id).unwrap());
        assert!(!store.delete(s.id).unwrap());
        assert!(matches!(store.update(s), Err(HmpiError::SampleNotFound(_))));
    }

    #[test]
    fn test_profile_upsert() {
        let mut store = MemoryStore::new();
        store
            .put_profile(Profile {
                user_id: "u1".into(),
                full_name: Some("First".into()),
                ..Default::default()
            })
            .unwrap();
        store
            .put_profile(Profile {
                user_id: "u1".into(),
                full_name: Some("Second".into()),
                ..Default::default()
            })
            .unwrap();
        let profile = store.profile("u1").unwrap().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Second"));
        assert!(store.profile("u2").unwrap().is_none());
    }
}
