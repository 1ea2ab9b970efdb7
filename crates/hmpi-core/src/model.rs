use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hmpi::{Classification, ScoreOutcome};
use crate::parsing::normalize_metal;

/// Identity of the user who owns a sample.
pub type UserId = String;

/// Metal name -> measured concentration (mg/L). The calculator's input shape.
pub type Concentrations = BTreeMap<String, f64>;

/// The ten heavy metals recorded on a water test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Arsenic,
    Cadmium,
    Chromium,
    Copper,
    Iron,
    Lead,
    Manganese,
    Mercury,
    Nickel,
    Zinc,
}

impl Metal {
    pub const ALL: [Metal; 10] = [
        Metal::Arsenic,
        Metal::Cadmium,
        Metal::Chromium,
        Metal::Copper,
        Metal::Iron,
        Metal::Lead,
        Metal::Manganese,
        Metal::Mercury,
        Metal::Nickel,
        Metal::Zinc,
    ];

    /// Canonical key, as used by the standards registry.
    pub fn name(&self) -> &'static str {
        match self {
            Metal::Arsenic => "arsenic",
            Metal::Cadmium => "cadmium",
            Metal::Chromium => "chromium",
            Metal::Copper => "copper",
            Metal::Iron => "iron",
            Metal::Lead => "lead",
            Metal::Manganese => "manganese",
            Metal::Mercury => "mercury",
            Metal::Nickel => "nickel",
            Metal::Zinc => "zinc",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Arsenic => "As",
            Metal::Cadmium => "Cd",
            Metal::Chromium => "Cr",
            Metal::Copper => "Cu",
            Metal::Iron => "Fe",
            Metal::Lead => "Pb",
            Metal::Manganese => "Mn",
            Metal::Mercury => "Hg",
            Metal::Nickel => "Ni",
            Metal::Zinc => "Zn",
        }
    }

    /// Resolve a loosely written metal name ("Lead (Pb)", "pb", "LEAD").
    pub fn from_str_loose(s: &str) -> Option<Metal> {
        let key = normalize_metal(s);
        Metal::ALL.into_iter().find(|m| m.name() == key)
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional per-metal concentrations in mg/L. An absent reading means the
/// metal was not measured, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalReadings {
    #[serde(default)]
    pub arsenic: Option<f64>,
    #[serde(default)]
    pub cadmium: Option<f64>,
    #[serde(default)]
    pub chromium: Option<f64>,
    #[serde(default)]
    pub copper: Option<f64>,
    #[serde(default)]
    pub iron: Option<f64>,
    #[serde(default)]
    pub lead: Option<f64>,
    #[serde(default)]
    pub manganese: Option<f64>,
    #[serde(default)]
    pub mercury: Option<f64>,
    #[serde(default)]
    pub nickel: Option<f64>,
    #[serde(default)]
    pub zinc: Option<f64>,
}

impl MetalReadings {
    pub fn get(&self, metal: Metal) -> Option<f64> {
        match metal {
            Metal::Arsenic => self.arsenic,
            Metal::Cadmium => self.cadmium,
            Metal::Chromium => self.chromium,
            Metal::Copper => self.copper,
            Metal::Iron => self.iron,
            Metal::Lead => self.lead,
            Metal::Manganese => self.manganese,
            Metal::Mercury => self.mercury,
            Metal::Nickel => self.nickel,
            Metal::Zinc => self.zinc,
        }
    }

    pub fn set(&mut self, metal: Metal, value: Option<f64>) {
        let slot = match metal {
            Metal::Arsenic => &mut self.arsenic,
            Metal::Cadmium => &mut self.cadmium,
            Metal::Chromium => &mut self.chromium,
            Metal::Copper => &mut self.copper,
            Metal::Iron => &mut self.iron,
            Metal::Lead => &mut self.lead,
            Metal::Manganese => &mut self.manganese,
            Metal::Mercury => &mut self.mercury,
            Metal::Nickel => &mut self.nickel,
            Metal::Zinc => &mut self.zinc,
        };
        *slot = value;
    }

    /// Measured metals only, in `Metal::ALL` order.
    pub fn measured(&self) -> impl Iterator<Item = (Metal, f64)> + '_ {
        Metal::ALL
            .into_iter()
            .filter_map(|m| self.get(m).map(|v| (m, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.measured().next().is_none()
    }

    pub fn concentrations(&self) -> Concentrations {
        self.measured()
            .map(|(m, v)| (m.name().to_string(), v))
            .collect()
    }
}

/// Auxiliary field readings. Stored with the sample, not used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReadings {
    #[serde(default)]
    pub ph_level: Option<f64>,
    /// NTU.
    #[serde(default)]
    pub turbidity: Option<f64>,
    /// mg/L.
    #[serde(default)]
    pub dissolved_oxygen: Option<f64>,
    /// µS/cm.
    #[serde(default)]
    pub electrical_conductivity: Option<f64>,
    /// °C.
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleStatus {
    /// No score could be computed (no registered metal was measured).
    Pending,
    /// Recorded, awaiting scoring.
    #[default]
    Processing,
    Complete,
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleStatus::Pending => write!(f, "pending"),
            SampleStatus::Processing => write!(f, "processing"),
            SampleStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A sample as submitted, before it gets an id, an owner or a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSample {
    pub test_name: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub collection_date: NaiveDate,
    pub testing_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub metals: MetalReadings,
    #[serde(flatten)]
    pub environment: EnvironmentalReadings,
}

/// A partial correction to a stored sample.
///
/// `readings` maps a metal to its corrected value; `None` clears the reading.
/// Any entry there invalidates the stored score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleUpdate {
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub collection_date: Option<NaiveDate>,
    #[serde(default)]
    pub testing_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub readings: BTreeMap<Metal, Option<f64>>,
    #[serde(default)]
    pub environment: Option<EnvironmentalReadings>,
}

impl SampleUpdate {
    pub fn touches_readings(&self) -> bool {
        !self.readings.is_empty()
    }
}

/// A persisted water test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub id: Uuid,
    pub user_id: UserId,
    pub test_name: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub collection_date: NaiveDate,
    pub testing_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub metals: MetalReadings,
    #[serde(flatten)]
    pub environment: EnvironmentalReadings,
    /// Unrounded index; absent until a score exists.
    #[serde(default)]
    pub hmpi_score: Option<f64>,
    #[serde(default)]
    pub pollution_level: Option<Classification>,
    #[serde(default)]
    pub status: SampleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WaterSample {
    /// Create an unscored record owned by `owner`, in `Processing` state.
    pub fn new(sample: NewSample, owner: UserId, now: DateTime<Utc>) -> WaterSample {
        WaterSample {
            id: Uuid::new_v4(),
            user_id: owner,
            test_name: sample.test_name,
            location_name: sample.location_name,
            latitude: sample.latitude,
            longitude: sample.longitude,
            collection_date: sample.collection_date,
            testing_date: sample.testing_date,
            notes: sample.notes,
            metals: sample.metals,
            environment: sample.environment,
            hmpi_score: None,
            pollution_level: None,
            status: SampleStatus::Processing,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the derived fields from a scoring run.
    pub fn apply_outcome(&mut self, outcome: &ScoreOutcome) {
        match outcome {
            ScoreOutcome::Scored(score) => {
                self.hmpi_score = Some(score.index);
                self.pollution_level = Some(score.classification);
                self.status = SampleStatus::Complete;
            }
            ScoreOutcome::NoScoreableMetals { .. } => {
                self.hmpi_score = None;
                self.pollution_level = None;
                self.status = SampleStatus::Pending;
            }
        }
    }

    pub fn clear_score(&mut self) {
        self.hmpi_score = None;
        self.pollution_level = None;
        self.status = SampleStatus::Processing;
    }

    /// Apply a correction. Returns true when metal readings changed, in which
    /// case the stored score has been cleared and the sample must be rescored.
    pub fn apply_update(&mut self, update: SampleUpdate, now: DateTime<Utc>) -> bool {
        if let Some(v) = update.test_name {
            self.test_name = v;
        }
        if let Some(v) = update.location_name {
            self.location_name = v;
        }
        if let Some(v) = update.latitude {
            self.latitude = v;
        }
        if let Some(v) = update.longitude {
            self.longitude = v;
        }
        if let Some(v) = update.collection_date {
            self.collection_date = v;
        }
        if let Some(v) = update.testing_date {
            self.testing_date = v;
        }
        if let Some(v) = update.notes {
            self.notes = Some(v);
        }
        if let Some(v) = update.environment {
            self.environment = v;
        }

        let readings_changed = !update.readings.is_empty();
        for (metal, value) in update.readings {
            self.metals.set(metal, value);
        }
        if readings_changed {
            self.clear_score();
        }

        self.updated_at = now;
        readings_changed
    }
}

/// Researcher profile, keyed by the owning user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Profile {
    /// Name to greet the user with: full name when set, user id otherwise.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.user_id)
    }
}
