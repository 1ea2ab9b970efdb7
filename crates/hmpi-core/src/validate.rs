use chrono::NaiveDate;

use crate::error::HmpiError;
use crate::model::{EnvironmentalReadings, Metal, MetalReadings, NewSample, SampleUpdate, WaterSample};

/// Check a submitted sample before it is stored or scored.
pub fn validate_new_sample(sample: &NewSample) -> Result<(), HmpiError> {
    check_name("test_name", &sample.test_name)?;
    check_name("location_name", &sample.location_name)?;
    check_coordinates(sample.latitude, sample.longitude)?;
    check_dates(sample.collection_date, sample.testing_date)?;
    validate_readings(&sample.metals)?;
    validate_environment(&sample.environment)
}

/// Check the fields a correction sets. Cross-field rules (date order) are
/// checked on the corrected record with `validate_stored_sample`.
pub fn validate_update(update: &SampleUpdate) -> Result<(), HmpiError> {
    if let Some(ref name) = update.test_name {
        check_name("test_name", name)?;
    }
    if let Some(ref name) = update.location_name {
        check_name("location_name", name)?;
    }
    if let Some(latitude) = update.latitude {
        check_coordinates(latitude, 0.0)?;
    }
    if let Some(longitude) = update.longitude {
        check_coordinates(0.0, longitude)?;
    }
    for (metal, value) in &update.readings {
        if let Some(value) = value {
            check_concentration(metal.name(), *value)?;
        }
    }
    if let Some(ref environment) = update.environment {
        validate_environment(environment)?;
    }
    Ok(())
}

/// Check a full record, e.g. after a correction has been applied.
pub fn validate_stored_sample(sample: &WaterSample) -> Result<(), HmpiError> {
    check_coordinates(sample.latitude, sample.longitude)?;
    check_dates(sample.collection_date, sample.testing_date)?;
    validate_readings(&sample.metals)
}

pub fn validate_readings(readings: &MetalReadings) -> Result<(), HmpiError> {
    for metal in Metal::ALL {
        if let Some(value) = readings.get(metal) {
            check_concentration(metal.name(), value)?;
        }
    }
    Ok(())
}

/// Largest accepted concentration in mg/L: one kilogram per litre, the
/// density of pure water.
pub const MAX_CONCENTRATION: f64 = 1.0e6;

/// A concentration must be finite, non-negative and at most
/// `MAX_CONCENTRATION`.
pub fn check_concentration(metal: &str, value: f64) -> Result<(), HmpiError> {
    if !value.is_finite() || !(0.0..=MAX_CONCENTRATION).contains(&value) {
        return Err(HmpiError::InvalidConcentration {
            metal: metal.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_environment(env: &EnvironmentalReadings) -> Result<(), HmpiError> {
    let fields = [
        ("ph_level", env.ph_level),
        ("turbidity", env.turbidity),
        ("dissolved_oxygen", env.dissolved_oxygen),
        ("electrical_conductivity", env.electrical_conductivity),
        ("temperature", env.temperature),
    ];
    for (name, value) in fields {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(HmpiError::InvalidSample(format!("{} is not a finite number", name)));
            }
        }
    }
    if let Some(ph) = env.ph_level {
        if !(0.0..=14.0).contains(&ph) {
            return Err(HmpiError::InvalidSample(format!("ph_level {} is outside 0-14", ph)));
        }
    }
    Ok(())
}

fn check_name(field: &str, value: &str) -> Result<(), HmpiError> {
    if value.trim().is_empty() {
        return Err(HmpiError::InvalidSample(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), HmpiError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(HmpiError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }
    Ok(())
}

fn check_dates(collected: NaiveDate, tested: NaiveDate) -> Result<(), HmpiError> {
    if tested < collected {
        return Err(HmpiError::InvalidSample(format!(
            "testing date {} is before collection date {}",
            tested, collected
        )));
    }
    Ok(())
}
