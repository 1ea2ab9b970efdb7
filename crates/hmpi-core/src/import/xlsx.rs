use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Days, NaiveDate};

use crate::error::HmpiError;
use crate::import::{ImportedSamples, SkippedCell};
use crate::model::{EnvironmentalReadings, Metal, MetalReadings, NewSample};
use crate::parsing::{normalize_metal, parse_concentration};

/// What a header cell maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    TestName,
    LocationName,
    Latitude,
    Longitude,
    CollectionDate,
    TestingDate,
    Notes,
    Metal(Metal),
    PhLevel,
    Turbidity,
    DissolvedOxygen,
    ElectricalConductivity,
    Temperature,
    Ignored,
}

/// Map a header cell ("Lead (Pb)", "Latitude", "EC") to a column.
pub fn map_header(text: &str) -> Column {
    if let Some(metal) = Metal::from_str_loose(text) {
        return Column::Metal(metal);
    }
    // Drop a trailing unit such as "(mg/L)" or "[µS/cm]"
    let key = normalize_metal(text);
    let key = key
        .strip_suffix("_mg_l")
        .or_else(|| key.strip_suffix("_ntu"))
        .or_else(|| key.strip_suffix("_s_cm"))
        .or_else(|| key.strip_suffix("_c"))
        .unwrap_or(&key);

    match key {
        "test_name" | "test" | "sample" | "sample_id" | "sample_name" => Column::TestName,
        "location_name" | "location" | "site" => Column::LocationName,
        "latitude" | "lat" => Column::Latitude,
        "longitude" | "lon" | "lng" | "long" => Column::Longitude,
        "collection_date" | "collected" | "date_collected" | "sampling_date" => {
            Column::CollectionDate
        }
        "testing_date" | "tested" | "date_tested" | "analysis_date" => Column::TestingDate,
        "notes" | "note" | "remarks" => Column::Notes,
        "ph" | "ph_level" => Column::PhLevel,
        "turbidity" => Column::Turbidity,
        "dissolved_oxygen" | "do" => Column::DissolvedOxygen,
        "electrical_conductivity" | "ec" | "conductivity" => Column::ElectricalConductivity,
        "temperature" | "temp" => Column::Temperature,
        _ => match Metal::from_str_loose(key) {
            Some(metal) => Column::Metal(metal),
            None => Column::Ignored,
        },
    }
}

/// Parse a water test workbook: the first sheet, one header row, one sample
/// per row until the first empty row.
pub fn parse_samples_xlsx(bytes: &[u8]) -> Result<ImportedSamples, HmpiError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| HmpiError::Import(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HmpiError::Import("workbook has no sheets".into()))?
        .map_err(|e| HmpiError::Import(format!("failed to read first sheet: {e}")))?;

    parse_range(&sheet)
}

/// Parse samples from a worksheet range.
pub fn parse_range(sheet: &Range<Data>) -> Result<ImportedSamples, HmpiError> {
    let first_row = sheet.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = sheet.rows();

    let header = rows
        .next()
        .ok_or_else(|| HmpiError::Import("sheet is empty".into()))?;
    let columns: Vec<(Column, String)> = header
        .iter()
        .map(|cell| {
            let text = cell_as_string(cell).unwrap_or_default();
            (map_header(&text), text)
        })
        .collect();

    for (required, label) in [
        (Column::LocationName, "location_name"),
        (Column::Latitude, "latitude"),
        (Column::Longitude, "longitude"),
        (Column::CollectionDate, "collection_date"),
    ] {
        if !columns.iter().any(|(c, _)| *c == required) {
            return Err(HmpiError::Import(format!(
                "missing required column '{}'",
                label
            )));
        }
    }

    let mut samples = Vec::new();
    let mut skipped_cells = Vec::new();

    for (offset, row) in rows.enumerate() {
        // 1-based row number as shown in a spreadsheet
        let row_number = first_row + offset + 2;
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            break;
        }
        if let Some(sample) = parse_row(row, &columns, row_number, &mut skipped_cells) {
            samples.push(sample);
        }
    }

    if samples.is_empty() {
        return Err(HmpiError::Import("no sample rows found in xlsx".into()));
    }

    log::info!(
        "read {} sample(s) from xlsx, {} cell(s) skipped",
        samples.len(),
        skipped_cells.len()
    );

    Ok(ImportedSamples {
        samples,
        skipped_cells,
    })
}

fn parse_row(
    row: &[Data],
    columns: &[(Column, String)],
    row_number: usize,
    skipped: &mut Vec<SkippedCell>,
) -> Option<NewSample> {
    let mut test_name = None;
    let mut location_name = None;
    let mut latitude = None;
    let mut longitude = None;
    let mut collection_date = None;
    let mut testing_date = None;
    let mut notes = None;
    let mut metals = MetalReadings::default();
    let mut environment = EnvironmentalReadings::default();

    for (cell, (column, label)) in row.iter().zip(columns) {
        let mut skip = |reason: &str| {
            skipped.push(SkippedCell {
                row: row_number,
                column: label.clone(),
                text: format!("{cell}"),
                reason: reason.to_string(),
            });
        };

        match column {
            Column::TestName => test_name = cell_as_string(cell),
            Column::LocationName => location_name = cell_as_string(cell),
            Column::Notes => notes = cell_as_string(cell),
            Column::Latitude => latitude = cell_as_number(cell),
            Column::Longitude => longitude = cell_as_number(cell),
            Column::CollectionDate | Column::TestingDate => {
                let date = cell_as_date(cell);
                if date.is_none() && !matches!(cell, Data::Empty) {
                    skip("unrecognized date");
                }
                if *column == Column::CollectionDate {
                    collection_date = date;
                } else {
                    testing_date = date;
                }
            }
            Column::Metal(metal) => match cell_as_concentration(cell) {
                Ok(value) => metals.set(*metal, value),
                Err(e) => skip(&e.to_string()),
            },
            Column::PhLevel => environment.ph_level = cell_as_number(cell),
            Column::Turbidity => environment.turbidity = cell_as_number(cell),
            Column::DissolvedOxygen => environment.dissolved_oxygen = cell_as_number(cell),
            Column::ElectricalConductivity => {
                environment.electrical_conductivity = cell_as_number(cell)
            }
            Column::Temperature => environment.temperature = cell_as_number(cell),
            Column::Ignored => {}
        }
    }

    let (Some(location_name), Some(latitude), Some(longitude), Some(collection_date)) =
        (location_name, latitude, longitude, collection_date)
    else {
        skipped.push(SkippedCell {
            row: row_number,
            column: String::new(),
            text: String::new(),
            reason: "row lacks location, coordinates or collection date".into(),
        });
        return None;
    };

    Some(NewSample {
        test_name: test_name.unwrap_or_else(|| format!("Row {row_number}")),
        location_name,
        latitude,
        longitude,
        collection_date,
        testing_date: testing_date.unwrap_or(collection_date),
        notes,
        metals,
        environment,
    })
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn cell_as_concentration(cell: &Data) -> Result<Option<f64>, HmpiError> {
    match cell {
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) => parse_concentration(s),
        Data::Empty => Ok(None),
        other => Err(HmpiError::Import(format!("non-numeric cell '{other}'"))),
    }
}

fn cell_as_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => from_excel_serial(dt.as_f64()),
        Data::Float(f) => from_excel_serial(*f),
        Data::Int(i) => from_excel_serial(*i as f64),
        Data::DateTimeIso(s) => parse_date_text(s.get(..10).unwrap_or(s)),
        Data::String(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Last serial Excel can display, 9999-12-31.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Excel serial day number (1900 date system) to a date.
fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}
