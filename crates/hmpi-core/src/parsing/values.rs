use crate::error::HmpiError;

/// Parse a concentration cell from a lab sheet.
///
/// Handles formats like:
/// - "0.02" -> Some(0.02)
/// - "0,02" -> Some(0.02) (decimal comma)
/// - "", "-", "n.a.", "N/A", "nm" -> None (not measured)
///
/// Anything else, including below-detection markers such as "< 0.001", is an
/// error: an unquantified reading is neither a concentration nor an absence.
pub fn parse_concentration(s: &str) -> Result<Option<f64>, HmpiError> {
    let s = s.trim();

    if is_not_measured(s) {
        return Ok(None);
    }

    let normalized = s.replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|e| HmpiError::Import(format!("invalid number '{}': {}", s, e)))?;

    if !value.is_finite() {
        return Err(HmpiError::Import(format!("invalid number '{}'", s)));
    }

    Ok(Some(value))
}

fn is_not_measured(s: &str) -> bool {
    if s.is_empty() || s == "-" || s == "—" {
        return true;
    }
    matches!(
        s.to_lowercase().as_str(),
        "n.a." | "n/a" | "na" | "nm" | "not measured"
    )
}
