use std::collections::HashMap;
use std::sync::LazyLock;

/// Normalize a metal name from a lab sheet or standards file to a canonical key.
///
/// Steps:
/// 1. Strip a chemical symbol suffix like " (As)" or " As"
/// 2. Lowercase
/// 3. Replace spaces, hyphens, parentheses with underscores
/// 4. Collapse multiple underscores
/// 5. Look up in alias map
///
/// Names without an alias pass through in their normalized form, so a
/// contaminant added to a standards file later still gets a stable key.
pub fn normalize_metal(raw: &str) -> String {
    let mut s = raw.trim().to_string();

    // "Arsenic (As)" -> "Arsenic", but keep "Chromium (total)" intact
    if let Some(idx) = s.rfind('(') {
        let inner = s[idx..].trim_start_matches('(').trim_end_matches(')');
        if s.ends_with(')') && is_element_symbol(inner) {
            s = s[..idx].trim_end().to_string();
        }
    }

    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() >= 2 && is_element_symbol(words[words.len() - 1]) {
        s = words[..words.len() - 1].join(" ");
    }

    s = s.to_lowercase();

    let mut normalized = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'a'..='z' | '0'..='9' => normalized.push(c),
            _ => normalized.push('_'),
        }
    }

    let mut result = String::with_capacity(normalized.len());
    let mut prev_underscore = true;
    for c in normalized.chars() {
        if c == '_' {
            if !prev_underscore {
                result.push('_');
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }

    match ALIASES.get(result.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => result,
    }
}

/// Check if a string is the symbol of a metal tracked in groundwater surveys.
fn is_element_symbol(s: &str) -> bool {
    matches!(
        s,
        "As" | "Cd"
            | "Cr"
            | "Cu"
            | "Fe"
            | "Pb"
            | "Mn"
            | "Hg"
            | "Ni"
            | "Zn"
            | "Co"
            | "Se"
            | "Sb"
            | "Ba"
            | "Al"
            | "U"
    )
}

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("as", "arsenic");
    m.insert("arsenic_total", "arsenic");
    m.insert("cd", "cadmium");
    m.insert("cr", "chromium");
    m.insert("chromium_total", "chromium");
    m.insert("total_chromium", "chromium");
    m.insert("cr_total", "chromium");
    m.insert("cu", "copper");
    m.insert("fe", "iron");
    m.insert("iron_total", "iron");
    m.insert("pb", "lead");
    m.insert("mn", "manganese");
    m.insert("hg", "mercury");
    m.insert("ni", "nickel");
    m.insert("zn", "zinc");
    m.insert("co", "cobalt");
    m.insert("se", "selenium");
    m.insert("sb", "antimony");
    m.insert("ba", "barium");
    m.insert("al", "aluminium");
    m.insert("aluminum", "aluminium");
    m.insert("u", "uranium");

    m
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(normalize_metal("Lead"), "lead");
    }

    #[test]
    fn test_with_chemical_symbol_parens() {
        assert_eq!(normalize_metal("Arsenic (As)"), "arsenic");
    }

    #[test]
    fn test_with_chemical_symbol_no_parens() {
        assert_eq!(normalize_metal("Mercury Hg"), "mercury");
    }

    #[test]
    fn test_bare_symbols() {
        assert_eq!(normalize_metal("Pb"), "lead");
        assert_eq!(normalize_metal("zn"), "zinc");
    }

    #[test]
    fn test_total_chromium_variants() {
        assert_eq!(normalize_metal("Chromium (total)"), "chromium");
        assert_eq!(normalize_metal("Total chromium"), "chromium");
        assert_eq!(normalize_metal("Cr-total"), "chromium");
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(normalize_metal("  Nickel  "), "nickel");
    }

    #[test]
    fn test_unknown_metal_passthrough() {
        assert_eq!(normalize_metal("Thallium compounds"), "thallium_compounds");
    }
}
