use hmpi_core::error::HmpiError;
use hmpi_core::hmpi::classification::{CRITICAL_FROM, MODERATE_FROM, UNSAFE_FROM};
use hmpi_core::model::Metal;
use hmpi_core::standards::{builtin, load_standards, StandardsRegistry};
use std::path::Path;

pub fn list() -> Result<(), HmpiError> {
    println!("Available predefined standards:\n");
    for name in builtin::PRESETS {
        let def = builtin::load_preset(name)?;
        println!(
            "  {:<8} {} (v{}) [{} metals]",
            name,
            def.name,
            def.version,
            def.standards.len()
        );
        if let Some(ref desc) = def.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), HmpiError> {
    let registry = builtin::preset_registry(preset)?;
    print_registry(&registry);

    println!("HMPI = sum(Wi * Qi) / sum(Wi), where for each measured metal:");
    println!("  Si  permissible limit under the chosen reference (BIS or WHO)");
    println!("  Wi  weight / Si");
    println!("  Qi  Mi / Si * 100, Mi being the measured concentration\n");
    println!("Metals without a standard are left out of both sums. A sample with");
    println!("no standard-bearing metal gets no index.\n");
    println!("Bands:");
    println!("  Safe       below {MODERATE_FROM}");
    println!("  Moderate   {MODERATE_FROM} to below {CRITICAL_FROM}");
    println!("  Critical   {CRITICAL_FROM} to below {UNSAFE_FROM}");
    println!("  Unsafe     {UNSAFE_FROM} and above\n");

    Ok(())
}

fn print_registry(registry: &StandardsRegistry) {
    println!("{} (version {})\n", registry.name(), registry.version());
    if let Some(desc) = registry.description() {
        println!("{}\n", desc);
    }

    let max_name_len = registry.metal_names().map(str::len).max().unwrap_or(10);

    println!(
        "  {:<width$}  {:<6}  {:<10}  {:<10}  {:<6}  Unit",
        "Metal",
        "Symbol",
        "BIS",
        "WHO",
        "Weight",
        width = max_name_len
    );
    println!("  {}", "-".repeat(max_name_len + 48));

    for standard in registry.iter() {
        let symbol = Metal::from_str_loose(&standard.metal_name)
            .map(|m| m.symbol())
            .unwrap_or("-");
        println!(
            "  {:<width$}  {:<6}  {:<10}  {:<10}  {:<6}  {}",
            standard.metal_name,
            symbol,
            standard.bis_standard.to_string(),
            standard.who_standard.to_string(),
            standard.weight_factor.to_string(),
            standard.unit,
            width = max_name_len
        );
        if let Some(ref note) = standard.note {
            println!("  {:<width$}  ({})", "", note, width = max_name_len);
        }
    }
    println!();
}

pub fn schema() -> Result<(), HmpiError> {
    print!(
        r#"JSON Standards Schema
=====================

A standards file lists, per heavy metal, the permissible limit under the
Indian (BIS) and WHO drinking water standards. `hmpi score --standards FILE`
uses it in place of the built-in preset.

Top-level fields:
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  Where the limits come from
  version       (string, required)  Version identifier (e.g., "2012.1")
  unit          (string, optional)  Concentration unit. Default: "mg/L"
  standards     (array, required)   One entry per metal (see below)

Each entry in the "standards" array:
  metal         (string, required)  Metal name or symbol ("lead", "Pb").
                                    Names are normalized, so two entries
                                    for the same metal are rejected.
  bis           (string, required)  BIS permissible limit, > 0
  who           (string, required)  WHO guideline value, > 0
  weight        (string, optional)  Weight factor, > 0. Default: "1"
  unit          (string, optional)  Per-metal unit override
  note          (string, optional)  Regulatory reference or explanation

Example:
{{
  "name": "Site X limits",
  "version": "1.0",
  "standards": [
    {{ "metal": "lead", "bis": "0.01", "who": "0.01" }},
    {{ "metal": "As", "bis": "0.01", "who": "0.01", "weight": "2",
       "note": "Double weight for the arsenic survey" }}
  ]
}}

Note: limit values must be quoted strings, not bare numbers, to preserve
exact decimal precision (e.g., "0.003" not 0.003).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), HmpiError> {
    let def = load_standards(file)?;
    let registry = StandardsRegistry::new(&def)?;

    println!(
        "Standards '{}' (v{}) are valid.",
        registry.name(),
        registry.version()
    );
    println!("  Metals: {}", registry.len());

    let mut warnings = Vec::new();
    for standard in registry.iter() {
        if Metal::from_str_loose(&standard.metal_name).is_none() {
            warnings.push(format!(
                "'{}' is not one of the sample sheet metals and will never be scored",
                standard.metal_name
            ));
        }
    }
    for metal in Metal::ALL {
        if registry.lookup(metal.name()).is_none() {
            warnings.push(format!("no standard for {}; it will be skipped", metal));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
