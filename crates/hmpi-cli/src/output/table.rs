use hmpi_core::hmpi::outcome::round_for_display;
use hmpi_core::hmpi::{Classification, HmpiScore, ScoreOutcome};
use hmpi_core::summary::{summarize, Dashboard, Summary};
use hmpi_core::ScoredSample;

fn format_index(index: f64) -> String {
    match round_for_display(index) {
        Some(rounded) => rounded.to_string(),
        None => format!("{index:.2}"),
    }
}

pub fn print_scores(results: &[ScoredSample], verbose: bool) {
    let max_name = results
        .iter()
        .map(|r| r.test_name.len())
        .max()
        .unwrap_or(10)
        .max(6);

    for result in results {
        match (&result.outcome, &result.error) {
            (_, Some(error)) => {
                println!(
                    "  {:<width$}  rejected: {}",
                    result.test_name,
                    error,
                    width = max_name
                );
            }
            (Some(ScoreOutcome::Scored(score)), None) => {
                println!(
                    "  {:<width$}  HMPI {:>8}  -> {}",
                    result.test_name,
                    format_index(score.index),
                    score.classification,
                    width = max_name
                );
                if verbose {
                    print_contributions(score);
                } else {
                    print_exceedances(score);
                }
            }
            (Some(ScoreOutcome::NoScoreableMetals { skipped_metals }), None) => {
                println!(
                    "  {:<width$}  no scoreable metals",
                    result.test_name,
                    width = max_name
                );
                if verbose && !skipped_metals.is_empty() {
                    println!("    Without standard: {}", skipped_metals.join(", "));
                }
            }
            (None, None) => {}
        }
    }

    println!();
    print_summary(&summarize(results));
}

fn print_exceedances(score: &HmpiScore) {
    let exceeded: Vec<String> = score
        .exceedances()
        .map(|c| format!("{} {} > {}", c.metal, c.concentration, c.standard))
        .collect();
    if !exceeded.is_empty() {
        println!("    Above {} limit: {}", score.reference, exceeded.join(", "));
    }
}

fn print_contributions(score: &HmpiScore) {
    println!("    {}", score.reason);
    let max_metal = score
        .contributions
        .iter()
        .map(|c| c.metal.len())
        .max()
        .unwrap_or(8);

    for c in &score.contributions {
        let marker = if c.exceeds_standard() { " ***" } else { "" };
        println!(
            "    {:<width$}  Mi {:<10} Si {:<8} Wi {:<10.4} Qi {:<10.2}{}",
            c.metal,
            c.concentration,
            c.standard,
            c.unit_weight,
            c.quality_rating,
            marker,
            width = max_metal
        );
    }
    if !score.skipped_metals.is_empty() {
        println!("    Without standard: {}", score.skipped_metals.join(", "));
    }
}

pub fn print_summary(summary: &Summary) {
    println!("  Samples: {}", summary.total);
    for band in Classification::ALL {
        println!("    {:<10} {}", band.to_string(), summary.count(band));
    }
    if summary.unscored > 0 {
        println!("    {:<10} {}", "Unscored", summary.unscored);
    }
    match summary.mean_score {
        Some(mean) => println!("  Mean HMPI: {}", format_index(mean)),
        None => println!("  Mean HMPI: -"),
    }
}

pub fn print_dashboard(dashboard: &Dashboard) {
    println!("=== {} ===\n", dashboard.display_name);
    print_summary(&dashboard.summary);

    if dashboard.recent.is_empty() {
        return;
    }

    println!("\n  Recent samples:");
    for sample in &dashboard.recent {
        let score = match (sample.hmpi_score, sample.pollution_level) {
            (Some(index), Some(level)) => format!("{} ({})", format_index(index), level),
            _ => sample.status.to_string(),
        };
        println!(
            "    {}  {:<20} {:<20} {}",
            sample.collection_date, sample.test_name, sample.location_name, score
        );
    }
}
