//! CLI output formatting

use crate::execution::{BuildReport, Variant};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Header printed before a variant's stepper starts
pub fn format_variant_header(
    language: &str,
    variant: &Variant,
    position: usize,
    total: usize,
) -> String {
    let version = match &variant.version {
        Some(version) => format!("{} {}", language, version),
        None => language.to_string(),
    };
    let mut header = format!(
        "{} Build {} [{}/{}]",
        ROCKET,
        style(version).bold(),
        position + 1,
        total
    );
    if !variant.block.is_empty() {
        header.push_str(&format!(" {}", style(variant.block.describe()).cyan()));
    }
    header
}

/// Final summary across all variants
pub fn format_report(report: &BuildReport) -> String {
    if report.is_success() {
        return format!(
            "{} {} variant(s) finished {}",
            CHECK,
            report.variants_run,
            style("successfully").green()
        );
    }

    let mut lines = vec![format!(
        "{} {} variant(s) finished with {} failed command(s)",
        CROSS,
        report.variants_run,
        style(report.failures.len()).red()
    )];
    for failure in &report.failures {
        lines.push(format!("  {} {}", style("✗").red(), failure));
    }
    for reason in &report.aborted {
        lines.push(format!("  {} {}", style("aborted:").red(), reason));
    }
    lines.join("\n")
}
