//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Transforms
//!
//! ```text
//! hero   scaleToFit    1600x900
//! thumb  scaleAndCrop  200x200
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 dawn.jpg → 1000x500
//!     thumb: 125x63 /resources/assetthumbs/1/125x63
//! 002 brochure.pdf
//!     error: Not applicable: brochure.pdf is a pdf asset, not an image
//! ```

use crate::batch::BatchEntry;
use crate::imaging::TransformRegistry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_transforms(registry: &TransformRegistry) -> Vec<String> {
    if registry.is_empty() {
        return vec!["No transforms configured".to_string()];
    }
    let handle_w = registry.iter().map(|(h, _)| h.len()).max().unwrap_or(0);
    registry
        .iter()
        .map(|(handle, t)| {
            format!(
                "{handle:<handle_w$}  {:<12}  {}x{}",
                t.mode.as_str(),
                t.width,
                t.height
            )
        })
        .collect()
}

pub fn print_transforms(registry: &TransformRegistry) {
    for line in format_transforms(registry) {
        println!("{line}");
    }
}

pub fn format_batch(entries: &[BatchEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;

    for (i, entry) in entries.iter().enumerate() {
        let index = format_index(i + 1);
        match &entry.result {
            Ok(report) => {
                lines.push(format!("{index} {} → {}", entry.asset, report.size));
                lines.push(format!(
                    "{}thumb: {}x{} {}",
                    indent(1),
                    report.thumb.width,
                    report.thumb.height,
                    report.thumb.url
                ));
            }
            Err(e) => {
                failed += 1;
                lines.push(format!("{index} {}", entry.asset));
                lines.push(format!("{}error: {e}", indent(1)));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Evaluated {} assets, {} failed",
        entries.len(),
        failed
    ));
    lines
}

pub fn print_batch(entries: &[BatchEntry]) {
    for line in format_batch(entries) {
        println!("{line}");
    }
}
