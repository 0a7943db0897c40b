//! Three-column CSV dialect for item lists: label, weight, color.
//!
//! The field scanner is deliberately minimal: a `"` toggles quoting, a `,`
//! separates only outside quotes, and everything else is taken literally.
//! Doubled quotes are NOT unescaped on parse even though `serialize`
//! escapes `"` as `""` on the way out. That asymmetry is inherited
//! behavior, kept on purpose; see DESIGN.md before changing it.

use crate::config::{palette_color, Color};
use crate::layout::{effective_weight, Item};

/// Parses CSV text into items. Total: malformed rows are dropped, invalid
/// weights and colors fall back to their defaults, and an empty result is
/// left for the caller to report.
pub fn parse(text: &str) -> Vec<Item> {
    let mut items = Vec::new();
    for (row, line) in text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
    {
        let columns = split_line(line);
        let Some(label) = columns.first().map(|c| c.trim()) else {
            continue;
        };
        if label.is_empty() {
            continue;
        }

        let weight = columns
            .get(1)
            .and_then(|c| c.trim().parse::<f64>().ok())
            .filter(|w| w.is_finite() && *w > 0.0);

        // Color fallback cycles the palette by row position among the
        // non-blank lines, skipped rows included.
        let color = match columns.get(2).map(|c| c.trim()) {
            Some(token) if Color::parse(token).is_some() => token.to_string(),
            _ => palette_color(row).to_string(),
        };

        items.push(Item::new(label, weight, color));
    }
    items
}

/// Serializes items as `"label",weight,color` lines, quoting every label
/// and doubling any embedded quotes. Absent weights are written through
/// the shared weight fallback.
pub fn serialize(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "\"{}\",{},{}",
                item.label.replace('"', "\"\""),
                effective_weight(item),
                item.color
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
