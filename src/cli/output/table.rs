//! Table output formatting for CLI commands using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::ModelInfo;

/// Format the model listing, marking the active model
pub fn format_models_table(models: &[ModelInfo], active: Option<&str>) -> String {
    let use_colors = supports_color();
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Model").add_attribute(Attribute::Bold),
        Cell::new("Size").add_attribute(Attribute::Bold),
        Cell::new("Active").add_attribute(Attribute::Bold),
    ]);

    for model in models {
        let is_active = active == Some(model.name.as_str());
        let active_cell = match (is_active, use_colors) {
            (true, true) => Cell::new("✓").fg(Color::Green),
            (true, false) => Cell::new("yes"),
            (false, _) => Cell::new(""),
        };

        table.add_row(vec![
            Cell::new(&model.name),
            Cell::new(model.size.map_or_else(|| "-".to_string(), format_size)),
            active_cell,
        ]);
    }

    table.to_string()
}

/// Human-readable byte size
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}
