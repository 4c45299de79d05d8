//! Color constants for the dashboard.

use ratatui::style::Color;

use crate::fields::TaskType;

/// Progress gauges and completed milestones
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Selection highlight and high priority
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Delete confirmation
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Milestone pane
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

pub fn type_color(t: TaskType) -> Color {
    match t {
        TaskType::Bug => Color::Rgb(220, 80, 80),
        TaskType::Feature => Color::Rgb(90, 150, 230),
        TaskType::Improvement => Color::Rgb(120, 200, 120),
        TaskType::General => Color::Gray,
    }
}
