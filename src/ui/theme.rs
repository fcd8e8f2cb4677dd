use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::layout::BlockKind;

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor Regular icons as fallback in the Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // Phosphor Fill as its own family, falling back to the default UI font
    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let mut fill_family = vec!["phosphor-fill".to_owned()];
    if let Some(proportional) = fonts.families.get(&FontFamily::Proportional) {
        fill_family.extend(proportional.iter().cloned());
    }
    fonts.families.insert(phosphor_fill_family(), fill_family);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();

    let bg = Color32::from_rgb(12, 14, 20);
    visuals.panel_fill = bg;
    visuals.window_fill = Color32::from_rgb(18, 20, 28);
    visuals.faint_bg_color = Color32::from_rgb(22, 24, 32);
    visuals.extreme_bg_color = Color32::from_rgb(8, 9, 13);

    // Cool slate grays
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(34, 37, 48);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(168, 174, 190));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(44, 48, 62);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 205, 220));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(64, 70, 90);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    let accent = accent_color();
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent;

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(20.0);

    ctx.set_style(style);
}

pub fn accent_color() -> Color32 {
    Color32::from_rgb(59, 130, 246)
}

/// Returns (track_bg, grid_line, label_text) for the timeline
pub fn timeline_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(20, 23, 32),     // track
        Color32::from_rgb(46, 50, 64),     // hour lines
        Color32::from_rgb(150, 156, 172),  // labels
    )
}

/// Section palette: blue, purple, cyan, pink, indigo, amber, emerald, rose
const COURSE_PALETTE: [Color32; 8] = [
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(168, 85, 247),
    Color32::from_rgb(6, 182, 212),
    Color32::from_rgb(236, 72, 153),
    Color32::from_rgb(99, 102, 241),
    Color32::from_rgb(245, 158, 11),
    Color32::from_rgb(16, 185, 129),
    Color32::from_rgb(244, 63, 94),
];

/// Stable palette slot for a course code, so a course keeps its color across regenerations
pub fn course_color_index(course_code: &str) -> usize {
    let hash = course_code
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    hash as usize % COURSE_PALETTE.len()
}

/// Returns (fill, stroke, text) for a block
pub fn block_colors(kind: BlockKind, course_code: Option<&str>) -> (Color32, Color32, Color32) {
    match kind {
        BlockKind::Section => {
            let base = COURSE_PALETTE[course_color_index(course_code.unwrap_or(""))];
            (base.gamma_multiply(0.45), base, Color32::WHITE)
        }
        BlockKind::Unavailable => (
            Color32::from_rgba_unmultiplied(120, 120, 130, 90),
            Color32::from_rgb(120, 120, 130),
            Color32::from_rgb(220, 220, 228),
        ),
        BlockKind::Avoid => (
            Color32::from_rgba_unmultiplied(245, 158, 11, 50),
            Color32::from_rgb(180, 120, 20),
            Color32::from_rgb(250, 204, 120),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_colors_are_stable() {
        assert_eq!(course_color_index("CSCI 1300"), course_color_index("CSCI 1300"));
        assert!(course_color_index("") < COURSE_PALETTE.len());
        let (fill, _, _) = block_colors(BlockKind::Section, Some("MATH 1510"));
        let (again, _, _) = block_colors(BlockKind::Section, Some("MATH 1510"));
        assert_eq!(fill, again);
    }
}
