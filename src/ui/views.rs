use egui::{Color32, RichText, Ui};

use crate::api::GraduationRequirement;
use crate::layout::{
    format_display_range, ruler, BlockKind, RulerRange, ScheduleBlock, ScheduleLayout, DAY_NAMES,
};
use super::theme::{block_colors, timeline_colors};
use super::view_state::{PreferenceForm, SlotInput, ViewState};

// Layout constants
const DAY_LABEL_WIDTH: f32 = 96.0;
const HEADER_HEIGHT: f32 = 24.0;
const ROW_HEIGHT: f32 = 64.0;
const ROW_GAP: f32 = 6.0;
const MIN_BLOCK_WIDTH: f32 = 2.0;

/// Tooltip text for a block
fn block_tooltip(block: &ScheduleBlock) -> String {
    let range = format_display_range(&block.start_time, &block.end_time);
    match block.kind {
        BlockKind::Section => {
            let mut lines = vec![block.label.clone()];
            if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
                lines.push(title.to_string());
            }
            if !block.instructors.is_empty() {
                lines.push(block.instructors.join(", "));
            }
            lines.push(range);
            lines.join("\n")
        }
        BlockKind::Unavailable | BlockKind::Avoid => format!("{}\n{}", block.label, range),
    }
}

/// Render the week timeline: a ruler along the top and one row per weekday
pub fn render_timeline(ui: &mut Ui, layout: &ScheduleLayout, ruler_range: RulerRange) {
    let window = layout.visible_window;
    let (track_bg, grid_color, label_color) = timeline_colors();

    let available_width = ui.available_width();
    let track_width = (available_width - DAY_LABEL_WIDTH).max(1.0);
    let total_height = HEADER_HEIGHT + DAY_NAMES.len() as f32 * (ROW_HEIGHT + ROW_GAP);

    let (rect, _) = ui.allocate_exact_size(egui::vec2(available_width, total_height), egui::Sense::hover());
    let track_left = rect.min.x + DAY_LABEL_WIDTH;
    let x_at = |window_percent: f64| track_left + (window_percent as f32 / 100.0) * track_width;

    let painter = ui.painter_at(rect);

    // Ruler marks are full-day positions; only the ones inside the window are drawn
    let rows_top = rect.min.y + HEADER_HEIGHT;
    let rows_bottom = rect.max.y;
    for mark in ruler(ruler_range) {
        if !window.contains_percent(mark.left_percent) {
            continue;
        }
        let x = x_at(window.project(mark.left_percent));
        painter.text(
            egui::pos2(x, rect.min.y + HEADER_HEIGHT / 2.0),
            egui::Align2::CENTER_CENTER,
            &mark.label,
            egui::FontId::proportional(12.0),
            label_color,
        );
        painter.line_segment(
            [egui::pos2(x, rows_top), egui::pos2(x, rows_bottom)],
            egui::Stroke::new(1.0, grid_color),
        );
    }

    for (day, day_name) in DAY_NAMES.iter().enumerate() {
        let row_top = rows_top + day as f32 * (ROW_HEIGHT + ROW_GAP);
        let row_rect = egui::Rect::from_min_size(
            egui::pos2(track_left, row_top),
            egui::vec2(track_width, ROW_HEIGHT),
        );

        painter.text(
            egui::pos2(rect.min.x + 8.0, row_rect.center().y),
            egui::Align2::LEFT_CENTER,
            *day_name,
            egui::FontId::proportional(14.0),
            label_color,
        );
        painter.rect_filled(row_rect, 4.0, track_bg.gamma_multiply(0.8));

        for (i, block) in layout.per_day[day].iter().enumerate() {
            render_block(ui, &painter, row_rect, block, &x_at, (day, i));
        }
    }
}

fn render_block(
    ui: &Ui,
    painter: &egui::Painter,
    row_rect: egui::Rect,
    block: &ScheduleBlock,
    x_at: &dyn Fn(f64) -> f32,
    id: (usize, usize),
) {
    let left = x_at(block.left_percent);
    // Degenerate blocks still show up as a sliver
    let width = (x_at(block.right_percent()) - left).max(MIN_BLOCK_WIDTH);

    // Ranges sit behind sections: full height for sections, inset for busy/avoid
    let inset = match block.kind {
        BlockKind::Section => 4.0,
        BlockKind::Unavailable | BlockKind::Avoid => 1.0,
    };
    let block_rect = egui::Rect::from_min_size(
        egui::pos2(left, row_rect.min.y + inset),
        egui::vec2(width, row_rect.height() - inset * 2.0),
    )
    .intersect(row_rect);

    if !block_rect.is_positive() {
        return;
    }

    let (fill, stroke, text) = block_colors(block.kind, block.course_code.as_deref());
    painter.rect(block_rect, 4.0, fill, egui::Stroke::new(1.0, stroke));

    // Course code, then the title on a second line when there is room
    let text_pos = egui::pos2(block_rect.min.x + 6.0, block_rect.min.y + 6.0);
    if block_rect.width() > 40.0 {
        let clip = painter.with_clip_rect(block_rect.shrink(2.0));
        clip.text(
            text_pos,
            egui::Align2::LEFT_TOP,
            &block.label,
            egui::FontId::proportional(13.0),
            text,
        );
        if let Some(title) = block.title.as_deref() {
            clip.text(
                text_pos + egui::vec2(0.0, 18.0),
                egui::Align2::LEFT_TOP,
                title,
                egui::FontId::proportional(11.0),
                text.gamma_multiply(0.8),
            );
        }
    }

    ui.interact(block_rect, ui.id().with(("block", id)), egui::Sense::hover())
        .on_hover_text(block_tooltip(block));
}

/// Render the sections beside the timeline. Returns the id of a section the user discarded.
pub fn render_sections(ui: &mut Ui, layout: &ScheduleLayout, view: &mut ViewState) -> Option<i64> {
    let mut discard = None;

    if layout.sections_summary.is_empty() {
        ui.label(RichText::new("No sections scheduled").weak());
        return None;
    }

    for summary in &layout.sections_summary {
        let expanded = view.is_section_expanded(&summary.course_code);
        let (_, stroke, _) = block_colors(BlockKind::Section, Some(&summary.course_code));

        egui::Frame::none()
            .stroke(egui::Stroke::new(1.0, stroke.gamma_multiply(0.6)))
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let caret = if expanded {
                        egui_phosphor::regular::CARET_DOWN
                    } else {
                        egui_phosphor::regular::CARET_RIGHT
                    };
                    let header = format!("{} {}  {}", caret, summary.course_code, summary.title);
                    if ui.add(egui::Label::new(RichText::new(header).strong()).sense(egui::Sense::click())).clicked() {
                        view.toggle_section(&summary.course_code);
                    }

                    if let Some(id) = summary.id {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let button = egui::Button::new(format!("{} Discard", egui_phosphor::regular::TRASH));
                            if ui.add(button).on_hover_text("Drop this section and regenerate").clicked() {
                                discard = Some(id);
                            }
                        });
                    }
                });

                if expanded {
                    if summary.requirement_labels.is_empty() {
                        ui.label(RichText::new("Fulfills no tracked requirement").weak());
                    } else {
                        for label in &summary.requirement_labels {
                            ui.label(format!("{} {}", egui_phosphor::regular::CHECK, label));
                        }
                    }
                }
            });
    }

    discard
}

/// Render degree requirements with expandable rows of satisfying courses
pub fn render_requirements(ui: &mut Ui, requirements: &[GraduationRequirement], view: &mut ViewState) {
    if requirements.is_empty() {
        ui.label(RichText::new("No requirements loaded").weak());
        return;
    }

    for (i, req) in requirements.iter().enumerate() {
        let expanded = view.is_requirement_expanded(i);
        let caret = if expanded {
            egui_phosphor::regular::CARET_DOWN
        } else {
            egui_phosphor::regular::CARET_RIGHT
        };
        let header = format!("{} {} ({} needed)", caret, req.label, req.needed);
        if ui.add(egui::Label::new(header).sense(egui::Sense::click())).clicked() {
            view.toggle_requirement(i);
        }

        if expanded {
            ui.indent(("requirement", i), |ui| {
                if req.satisfying_course_codes.is_empty() {
                    ui.label(RichText::new("No matching courses").weak());
                } else {
                    ui.label(req.satisfying_course_codes.join(", "));
                }
            });
        }
    }
}

/// "HH:MM" text input, drawn in red while it can't be read as a time
fn time_field(ui: &mut Ui, value: &mut String, hint: &str) {
    let valid = SlotInput::field_is_valid(value);
    let mut edit = egui::TextEdit::singleline(value).desired_width(60.0).hint_text(hint);
    if !valid {
        edit = edit.text_color(Color32::from_rgb(248, 113, 113));
    }
    ui.add(edit).on_hover_text("24-hour time, e.g. 13:30");
}

fn render_slot_rows(ui: &mut Ui, id_prefix: &str, rows: &mut Vec<SlotInput>) {
    let mut remove = None;

    for (i, row) in rows.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt((id_prefix, i))
                .selected_text(DAY_NAMES[row.day.min(DAY_NAMES.len() - 1)])
                .show_ui(ui, |ui| {
                    for (d, name) in DAY_NAMES.iter().enumerate() {
                        ui.selectable_value(&mut row.day, d, *name);
                    }
                });
            time_field(ui, &mut row.start, "09:00");
            ui.label("to");
            time_field(ui, &mut row.end, "17:00");
            if ui.button(egui_phosphor::regular::X).on_hover_text("Remove").clicked() {
                remove = Some(i);
            }
        });
    }

    if let Some(i) = remove {
        rows.remove(i);
    }

    if ui.button(format!("{} Add", egui_phosphor::regular::PLUS)).clicked() {
        rows.push(SlotInput::default());
    }
}

/// Time preference editor. Returns (save_clicked, cancel_clicked).
pub fn render_preferences(ui: &mut Ui, form: &mut PreferenceForm) -> (bool, bool) {
    let mut save = false;
    let mut cancel = false;

    ui.label(RichText::new("Unavailable").strong());
    ui.label(RichText::new("The generator will never schedule a class here").weak());
    render_slot_rows(ui, "unavailable", &mut form.unavailable);

    ui.add_space(12.0);
    ui.label(RichText::new("Avoid if possible").strong());
    ui.label(RichText::new("Used as a soft preference").weak());
    render_slot_rows(ui, "avoid", &mut form.avoid);

    ui.add_space(16.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(form.is_valid(), egui::Button::new("Save")).clicked() {
            save = true;
        }
        if ui.button("Cancel").clicked() {
            cancel = true;
        }
    });

    (save, cancel)
}

/// Legend explaining block colors
pub fn render_legend(ui: &mut Ui) {
    ui.horizontal(|ui| {
        for (kind, label) in [
            (BlockKind::Section, "Class"),
            (BlockKind::Unavailable, "Busy"),
            (BlockKind::Avoid, "Avoid"),
        ] {
            let (fill, stroke, _) = block_colors(kind, Some(""));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect(rect, 3.0, fill, egui::Stroke::new(1.0, stroke));
            ui.label(RichText::new(label).color(Color32::from_rgb(168, 174, 190)));
            ui.add_space(8.0);
        }
    });
}
