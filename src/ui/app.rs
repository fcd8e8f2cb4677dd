use eframe::egui;
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{info, warn};

use crate::api::{ApiError, GraduationRequirement, PlannerClient, UserInfo};
use crate::config::Config;
use crate::layout::{layout_schedule, RulerRange, ScheduleLayout};
use super::view_state::{PreferenceForm, ScheduleSession, ViewState};
use super::views;

pub struct PlannerApp {
    config: Config,
    state: AppState,

    // Data from the last completed schedule request
    schedule: ScheduleSession,
    requirements: Vec<GraduationRequirement>,
    discarded_section_ids: Vec<i64>,
    view: ViewState,

    // Time preferences window
    show_preferences: bool,
    preference_form: Option<PreferenceForm>,

    // Settings dialog
    show_settings: bool,
    settings_url: String,
    settings_token: String,
    settings_semester: String,
    settings_ruler: RulerRange,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    is_offline: bool,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

enum AsyncResult {
    ScheduleLoaded(u64, ScheduleLayout),
    ScheduleFailed(u64, ApiError),
    RequirementsLoaded(Vec<GraduationRequirement>),
    RequirementsFailed(ApiError),
    UserInfoLoaded(UserInfo),
    UserInfoFailed(ApiError),
    PreferencesSaved,
    PreferencesFailed(ApiError),
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!("could not load config, starting fresh: {:#}", e);
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let runtime = tokio::runtime::Runtime::new()?;
        let (result_tx, result_rx) = channel();

        let mut app = Self {
            show_settings: false,
            settings_url: config.api_base_url.clone(),
            settings_token: String::new(),
            settings_semester: config.semester.clone(),
            settings_ruler: config.ruler,
            config,
            state,
            schedule: ScheduleSession::default(),
            requirements: Vec::new(),
            discarded_section_ids: Vec::new(),
            view: ViewState::default(),
            show_preferences: false,
            preference_form: None,
            status_message: None,
            is_offline: false,
            runtime,
            result_rx,
            result_tx,
        };

        if state == AppState::Main {
            app.load_requirements();
        }

        Ok(app)
    }

    fn client(&mut self) -> Option<PlannerClient> {
        match PlannerClient::new(&self.config) {
            Ok(client) => Some(client),
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
                None
            }
        }
    }

    /// Surface a failed request. Leaves the schedule's loading state alone.
    fn handle_error(&mut self, error: ApiError) {
        if error.is_offline() {
            warn!("backend unreachable: {}", error);
            self.is_offline = true;
            self.status_message = None;
        } else {
            warn!("request failed: {}", error);
            self.is_offline = false;
            let message = if error.needs_reauth() {
                "Session rejected by the backend. Update your token in Settings.".to_string()
            } else {
                format!("Error: {}", error)
            };
            self.status_message = Some((message, true));
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::ScheduleLoaded(seq, layout) => {
                    if !self.schedule.apply_loaded(seq, layout) {
                        // A newer request superseded this one
                        info!(seq, "dropping stale schedule");
                        continue;
                    }
                    self.is_offline = false;
                    self.status_message = None;
                }
                AsyncResult::ScheduleFailed(seq, error) => {
                    if self.schedule.apply_failed(seq) {
                        self.handle_error(error);
                    } else {
                        info!(seq, "dropping stale schedule error");
                    }
                }
                AsyncResult::RequirementsLoaded(requirements) => {
                    self.requirements = requirements;
                    self.view.reset_requirements();
                }
                AsyncResult::RequirementsFailed(error) => self.handle_error(error),
                AsyncResult::UserInfoLoaded(info) => {
                    if self.show_preferences {
                        self.preference_form = Some(PreferenceForm::from_user_info(info));
                    }
                }
                AsyncResult::UserInfoFailed(error) => {
                    // Nothing to edit without the current profile
                    self.show_preferences = false;
                    self.preference_form = None;
                    self.handle_error(error);
                }
                AsyncResult::PreferencesSaved => {
                    self.show_preferences = false;
                    self.preference_form = None;
                    self.status_message = Some(("Time preferences saved".to_string(), false));
                    // Regenerate so the new constraints show up
                    self.generate_schedule();
                }
                // The form stays open so the edits aren't lost
                AsyncResult::PreferencesFailed(error) => self.handle_error(error),
            }
        }
    }

    /// Request a fresh schedule. Any request still in flight is superseded.
    fn generate_schedule(&mut self) {
        let Some(client) = self.client() else { return };

        let seq = self.schedule.begin();
        let semester = self.config.semester.clone();
        let discarded = self.discarded_section_ids.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = client.autogenerate_schedule(&semester, &discarded).await;
            let message = match result {
                Ok(mut schedule) => {
                    // Older backends don't echo the discarded ids back
                    if schedule.discarded_section_ids.is_empty() {
                        schedule.discarded_section_ids = discarded;
                    }
                    AsyncResult::ScheduleLoaded(seq, layout_schedule(&schedule))
                }
                Err(e) => AsyncResult::ScheduleFailed(seq, e),
            };
            let _ = tx.send(message);
        });
    }

    fn discard_section(&mut self, section_id: i64) {
        if !self.discarded_section_ids.contains(&section_id) {
            self.discarded_section_ids.push(section_id);
        }
        info!(section_id, "section discarded");
        self.generate_schedule();
    }

    fn load_requirements(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let message = match client.get_requirements().await {
                Ok(requirements) => AsyncResult::RequirementsLoaded(requirements),
                Err(e) => AsyncResult::RequirementsFailed(e),
            };
            let _ = tx.send(message);
        });
    }

    fn open_preferences(&mut self) {
        let Some(client) = self.client() else { return };
        self.show_preferences = true;
        self.preference_form = None;

        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let message = match client.get_user_info().await {
                Ok(info) => AsyncResult::UserInfoLoaded(info),
                Err(e) => AsyncResult::UserInfoFailed(e),
            };
            let _ = tx.send(message);
        });
    }

    fn save_preferences(&mut self) {
        let Some(form) = &self.preference_form else { return };
        if !form.is_valid() {
            return;
        }
        let info = form.to_user_info();

        let Some(client) = self.client() else { return };
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let message = match client.set_time_preferences(&info).await {
                Ok(()) => AsyncResult::PreferencesSaved,
                Err(e) => AsyncResult::PreferencesFailed(e),
            };
            let _ = tx.send(message);
        });
    }

    fn save_settings(&mut self) {
        self.config.api_base_url = self.settings_url.trim().to_string();
        if !self.settings_token.trim().is_empty() {
            self.config.api_token = Some(self.settings_token.trim().to_string());
        }
        let semester_changed = self.config.semester != self.settings_semester.trim();
        self.config.semester = self.settings_semester.trim().to_string();
        self.config.ruler = self.settings_ruler;

        if let Err(e) = self.config.save() {
            self.status_message = Some((format!("Failed to save settings: {:#}", e), true));
            return;
        }

        self.settings_token.clear();
        self.show_settings = false;

        if self.config.is_configured() {
            let was_setup = self.state == AppState::Setup;
            self.state = AppState::Main;
            if was_setup {
                self.load_requirements();
            }
            if semester_changed {
                // Discarded ids belong to the old semester's sections
                self.discarded_section_ids.clear();
                if self.schedule.has_schedule {
                    self.generate_schedule();
                }
            }
        }
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Connect to your course planner");
            ui.add_space(16.0);
        });

        egui::Grid::new("setup_grid").num_columns(2).spacing([12.0, 10.0]).show(ui, |ui| {
            ui.label("Backend URL");
            ui.add(egui::TextEdit::singleline(&mut self.settings_url).hint_text("planner.example.edu"));
            ui.end_row();

            ui.label("Access token");
            ui.add(egui::TextEdit::singleline(&mut self.settings_token).password(true));
            ui.end_row();

            ui.label("Semester");
            ui.add(egui::TextEdit::singleline(&mut self.settings_semester).hint_text("202501"));
            ui.end_row();
        });

        ui.add_space(12.0);
        let ready = !self.settings_url.trim().is_empty() && !self.settings_token.trim().is_empty();
        if ui.add_enabled(ready, egui::Button::new("Connect")).clicked() {
            self.save_settings();
        }

        if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error { Color32::from_rgb(248, 113, 113) } else { Color32::LIGHT_GREEN };
            ui.label(RichText::new(msg).color(color));
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(format!("Schedule {}", self.config.semester));

            let label = if self.schedule.has_schedule {
                format!("{} Regenerate", egui_phosphor::regular::ARROWS_CLOCKWISE)
            } else {
                format!("{} Generate schedule", egui_phosphor::regular::MAGIC_WAND)
            };
            if ui.add_enabled(!self.schedule.loading, egui::Button::new(label)).clicked() {
                self.generate_schedule();
            }

            if !self.discarded_section_ids.is_empty()
                && ui
                    .button(format!("Restore {} discarded", self.discarded_section_ids.len()))
                    .clicked()
            {
                self.discarded_section_ids.clear();
                self.generate_schedule();
            }

            if self.schedule.loading {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(egui_phosphor::regular::GEAR).on_hover_text("Settings").clicked() {
                    self.show_settings = true;
                    self.settings_url = self.config.api_base_url.clone();
                    self.settings_semester = self.config.semester.clone();
                    self.settings_ruler = self.config.ruler;
                }
                if ui.button(format!("{} Time preferences", egui_phosphor::regular::CLOCK)).clicked() {
                    self.open_preferences();
                }
                let req_label = if self.view.show_requirements { "Hide requirements" } else { "Requirements" };
                if ui.button(req_label).clicked() {
                    self.view.toggle_requirements();
                }
            });
        });

        if self.is_offline {
            ui.label(
                RichText::new(format!("{} Offline: the planner backend is unreachable", egui_phosphor::regular::WIFI_SLASH))
                    .color(Color32::from_rgb(250, 204, 21)),
            );
        }
        if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error { Color32::from_rgb(248, 113, 113) } else { Color32::LIGHT_GREEN };
            ui.label(RichText::new(msg).color(color));
        }

        ui.add_space(8.0);
        views::render_legend(ui);
        views::render_timeline(ui, &self.schedule.layout, self.config.ruler);

        ui.add_space(12.0);
        let mut discard = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.view.show_requirements {
                ui.label(RichText::new("Degree requirements").strong());
                views::render_requirements(ui, &self.requirements, &mut self.view);
                ui.add_space(12.0);
            }

            if self.schedule.has_schedule {
                ui.label(RichText::new("Sections").strong());
                discard = views::render_sections(ui, &self.schedule.layout, &mut self.view);
            }
        });

        if let Some(id) = discard {
            self.discard_section(id);
        }
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut save = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 10.0]).show(ui, |ui| {
                    ui.label("Backend URL");
                    ui.text_edit_singleline(&mut self.settings_url);
                    ui.end_row();

                    ui.label("Access token");
                    ui.add(egui::TextEdit::singleline(&mut self.settings_token)
                        .password(true)
                        .hint_text("leave blank to keep"));
                    ui.end_row();

                    ui.label("Semester");
                    ui.text_edit_singleline(&mut self.settings_semester);
                    ui.end_row();

                    ui.label("Ruler");
                    ui.horizontal(|ui| {
                        ui.radio_value(&mut self.settings_ruler, RulerRange::BusinessDay, "8am - 5pm");
                        ui.radio_value(&mut self.settings_ruler, RulerRange::FullDay, "Full day");
                    });
                    ui.end_row();
                });

                ui.add_space(8.0);
                if ui.button("Save").clicked() {
                    save = true;
                }
            });

        self.show_settings = open;
        if save {
            self.save_settings();
        }
    }

    fn render_preferences_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_preferences;
        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Time preferences")
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| match &mut self.preference_form {
                Some(form) => {
                    (save, cancel) = views::render_preferences(ui, form);
                }
                None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading your preferences...");
                    });
                }
            });

        self.show_preferences = open && !cancel;
        if save {
            self.save_preferences();
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    warn!("could not persist font scale: {:#}", e);
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();

        // Keep polling the channel while a request is in flight
        if self.schedule.loading || (self.show_preferences && self.preference_form.is_none()) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if self.show_settings {
            self.render_settings(ctx);
        }
        if self.show_preferences {
            self.render_preferences_window(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state {
            AppState::Setup => self.render_setup(ui),
            AppState::Main => self.render_main(ui),
        });
    }
}
