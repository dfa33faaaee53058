//! Training plan viewer and persistent user settings.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui_extras::DatePickerButton;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::info;

mod animation;
use animation::{ScrollAnimator, ScrollViewport};
mod catalog;
use catalog::{CatalogSource, CatalogState, WorkoutCatalog};
mod chat;
use chat::ChatState;
mod geometry;
use geometry::{SectionSpan, SpanRegistry};
mod models;
mod scroll_sync;
use scroll_sync::{SettleMode, SyncConfig, VisibleDateSynchronizer};
mod timeline;
use timeline::{PlanWindow, group_by_day};
mod widgets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
enum Tab {
    #[default]
    Training,
    Results,
    Profile,
    Settings,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Training, Tab::Results, Tab::Profile, Tab::Settings];

    fn label(self) -> &'static str {
        match self {
            Tab::Training => "\u{1F4C5} Training",
            Tab::Results => "\u{1F4C8} Results",
            Tab::Profile => "\u{1F464} Profile",
            Tab::Settings => "\u{2699} Settings",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Training => "Training Plan",
            Tab::Results => "Results",
            Tab::Profile => "Profile",
            Tab::Settings => "Settings",
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    scroll_sync::SETTLE_DELAY.as_millis() as u64
}

fn default_scroll_animation_ms() -> u64 {
    animation::DEFAULT_SCROLL_DURATION.as_millis() as u64
}

fn default_header_buffer() -> f32 {
    scroll_sync::HEADER_VISIBILITY_BUFFER
}

fn default_header_height() -> f32 {
    scroll_sync::DEFAULT_HEADER_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    /// Catalog file to read instead of the bundled one.
    #[serde(default)]
    catalog_path: Option<String>,
    /// Overrides "today" when previewing a plan.
    #[serde(default)]
    reference_date: Option<NaiveDate>,
    #[serde(default)]
    settle_mode: SettleMode,
    #[serde(default = "default_settle_delay_ms")]
    settle_delay_ms: u64,
    #[serde(default = "default_scroll_animation_ms")]
    scroll_animation_ms: u64,
    #[serde(default = "default_header_buffer")]
    header_buffer: f32,
    #[serde(default = "default_header_height")]
    default_header_height: f32,
    #[serde(default)]
    last_tab: Tab,
}

impl Settings {
    const FILE: &'static str = "noma_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file. Missing fields take
    /// their defaults; an unreadable file yields [`Settings::default`].
    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring malformed {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|data| std::fs::write(&path, data));
        if let Err(e) = result {
            log::error!("Failed to save settings to {}: {e}", path.display());
        }
    }

    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            settle_mode: self.settle_mode,
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            header_buffer: self.header_buffer,
            default_header_height: self.default_header_height,
        }
    }

    fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_animation_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            reference_date: None,
            settle_mode: SettleMode::default(),
            settle_delay_ms: default_settle_delay_ms(),
            scroll_animation_ms: default_scroll_animation_ms(),
            header_buffer: default_header_buffer(),
            default_header_height: default_header_height(),
            last_tab: Tab::default(),
        }
    }
}

struct PlanApp {
    settings: Settings,
    settings_dirty: bool,
    catalog: WorkoutCatalog,
    tab: Tab,
    today: NaiveDate,
    window: PlanWindow,
    registry: SpanRegistry,
    sync: VisibleDateSynchronizer,
    animator: ScrollAnimator,
    viewport: ScrollViewport,
    open_workout: Option<String>,
    expanded_exercises: HashSet<String>,
    chat: ChatState,
}

impl Default for PlanApp {
    fn default() -> Self {
        Self::with_settings(Settings::load())
    }
}

impl PlanApp {
    fn with_settings(settings: Settings) -> Self {
        let today = settings
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let mut catalog =
            WorkoutCatalog::new(CatalogSource::from_setting(settings.catalog_path.as_deref()));
        catalog.load();

        Self {
            tab: settings.last_tab,
            sync: VisibleDateSynchronizer::new(today, settings.sync_config()),
            animator: ScrollAnimator::new(settings.scroll_duration()),
            settings,
            settings_dirty: false,
            catalog,
            today,
            window: PlanWindow::for_today(today),
            registry: SpanRegistry::new(),
            viewport: ScrollViewport {
                offset: 0.0,
                max_offset: 0.0,
                container_height: 0.0,
            },
            open_workout: None,
            expanded_exercises: HashSet::new(),
            chat: ChatState::default(),
        }
    }

    fn current_day(&self) -> NaiveDate {
        self.settings
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Follow the calendar (or the reference date) into a new plan window.
    fn refresh_window(&mut self) {
        let today = self.current_day();
        if today == self.today {
            return;
        }
        info!("Plan day changed from {} to {today}", self.today);
        self.today = today;
        self.window = PlanWindow::for_today(today);
        self.registry.retain_window(&self.window);
        self.animator.cancel();
        self.sync.reset(today);
    }

    fn apply_settings(&mut self) {
        self.sync.set_config(self.settings.sync_config());
        self.animator.set_duration(self.settings.scroll_duration());
        self.settings_dirty = true;
    }

    fn reload_catalog(&mut self) {
        self.catalog
            .load_from(CatalogSource::from_setting(self.settings.catalog_path.as_deref()));
        self.registry.clear();
        self.animator.cancel();
        self.sync.reset(self.today);
        self.open_workout = None;
        self.expanded_exercises.clear();
    }

    fn ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.refresh_window();
        self.sync.tick(now);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.heading(self.tab.title());
                if self.tab == Tab::Training {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        chat::assistant_menu(ui, &mut self.chat);
                    });
                }
            });
        });

        egui::TopBottomPanel::bottom("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui.selectable_value(&mut self.tab, tab, tab.label()).changed() {
                        self.settings.last_tab = tab;
                        self.settings_dirty = true;
                    }
                }
            });
        });

        if self.chat.active {
            egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
                chat::chat_input(ui, &mut self.chat);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Training => self.show_training(ui, now),
            Tab::Results => widgets::placeholder(
                ui,
                "\u{1F4C8}",
                "Results",
                "Completed sessions and trends will appear here.",
            ),
            Tab::Profile => widgets::placeholder(
                ui,
                "\u{1F464}",
                "Profile",
                "Athlete details and preferences will appear here.",
            ),
            Tab::Settings => self.show_settings(ui),
        });

        if self.animator.is_animating() {
            ctx.request_repaint();
        } else if let Some(wait) = self.sync.time_until_settle(now) {
            ctx.request_repaint_after(wait);
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn show_training(&mut self, ui: &mut egui::Ui, now: Instant) {
        if self.catalog.is_loading() {
            ui.centered_and_justified(|ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading workouts...");
                });
            });
            return;
        }
        if let Some(message) = self.catalog.error() {
            widgets::placeholder(ui, "\u{26A0}", "Unable to Load Workouts", message);
            return;
        }

        if let Some(id) = self.open_workout.clone() {
            if ui.button("\u{2B05} Training Plan").clicked() {
                self.open_workout = None;
                return;
            }
            match self.catalog.find(&id) {
                Some(workout) => {
                    widgets::workout_detail(ui, workout, &mut self.expanded_exercises)
                }
                None => self.open_workout = None,
            }
            return;
        }

        self.show_plan(ui, now);
    }

    /// Week strip on top of the scrolling list of date sections. Spans are
    /// reported relative to the top of this area, i.e. the header top.
    fn show_plan(&mut self, ui: &mut egui::Ui, now: Instant) {
        let panel_top = ui.max_rect().top();
        let container_height = ui.available_height();
        let groups = group_by_day(self.catalog.workouts(), &self.window);
        let week = &groups[..groups.len().min(self.window.first_week().count())];

        let header = ui.vertical(|ui| {
            widgets::week_strip(ui, week, self.sync.selected_date(), self.today)
        });
        self.registry.report_header(header.response.rect.height());
        let tapped = header.inner;

        let mut scroll = egui::ScrollArea::vertical()
            .id_source("plan_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = self.animator.offset_for_frame(&self.registry, &self.viewport, now) {
            scroll = scroll.vertical_scroll_offset(offset);
        }

        let mut opened = None;
        let output = scroll.show(ui, |ui| {
            for group in &groups {
                let section = egui::Frame::none()
                    .inner_margin(egui::Margin::symmetric(4.0, 12.0))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        widgets::date_section(ui, group, self.today)
                    });
                let rect = section.response.rect;
                self.registry.report_section(
                    group.date,
                    SectionSpan::new(rect.top() - panel_top, rect.bottom() - panel_top),
                );
                if let Some(id) = section.inner {
                    opened = Some(id);
                }
            }
        });

        self.viewport = ScrollViewport {
            offset: output.state.offset.y,
            max_offset: (output.content_size.y - output.inner_rect.height()).max(0.0),
            container_height,
        };

        self.registry.flush(&mut self.sync);

        if let Some(date) = tapped {
            self.sync
                .select_date(date, &self.window, container_height, &mut self.animator, now);
        }
        for ticket in self.animator.take_finished() {
            self.sync.scroll_finished(ticket);
        }

        if let Some(id) = opened {
            self.expanded_exercises.clear();
            self.open_workout = Some(id);
        }
    }

    fn show_settings(&mut self, ui: &mut egui::Ui) {
        let mut reload = false;
        let mut changed = false;

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::CollapsingHeader::new("Workout catalog")
                .default_open(true)
                .show(ui, |ui| {
                    ui.label(format!("Source: {}", self.catalog.source().describe()));
                    match self.catalog.state() {
                        CatalogState::Loading => ui.spinner(),
                        CatalogState::Ready(workouts) => {
                            ui.label(format!("{} workouts loaded", workouts.len()))
                        }
                        CatalogState::Failed(message) => {
                            ui.colored_label(ui.visuals().error_fg_color, message)
                        }
                    };
                    ui.horizontal(|ui| {
                        if ui.button("Open catalog\u{2026}").clicked() {
                            if let Some(path) =
                                FileDialog::new().add_filter("JSON", &["json"]).pick_file()
                            {
                                self.settings.catalog_path = Some(path.display().to_string());
                                changed = true;
                                reload = true;
                            }
                        }
                        if self.settings.catalog_path.is_some() && ui.button("Use bundled").clicked()
                        {
                            self.settings.catalog_path = None;
                            changed = true;
                            reload = true;
                        }
                        if ui.button("Reload").clicked() {
                            reload = true;
                        }
                    });
                });

            egui::CollapsingHeader::new("Plan")
                .default_open(true)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let mut fixed = self.settings.reference_date.is_some();
                        if ui.checkbox(&mut fixed, "Preview from date").changed() {
                            self.settings.reference_date = fixed.then_some(self.today);
                            changed = true;
                        }
                        if let Some(mut date) = self.settings.reference_date {
                            if ui
                                .add(DatePickerButton::new(&mut date).id_source("reference_date"))
                                .changed()
                            {
                                self.settings.reference_date = Some(date);
                                changed = true;
                            }
                        }
                    });
                });

            egui::CollapsingHeader::new("Scrolling")
                .default_open(true)
                .show(ui, |ui| {
                    egui::Grid::new("scrolling_grid")
                        .num_columns(2)
                        .show(ui, |ui| {
                            ui.label("Selection settles");
                            ui.horizontal(|ui| {
                                changed |= ui
                                    .radio_value(
                                        &mut self.settings.settle_mode,
                                        SettleMode::Delay,
                                        "After delay",
                                    )
                                    .changed();
                                changed |= ui
                                    .radio_value(
                                        &mut self.settings.settle_mode,
                                        SettleMode::AnimationComplete,
                                        "When scroll ends",
                                    )
                                    .changed();
                            });
                            ui.end_row();

                            ui.label("Settle delay");
                            changed |= ui
                                .add_enabled(
                                    self.settings.settle_mode == SettleMode::Delay,
                                    egui::DragValue::new(&mut self.settings.settle_delay_ms)
                                        .clamp_range(0..=2000)
                                        .suffix(" ms"),
                                )
                                .changed();
                            ui.end_row();

                            ui.label("Scroll animation");
                            changed |= ui
                                .add(
                                    egui::DragValue::new(&mut self.settings.scroll_animation_ms)
                                        .clamp_range(0..=2000)
                                        .suffix(" ms"),
                                )
                                .changed();
                            ui.end_row();

                            ui.label("Header buffer");
                            changed |= ui
                                .add(
                                    egui::DragValue::new(&mut self.settings.header_buffer)
                                        .clamp_range(0.0..=200.0)
                                        .suffix(" px"),
                                )
                                .changed();
                            ui.end_row();

                            ui.label("Measured header height");
                            ui.label(format!("{:.0} px", self.sync.effective_header_height()));
                            ui.end_row();

                            ui.label("Assumed header height");
                            changed |= ui
                                .add(
                                    egui::DragValue::new(&mut self.settings.default_header_height)
                                        .clamp_range(1.0..=400.0)
                                        .suffix(" px"),
                                )
                                .changed();
                            ui.end_row();
                        });
                    if ui.button("Restore defaults").clicked() {
                        let defaults = Settings::default();
                        self.settings.settle_mode = defaults.settle_mode;
                        self.settings.settle_delay_ms = defaults.settle_delay_ms;
                        self.settings.scroll_animation_ms = defaults.scroll_animation_ms;
                        self.settings.header_buffer = defaults.header_buffer;
                        self.settings.default_header_height = defaults.default_header_height;
                        changed = true;
                    }
                });
        });

        if changed {
            self.apply_settings();
        }
        if reload {
            self.reload_catalog();
        }
    }
}

impl App for PlanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.last_tab = self.tab;
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([430.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Noma Training Plan",
        options,
        Box::new(|_cc| Box::new(PlanApp::default())),
    )
}
