//! Views of the training plan: week strip, date sections, cards and the
//! workout detail screen.

use chrono::NaiveDate;
use eframe::egui::{self, Align2, Color32, FontId, RichText, Rounding, Sense, Stroke, Vec2};
use std::collections::HashSet;

use crate::models::{CategoryKind, Exercise, TimeSlot, Workout, format_rest};
use crate::timeline::{DayGroup, day_label, day_letter, slot_indicators, workouts_in_slot};

const SLOT_BAND_OPACITY: f32 = 0.65;
const INDICATOR_SIZE: Vec2 = Vec2::new(38.0, 64.0);
const LETTER_RADIUS: f32 = 14.0;

pub fn category_color(kind: CategoryKind) -> Color32 {
    match kind {
        CategoryKind::Gym => Color32::from_rgb(255, 148, 0),
        CategoryKind::Run => Color32::from_rgb(0, 122, 255),
        CategoryKind::Bike => Color32::from_rgb(176, 82, 222),
        CategoryKind::Swim => Color32::from_rgb(0, 199, 217),
        CategoryKind::Hiit => Color32::from_rgb(255, 59, 48),
    }
}

/// Seven day buttons for the current week. Returns the tapped date.
pub fn week_strip(
    ui: &mut egui::Ui,
    week: &[DayGroup<'_>],
    selected: NaiveDate,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let mut tapped = None;
    let spacing = ui.spacing().item_spacing.x;
    let count = week.len().max(1) as f32;
    let width = ((ui.available_width() - spacing * (count - 1.0)) / count).max(INDICATOR_SIZE.x);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        for day in week {
            if day_button(ui, day, width, day.date == selected, day.date == today).clicked() {
                tapped = Some(day.date);
            }
        }
    });
    ui.add_space(8.0);
    tapped
}

fn day_button(
    ui: &mut egui::Ui,
    day: &DayGroup<'_>,
    width: f32,
    is_selected: bool,
    is_today: bool,
) -> egui::Response {
    let height = LETTER_RADIUS * 2.0 + 8.0 + INDICATOR_SIZE.y;
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, height), Sense::click());
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let visuals = ui.visuals();
    let accent = visuals.selection.bg_fill;
    let text = visuals.text_color();
    let painter = ui.painter();

    let letter_center = egui::pos2(rect.center().x, rect.top() + LETTER_RADIUS);
    let (circle, letter_color) = if is_selected {
        (accent, Color32::WHITE)
    } else if is_today {
        (accent.gamma_multiply(0.2), accent)
    } else {
        (Color32::TRANSPARENT, text)
    };
    painter.circle_filled(letter_center, LETTER_RADIUS, circle);
    painter.text(
        letter_center,
        Align2::CENTER_CENTER,
        day_letter(day.date),
        FontId::proportional(14.0),
        letter_color,
    );

    let box_rect = egui::Rect::from_center_size(
        egui::pos2(rect.center().x, rect.top() + LETTER_RADIUS * 2.0 + 8.0 + INDICATOR_SIZE.y / 2.0),
        INDICATOR_SIZE,
    );
    let rounding = Rounding::same(8.0);
    painter.rect_filled(box_rect, rounding, visuals.faint_bg_color);

    if day.is_rest_day() {
        painter.text(
            box_rect.center(),
            Align2::CENTER_CENTER,
            "\u{1F4A4}",
            FontId::proportional(16.0),
            visuals.weak_text_color(),
        );
    } else {
        let band_height = box_rect.height() / TimeSlot::ALL.len() as f32;
        for (i, slot) in slot_indicators(&day.workouts).iter().enumerate() {
            let Some(workout) = slot else { continue };
            let band = egui::Rect::from_min_size(
                egui::pos2(box_rect.left(), box_rect.top() + band_height * i as f32),
                Vec2::new(box_rect.width(), band_height),
            )
            .shrink(1.5);
            let color = category_color(workout.category.kind()).gamma_multiply(SLOT_BAND_OPACITY);
            painter.rect_filled(band, Rounding::same(6.0), color);
        }
    }

    if is_today {
        painter.rect_stroke(box_rect, rounding, Stroke::new(2.0, accent));
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

/// One day of the plan list. Returns the id of a clicked workout card.
pub fn date_section(ui: &mut egui::Ui, day: &DayGroup<'_>, today: NaiveDate) -> Option<String> {
    ui.label(RichText::new(day_label(day.date, today)).size(20.0).strong());
    ui.add_space(6.0);

    if day.is_rest_day() {
        rest_day_card(ui);
        return None;
    }

    let mut clicked = None;
    for slot in TimeSlot::ALL {
        let workouts = workouts_in_slot(&day.workouts, slot);
        if workouts.is_empty() {
            continue;
        }
        ui.label(
            RichText::new(slot.display_name().to_uppercase())
                .small()
                .color(ui.visuals().weak_text_color()),
        );
        for workout in workouts {
            if workout_card(ui, workout).clicked() {
                clicked = Some(workout.id.clone());
            }
            ui.add_space(4.0);
        }
    }
    clicked
}

fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::group(ui.style())
        .rounding(12.0)
        .inner_margin(14.0)
        .fill(ui.visuals().faint_bg_color)
}

pub fn workout_card(ui: &mut egui::Ui, workout: &Workout) -> egui::Response {
    let frame = card_frame(ui).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(&workout.title).size(16.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if workout.completed {
                    ui.label(RichText::new("\u{2714}").color(Color32::from_rgb(52, 199, 89)));
                }
                category_badge(ui, workout.category.kind());
                ui.label(format!("{} min", workout.duration));
            });
        });
        ui.label(
            RichText::new(workout.summary_line()).color(ui.visuals().weak_text_color()),
        );
    });
    ui.interact(
        frame.response.rect,
        ui.id().with(("workout_card", &workout.id)),
        Sense::click(),
    )
    .on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn category_badge(ui: &mut egui::Ui, kind: CategoryKind) {
    let color = category_color(kind);
    egui::Frame::none()
        .fill(color.gamma_multiply(0.15))
        .rounding(6.0)
        .inner_margin(egui::Margin::symmetric(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(kind.label()).small().strong().color(color));
        });
}

pub fn rest_day_card(ui: &mut egui::Ui) {
    card_frame(ui).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new("\u{1F4A4}").size(22.0));
            ui.vertical(|ui| {
                ui.label(RichText::new("Rest Day").strong());
                ui.label(
                    RichText::new("Recovery is part of the plan")
                        .color(ui.visuals().weak_text_color()),
                );
            });
        });
    });
}

/// Full workout screen. `expanded` holds the ids of exercises whose
/// explanation is open.
pub fn workout_detail(ui: &mut egui::Ui, workout: &Workout, expanded: &mut HashSet<String>) {
    egui::ScrollArea::vertical()
        .id_source(("workout_detail", &workout.id))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.heading(RichText::new(&workout.title).strong());
            ui.horizontal(|ui| {
                ui.label(format!("{} min", workout.duration));
                ui.label("\u{2022}");
                ui.label(
                    RichText::new(workout.category.display())
                        .color(category_color(workout.category.kind())),
                );
                if workout.completed {
                    egui::Frame::none()
                        .fill(Color32::from_rgb(52, 199, 89).gamma_multiply(0.15))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(6.0, 2.0))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new("\u{2714} Completed")
                                    .small()
                                    .color(Color32::from_rgb(52, 199, 89)),
                            );
                        });
                }
            });
            ui.add_space(12.0);

            card_frame(ui).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("Workout Overview").strong());
                ui.label(&workout.explanation);
            });

            for (index, round) in workout.sorted_rounds().into_iter().enumerate() {
                ui.add_space(16.0);
                ui.push_id(&round.id, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("Round {}", index + 1)).size(17.0).strong());
                        if round.rounds > 1 {
                            ui.label(
                                RichText::new(format!("{} rounds", round.rounds))
                                    .color(ui.visuals().weak_text_color()),
                            );
                        }
                    });
                    if round.rest_between_rounds > 0 {
                        ui.label(
                            RichText::new(format!(
                                "Rest: {} between rounds",
                                format_rest(round.rest_between_rounds)
                            ))
                            .small()
                            .color(ui.visuals().weak_text_color()),
                        );
                    }
                    if !round.explanation.is_empty() {
                        ui.label(&round.explanation);
                    }
                    exercise_table(ui, &round.sorted_exercises(), expanded);
                });
            }
        });
}

fn exercise_table(
    ui: &mut egui::Ui,
    exercises: &[&Exercise],
    expanded: &mut HashSet<String>,
) {
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
    egui_extras::TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(egui_extras::Column::remainder().at_least(120.0))
        .column(egui_extras::Column::auto())
        .column(egui_extras::Column::auto())
        .column(egui_extras::Column::auto())
        .column(egui_extras::Column::exact(24.0))
        .header(row_height, |mut header| {
            for title in ["Exercise", "Volume", "Intensity", "Rest"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            header.col(|_| {});
        })
        .body(|mut body| {
            for exercise in exercises {
                body.row(row_height, |mut row| {
                    row.col(|ui| {
                        ui.label(&exercise.name);
                    });
                    row.col(|ui| {
                        ui.label(exercise.volume.to_string());
                    });
                    row.col(|ui| {
                        ui.label(exercise.intensity.to_string());
                    });
                    row.col(|ui| {
                        ui.label(exercise.rest.map(format_rest).unwrap_or_default());
                    });
                    row.col(|ui| {
                        if exercise.explanation.is_some() {
                            let open = expanded.contains(&exercise.id);
                            if ui.selectable_label(open, "\u{2139}").clicked() {
                                toggle_explanation(expanded, &exercise.id);
                            }
                        }
                    });
                });
            }
        });

    for exercise in exercises {
        let Some(text) = exercise.explanation.as_deref() else {
            continue;
        };
        if expanded.contains(&exercise.id) {
            ui.label(RichText::new(&exercise.name).small().strong());
            ui.label(RichText::new(text).small());
        }
    }
}

/// Flip the explanation of one exercise open or closed.
pub fn toggle_explanation(expanded: &mut HashSet<String>, exercise_id: &str) {
    if !expanded.remove(exercise_id) {
        expanded.insert(exercise_id.to_string());
    }
}

/// Centered message used for the unavailable state and the stub tabs.
pub fn placeholder(ui: &mut egui::Ui, icon: &str, title: &str, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.label(RichText::new(icon).size(40.0));
        ui.label(RichText::new(title).size(18.0).strong());
        ui.label(RichText::new(message).color(ui.visuals().weak_text_color()));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSource, load_catalog};
    use crate::timeline::{PlanWindow, group_by_day};

    fn screen() -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                Vec2::new(420.0, 900.0),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn category_colors_are_distinct() {
        let kinds = [
            CategoryKind::Gym,
            CategoryKind::Run,
            CategoryKind::Bike,
            CategoryKind::Swim,
            CategoryKind::Hiit,
        ];
        let colors: HashSet<_> = kinds.iter().map(|k| category_color(*k).to_array()).collect();
        assert_eq!(colors.len(), kinds.len());
        assert_eq!(category_color(CategoryKind::Run), Color32::from_rgb(0, 122, 255));
    }

    #[test]
    fn toggling_explanations() {
        let mut expanded = HashSet::new();
        toggle_explanation(&mut expanded, "ex-1");
        assert!(expanded.contains("ex-1"));
        toggle_explanation(&mut expanded, "ex-2");
        toggle_explanation(&mut expanded, "ex-1");
        assert!(!expanded.contains("ex-1"));
        assert!(expanded.contains("ex-2"));
    }

    #[test]
    fn plan_views_render_without_interaction() {
        let workouts = load_catalog(&CatalogSource::Bundled).unwrap();
        let start = workouts.iter().map(|w| w.date).min().unwrap();
        let window = PlanWindow::for_today(start);
        let groups = group_by_day(&workouts, &window);
        let ctx = egui::Context::default();
        let mut expanded = HashSet::new();

        let _ = ctx.run(screen(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let tapped = week_strip(ui, &groups[..7], window.start(), start);
                assert_eq!(tapped, None);
                for group in &groups {
                    assert_eq!(date_section(ui, group, start), None);
                }
                workout_detail(ui, &workouts[0], &mut expanded);
            });
        });
        assert!(expanded.is_empty());
    }
}
