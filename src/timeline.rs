// Plan timeline: the 15-date window and per-day workout grouping
use crate::models::{TimeSlot, Workout};
use chrono::{Datelike, Days, NaiveDate};

/// Number of dates shown in the plan: two weeks plus the anchor day.
pub const WINDOW_DAYS: u64 = 15;

/// Return the Monday on or before `reference`.
///
/// Weeks always start on Monday, independent of the locale.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    let offset = u64::from(reference.weekday().num_days_from_monday());
    reference
        .checked_sub_days(Days::new(offset))
        .unwrap_or(reference)
}

/// Fixed range of consecutive dates rendered by the plan screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanWindow {
    start: NaiveDate,
}

impl PlanWindow {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Window anchored to the week containing `today`.
    pub fn for_today(today: NaiveDate) -> Self {
        Self::new(week_start(today))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Iterate the window's dates in order. Each call starts over.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Clone + '_ {
        (0..WINDOW_DAYS).filter_map(|i| self.start.checked_add_days(Days::new(i)))
    }

    /// The first seven dates, Monday through Sunday.
    pub fn first_week(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days().take(7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days().any(|d| d == date)
    }
}

/// Workouts scheduled on `date`, ordered morning, daytime, evening.
///
/// Workouts sharing a slot keep their catalog order.
pub fn workouts_on(workouts: &[Workout], date: NaiveDate) -> Vec<&Workout> {
    let mut matches: Vec<&Workout> = workouts.iter().filter(|w| w.date == date).collect();
    matches.sort_by_key(|w| w.time_slot.sort_order());
    matches
}

/// One rendered date section.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub workouts: Vec<&'a Workout>,
}

impl DayGroup<'_> {
    pub fn is_rest_day(&self) -> bool {
        self.workouts.is_empty()
    }
}

/// Group the catalog by every date of `window`, including rest days.
pub fn group_by_day<'a>(workouts: &'a [Workout], window: &PlanWindow) -> Vec<DayGroup<'a>> {
    window
        .days()
        .map(|date| DayGroup {
            date,
            workouts: workouts_on(workouts, date),
        })
        .collect()
}

/// Workouts of one day that fall in `slot`.
pub fn workouts_in_slot<'a>(day: &[&'a Workout], slot: TimeSlot) -> Vec<&'a Workout> {
    day.iter().copied().filter(|w| w.time_slot == slot).collect()
}

/// For each slot the first workout scheduled in it.
///
/// The catalog may hold several workouts for the same slot; only the first
/// one colours the week strip.
pub fn slot_indicators<'a>(day: &[&'a Workout]) -> [Option<&'a Workout>; 3] {
    TimeSlot::ALL.map(|slot| day.iter().copied().find(|w| w.time_slot == slot))
}

/// Heading for a date section relative to `today`.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%A, %b %-d").to_string(),
    }
}

/// First letter of the abbreviated weekday name.
pub fn day_letter(date: NaiveDate) -> String {
    date.format("%a").to_string().chars().take(1).collect()
}
