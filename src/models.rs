//! Workout catalog records as decoded from the bundled JSON document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single planned session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub title: String,
    pub category: Category,
    /// Minutes.
    pub duration: u32,
    pub completed: bool,
    pub exercise_rounds: Vec<ExerciseRound>,
    pub explanation: String,
}

impl Workout {
    /// Sum of the repeat counts of every round.
    pub fn total_rounds(&self) -> u32 {
        self.exercise_rounds.iter().map(|r| r.rounds).sum()
    }

    /// Number of exercises across all rounds.
    pub fn exercise_count(&self) -> usize {
        self.exercise_rounds.iter().map(|r| r.exercises.len()).sum()
    }

    /// Rounds ordered by their `order` key. Equal keys keep catalog order.
    pub fn sorted_rounds(&self) -> Vec<&ExerciseRound> {
        let mut rounds: Vec<&ExerciseRound> = self.exercise_rounds.iter().collect();
        rounds.sort_by_key(|r| r.order);
        rounds
    }

    /// Secondary line shown under the card title, e.g.
    /// `Volume Push • 3 rounds with 4 different exercises`.
    pub fn summary_line(&self) -> String {
        let rounds = self.total_rounds();
        let exercises = self.exercise_count();
        format!(
            "{} \u{2022} {} round{} with {} different exercise{}",
            self.category.subcategory_label(),
            rounds,
            if rounds == 1 { "" } else { "s" },
            exercises,
            if exercises == 1 { "" } else { "s" },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRound {
    pub id: String,
    pub order: i32,
    pub rounds: u32,
    /// Seconds.
    pub rest_between_rounds: u32,
    pub exercises: Vec<Exercise>,
    pub explanation: String,
}

impl ExerciseRound {
    pub fn sorted_exercises(&self) -> Vec<&Exercise> {
        let mut exercises: Vec<&Exercise> = self.exercises.iter().collect();
        exercises.sort_by_key(|e| e.order);
        exercises
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub volume: Volume,
    pub intensity: Intensity,
    /// Seconds.
    #[serde(default)]
    pub rest: Option<u32>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Daily bucket a workout is scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Daytime,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Daytime, TimeSlot::Evening];

    pub fn sort_order(self) -> u8 {
        match self {
            TimeSlot::Morning => 0,
            TimeSlot::Daytime => 1,
            TimeSlot::Evening => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Daytime => "Daytime",
            TimeSlot::Evening => "Evening",
        }
    }
}

macro_rules! subcategory {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $raw:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $raw),+
                }
            }

            pub fn from_raw(raw: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.as_str() == raw)
            }
        }
    };
}

subcategory!(
    /// Strength sessions.
    GymSubcategory {
        VolumePush => "volume_push",
        VolumePull => "volume_pull",
        VolumeLegs => "volume_legs",
        VolumeCore => "volume_core",
        VolumeFullBody => "volume_full_body",
        MaxStrengthPush => "max_strength_push",
        MaxStrengthPull => "max_strength_pull",
        MaxStrengthLegs => "max_strength_legs",
        MaxStrengthCore => "max_strength_core",
        MaxStrengthFullBody => "max_strength_full_body",
    }
);

subcategory!(
    /// Heart-rate zone focus shared by run, bike and swim sessions.
    EnduranceSubcategory {
        BaseZ2 => "base_z2",
        IntervalsZ4Z5 => "intervals_z4_z5",
    }
);

subcategory!(
    HiitSubcategory {
        Cardio => "cardio",
        StrengthCardio => "strength_cardio",
    }
);

/// Coarse category without its subcategory, used for labels and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Gym,
    Run,
    Bike,
    Swim,
    Hiit,
}

impl CategoryKind {
    pub fn label(self) -> &'static str {
        match self {
            CategoryKind::Gym => "Gym",
            CategoryKind::Run => "Run",
            CategoryKind::Bike => "Bike",
            CategoryKind::Swim => "Swim",
            CategoryKind::Hiit => "HIIT",
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            CategoryKind::Gym => "gym",
            CategoryKind::Run => "run",
            CategoryKind::Bike => "bike",
            CategoryKind::Swim => "swim",
            CategoryKind::Hiit => "hiit",
        }
    }
}

/// Workout category. On the wire this is `{"type": .., "subcategory": ..}`
/// and the subcategory must be valid for the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCategory", into = "RawCategory")]
pub enum Category {
    Gym(GymSubcategory),
    Run(EnduranceSubcategory),
    Bike(EnduranceSubcategory),
    Swim(EnduranceSubcategory),
    Hiit(HiitSubcategory),
}

#[derive(Serialize, Deserialize)]
struct RawCategory {
    #[serde(rename = "type")]
    kind: String,
    subcategory: String,
}

impl TryFrom<RawCategory> for Category {
    type Error = String;

    fn try_from(raw: RawCategory) -> Result<Self, Self::Error> {
        let invalid = || format!("Invalid {} subcategory: {}", raw.kind, raw.subcategory);
        let sub = raw.subcategory.as_str();
        match raw.kind.as_str() {
            "gym" => GymSubcategory::from_raw(sub).map(Category::Gym).ok_or_else(invalid),
            "run" => EnduranceSubcategory::from_raw(sub).map(Category::Run).ok_or_else(invalid),
            "bike" => EnduranceSubcategory::from_raw(sub).map(Category::Bike).ok_or_else(invalid),
            "swim" => EnduranceSubcategory::from_raw(sub).map(Category::Swim).ok_or_else(invalid),
            "hiit" => HiitSubcategory::from_raw(sub).map(Category::Hiit).ok_or_else(invalid),
            other => Err(format!("Unknown category type: {other}")),
        }
    }
}

impl From<Category> for RawCategory {
    fn from(category: Category) -> Self {
        RawCategory {
            kind: category.kind().wire_name().to_string(),
            subcategory: category.subcategory_raw().to_string(),
        }
    }
}

impl Category {
    pub fn kind(self) -> CategoryKind {
        match self {
            Category::Gym(_) => CategoryKind::Gym,
            Category::Run(_) => CategoryKind::Run,
            Category::Bike(_) => CategoryKind::Bike,
            Category::Swim(_) => CategoryKind::Swim,
            Category::Hiit(_) => CategoryKind::Hiit,
        }
    }

    pub fn subcategory_raw(self) -> &'static str {
        match self {
            Category::Gym(s) => s.as_str(),
            Category::Run(s) | Category::Bike(s) | Category::Swim(s) => s.as_str(),
            Category::Hiit(s) => s.as_str(),
        }
    }

    pub fn subcategory_label(self) -> String {
        format_subcategory(self.subcategory_raw())
    }

    /// `Gym • Volume Push`
    pub fn display(self) -> String {
        format!("{} \u{2022} {}", self.kind().label(), self.subcategory_label())
    }
}

/// Turn a raw subcategory such as `intervals_z4_z5` into `Intervals Z4 Z5`.
pub fn format_subcategory(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// How much work one exercise set asks for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Volume {
    Reps { repetitions: u32 },
    Duration { seconds: u32 },
    Distance { kilometers: f64 },
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Volume::Reps { repetitions } => write!(f, "{repetitions} reps"),
            Volume::Duration { seconds } if seconds < 60 => write!(f, "{seconds}s"),
            Volume::Duration { seconds } => {
                let (minutes, rest) = (seconds / 60, seconds % 60);
                if rest == 0 {
                    write!(f, "{minutes} min")
                } else {
                    write!(f, "{minutes}:{rest:02}")
                }
            }
            Volume::Distance { kilometers } => write!(f, "{kilometers:.1} km"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intensity {
    Weight {
        kilogramms: f64,
    },
    HeartRate {
        #[serde(rename = "targetBpm")]
        target_bpm: u32,
    },
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Intensity::Weight { kilogramms } if kilogramms == 0.0 => f.write_str("Bodyweight"),
            Intensity::Weight { kilogramms } => write!(f, "{kilogramms:.1} kg"),
            Intensity::HeartRate { target_bpm } => write!(f, "{target_bpm} BPM"),
        }
    }
}

/// Format a rest period: `45s`, `2 min` or `1:30 min`.
pub fn format_rest(seconds: u32) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let (minutes, rest) = (seconds / 60, seconds % 60);
    if rest == 0 {
        format!("{minutes} min")
    } else {
        format!("{minutes}:{rest:02} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "w-1",
            "date": "2025-10-27",
            "timeSlot": "evening",
            "title": "Volume Push",
            "category": {"type": "gym", "subcategory": "volume_push"},
            "duration": 45,
            "completed": false,
            "exerciseRounds": [
                {
                    "id": "r-2",
                    "order": 2,
                    "rounds": 1,
                    "restBetweenRounds": 0,
                    "exercises": [
                        {"id": "e-3", "name": "Plank", "order": 1,
                         "volume": {"type": "duration", "seconds": 60},
                         "intensity": {"type": "weight", "kilogramms": 0}}
                    ],
                    "explanation": "Finisher"
                },
                {
                    "id": "r-1",
                    "order": 1,
                    "rounds": 3,
                    "restBetweenRounds": 90,
                    "exercises": [
                        {"id": "e-2", "name": "Dips", "order": 2,
                         "volume": {"type": "reps", "repetitions": 12},
                         "intensity": {"type": "weight", "kilogramms": 10},
                         "rest": 30},
                        {"id": "e-1", "name": "Bench Press", "order": 1,
                         "volume": {"type": "reps", "repetitions": 8},
                         "intensity": {"type": "weight", "kilogramms": 60},
                         "rest": 30, "explanation": "Primary press"}
                    ],
                    "explanation": "Main block"
                }
            ],
            "explanation": "Start the week with pushing volume."
        }"#
    }

    #[test]
    fn decode_full_workout() {
        let w: Workout = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(w.date, NaiveDate::from_ymd_opt(2025, 10, 27).unwrap());
        assert_eq!(w.time_slot, TimeSlot::Evening);
        assert_eq!(w.category, Category::Gym(GymSubcategory::VolumePush));
        assert_eq!(w.total_rounds(), 4);
        assert_eq!(w.exercise_count(), 3);

        let rounds = w.sorted_rounds();
        assert_eq!(rounds[0].id, "r-1");
        let names: Vec<&str> = rounds[0].sorted_exercises().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bench Press", "Dips"]);
        assert_eq!(rounds[1].exercises[0].rest, None);
        assert_eq!(rounds[1].exercises[0].explanation, None);
    }

    #[test]
    fn summary_line_pluralizes() {
        let mut w: Workout = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            w.summary_line(),
            "Volume Push \u{2022} 4 rounds with 3 different exercises"
        );
        w.exercise_rounds.truncate(1);
        assert_eq!(
            w.summary_line(),
            "Volume Push \u{2022} 1 round with 1 different exercise"
        );
    }

    #[test]
    fn unknown_category_type_is_rejected() {
        let json = r#"{"type": "yoga", "subcategory": "flow"}"#;
        let err = serde_json::from_str::<Category>(json).unwrap_err();
        assert!(err.to_string().contains("Unknown category type: yoga"));
    }

    #[test]
    fn subcategory_must_match_type() {
        let json = r#"{"type": "run", "subcategory": "volume_push"}"#;
        let err = serde_json::from_str::<Category>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid run subcategory: volume_push"));
    }

    #[test]
    fn endurance_categories_share_subcategories() {
        let swim: Category =
            serde_json::from_str(r#"{"type": "swim", "subcategory": "intervals_z4_z5"}"#).unwrap();
        assert_eq!(swim, Category::Swim(EnduranceSubcategory::IntervalsZ4Z5));
        assert_eq!(swim.display(), "Swim \u{2022} Intervals Z4 Z5");

        let json = serde_json::to_value(swim).unwrap();
        assert_eq!(json["type"], "swim");
        assert_eq!(json["subcategory"], "intervals_z4_z5");
    }

    #[test]
    fn unknown_volume_and_intensity_tags_fail() {
        assert!(serde_json::from_str::<Volume>(r#"{"type": "laps", "count": 4}"#).is_err());
        assert!(serde_json::from_str::<Intensity>(r#"{"type": "rpe", "value": 8}"#).is_err());
    }

    #[test]
    fn heart_rate_intensity_decodes_camel_case_bpm() {
        let i: Intensity =
            serde_json::from_str(r#"{"type": "heart_rate", "targetBpm": 145}"#).unwrap();
        assert_eq!(i, Intensity::HeartRate { target_bpm: 145 });
        assert_eq!(i.to_string(), "145 BPM");
    }

    #[test]
    fn volume_display() {
        assert_eq!(Volume::Reps { repetitions: 8 }.to_string(), "8 reps");
        assert_eq!(Volume::Duration { seconds: 45 }.to_string(), "45s");
        assert_eq!(Volume::Duration { seconds: 120 }.to_string(), "2 min");
        assert_eq!(Volume::Duration { seconds: 90 }.to_string(), "1:30");
        assert_eq!(Volume::Distance { kilometers: 5.0 }.to_string(), "5.0 km");
    }

    #[test]
    fn intensity_display() {
        assert_eq!(Intensity::Weight { kilogramms: 0.0 }.to_string(), "Bodyweight");
        assert_eq!(Intensity::Weight { kilogramms: 62.5 }.to_string(), "62.5 kg");
    }

    #[test]
    fn rest_formatting() {
        assert_eq!(format_rest(30), "30s");
        assert_eq!(format_rest(60), "1 min");
        assert_eq!(format_rest(90), "1:30 min");
        assert_eq!(format_rest(605), "10:05 min");
    }

    #[test]
    fn subcategory_formatting() {
        assert_eq!(format_subcategory("max_strength_full_body"), "Max Strength Full Body");
        assert_eq!(format_subcategory("base_z2"), "Base Z2");
        assert_eq!(format_subcategory("cardio"), "Cardio");
    }

    #[test]
    fn slot_order_is_morning_daytime_evening() {
        let mut slots = vec![TimeSlot::Evening, TimeSlot::Morning, TimeSlot::Daytime];
        slots.sort_by_key(|s| s.sort_order());
        assert_eq!(slots, TimeSlot::ALL.to_vec());
    }
}
