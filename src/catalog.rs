use std::path::{Path, PathBuf};

use crate::models::Workout;

/// Catalog shipped with the application.
pub const BUNDLED_CATALOG: &str = include_str!("../data/workouts.json");

/// Where the workout catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

impl CatalogSource {
    /// Build the source from the optional path stored in the settings.
    pub fn from_setting(path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.trim().is_empty() => CatalogSource::File(PathBuf::from(p)),
            _ => CatalogSource::Bundled,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Bundled => "bundled workouts.json".to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    NotFound(PathBuf),
    Io(std::io::Error),
    Decode(serde_json::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(path) => write!(f, "{} not found", path.display()),
            CatalogError::Io(e) => write!(f, "Could not read workouts: {e}"),
            CatalogError::Decode(e) => write!(f, "The workout data is malformed: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::NotFound(_) => None,
            CatalogError::Io(e) => Some(e),
            CatalogError::Decode(e) => Some(e),
        }
    }
}

/// Decode a full catalog. A single malformed record fails the whole load.
pub fn parse_catalog(json: &str) -> Result<Vec<Workout>, CatalogError> {
    serde_json::from_str(json).map_err(CatalogError::Decode)
}

fn read_catalog_file(path: &Path) -> Result<Vec<Workout>, CatalogError> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::NotFound(path.to_path_buf())
        } else {
            CatalogError::Io(e)
        }
    })?;
    parse_catalog(&data)
}

pub fn load_catalog(source: &CatalogSource) -> Result<Vec<Workout>, CatalogError> {
    match source {
        CatalogSource::Bundled => parse_catalog(BUNDLED_CATALOG),
        CatalogSource::File(path) => read_catalog_file(path),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Ready(Vec<Workout>),
    /// Human readable reason shown in the unavailable state.
    Failed(String),
}

/// Read-only workout catalog with its load status.
#[derive(Debug)]
pub struct WorkoutCatalog {
    source: CatalogSource,
    state: CatalogState,
}

impl WorkoutCatalog {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            state: CatalogState::Loading,
        }
    }

    /// (Re)load from the current source. Failures are kept, not retried.
    pub fn load(&mut self) {
        self.state = match load_catalog(&self.source) {
            Ok(workouts) => {
                log::info!(
                    "Loaded {} workouts from {}",
                    workouts.len(),
                    self.source.describe()
                );
                CatalogState::Ready(workouts)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", self.source.describe());
                CatalogState::Failed(e.to_string())
            }
        };
    }

    /// Switch to another source and load it.
    pub fn load_from(&mut self, source: CatalogSource) {
        self.source = source;
        self.load();
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CatalogState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CatalogState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Loaded workouts, empty while loading or after a failure.
    pub fn workouts(&self) -> &[Workout] {
        match &self.state {
            CatalogState::Ready(workouts) => workouts,
            _ => &[],
        }
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts().iter().find(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RUN_RECORD: &str = r#"{
        "id": "run-1",
        "date": "2025-10-28",
        "timeSlot": "morning",
        "title": "Easy Run",
        "category": {"type": "run", "subcategory": "base_z2"},
        "duration": 50,
        "completed": true,
        "exerciseRounds": [],
        "explanation": "Keep it conversational."
    }"#;

    fn catalog_json(records: &[&str]) -> String {
        format!("[{}]", records.join(","))
    }

    #[test]
    fn bundled_catalog_decodes() {
        let workouts = load_catalog(&CatalogSource::Bundled).expect("bundled catalog is valid");
        assert!(!workouts.is_empty());
        let mut ids: Vec<&str> = workouts.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), workouts.len(), "ids must be unique");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", catalog_json(&[RUN_RECORD])).unwrap();

        let mut catalog = WorkoutCatalog::new(CatalogSource::File(file.path().to_path_buf()));
        assert!(catalog.is_loading());
        catalog.load();

        assert!(!catalog.is_loading());
        assert_eq!(catalog.workouts().len(), 1);
        assert_eq!(catalog.find("run-1").map(|w| w.duration), Some(50));
        assert!(catalog.error().is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        let err = load_catalog(&CatalogSource::File(path.clone())).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref p) if *p == path));
        assert!(err.to_string().ends_with("workouts.json not found"));
    }

    #[test]
    fn one_bad_record_fails_the_whole_catalog() {
        let rowing = RUN_RECORD
            .replace("run-1", "run-2")
            .replace("\"run\"", "\"rowing\"");
        let err = parse_catalog(&catalog_json(&[RUN_RECORD, rowing.as_str()])).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert!(err.to_string().contains("Unknown category type: rowing"));
    }

    #[test]
    fn failed_load_exposes_message_and_no_workouts() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let mut catalog = WorkoutCatalog::new(CatalogSource::Bundled);
        catalog.load();
        assert!(!catalog.workouts().is_empty());

        catalog.load_from(CatalogSource::File(file.path().to_path_buf()));
        assert!(catalog.workouts().is_empty());
        let msg = catalog.error().expect("failure message");
        assert!(msg.starts_with("The workout data is malformed"));
    }

    #[test]
    fn source_from_setting() {
        assert_eq!(CatalogSource::from_setting(None), CatalogSource::Bundled);
        assert_eq!(CatalogSource::from_setting(Some("  ")), CatalogSource::Bundled);
        assert_eq!(
            CatalogSource::from_setting(Some("/tmp/plan.json")),
            CatalogSource::File(PathBuf::from("/tmp/plan.json"))
        );
    }
}
