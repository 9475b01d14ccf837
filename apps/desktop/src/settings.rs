use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use timeline_core::TimelineSettings;
use tracing::{info, warn};

/// `<config dir>/timeline-editor/timeline.json`
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("timeline-editor").join("timeline.json"))
}

/// Loads the user's timeline settings, falling back to defaults when the file
/// is missing or unusable.
pub fn load_settings() -> TimelineSettings {
    let Some(path) = settings_path() else {
        return TimelineSettings::default();
    };
    if !path.exists() {
        return TimelineSettings::default();
    }
    match read_settings(&path) {
        Ok(settings) => {
            info!(path = %path.display(), "loaded timeline settings");
            settings
        }
        Err(err) => {
            warn!(path = %path.display(), "using default timeline settings: {err:#}");
            TimelineSettings::default()
        }
    }
}

pub fn read_settings(path: &Path) -> Result<TimelineSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    TimelineSettings::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "timeline-editor-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = scratch_file("partial", r#"{ "track_height": 64 }"#);
        let settings = read_settings(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.track_height, 64.0);
        assert_eq!(settings.ruler_height, TimelineSettings::default().ruler_height);
    }

    #[test]
    fn invalid_values_are_reported_with_path() {
        let path = scratch_file("invalid", r#"{ "track_height": -1 }"#);
        let err = read_settings(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("track_height"));
        assert!(err.to_string().contains("parsing"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("timeline-editor-does-not-exist.json");
        assert!(read_settings(&path).is_err());
    }
}
