use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::RwLock,
};

use crate::{
    db::MAX_SESSION_MINUTES, progression::StreakMode, statistics::MAX_ACTIVITY_DAYS,
};

pub const DATA_DIR_ENV: &str = "FOCUSQUEST_DATA_DIR";
pub const STREAK_MODE_ENV: &str = "FOCUSQUEST_STREAK_MODE";

const DEFAULT_DATA_DIR: &str = ".focusquest";
pub const DATABASE_FILE: &str = "focusquest.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub default_duration_minutes: u32,
    pub history_limit: usize,
    pub daily_activity_days: u32,
    pub streak_mode: StreakMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_duration_minutes: 25,
            history_limit: 10,
            daily_activity_days: 30,
            streak_mode: StreakMode::AnyNewDay,
        }
    }
}

impl AppSettings {
    fn sanitized(mut self) -> Self {
        if !(1..=MAX_SESSION_MINUTES).contains(&self.default_duration_minutes) {
            warn!("defaultDurationMinutes must be between 1 and {MAX_SESSION_MINUTES}; using 25");
            self.default_duration_minutes = Self::default().default_duration_minutes;
        }
        if self.daily_activity_days > MAX_ACTIVITY_DAYS {
            warn!("dailyActivityDays is capped at {MAX_ACTIVITY_DAYS}");
            self.daily_activity_days = MAX_ACTIVITY_DAYS;
        }
        self
    }

    /// `FOCUSQUEST_STREAK_MODE` takes precedence over the file.
    pub fn with_env_overrides(self) -> Self {
        let raw = std::env::var(STREAK_MODE_ENV).ok();
        self.with_streak_mode_override(raw.as_deref())
    }

    /// Unknown values are logged and leave the current mode in place.
    pub fn with_streak_mode_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match StreakMode::parse(raw.trim()) {
                Some(mode) => self.streak_mode = mode,
                None => warn!("Ignoring unknown {STREAK_MODE_ENV} value '{raw}'"),
            }
        }
        self
    }
}

/// Directory holding the database and settings file.
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields defaults; an
    /// unreadable one is an error; malformed JSON is logged and replaced by
    /// defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<AppSettings>(&contents) {
                Ok(settings) => settings.sanitized(),
                Err(err) => {
                    warn!(
                        "Invalid settings in {}: {err}; falling back to defaults",
                        path.display()
                    );
                    AppSettings::default()
                }
            }
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: AppSettings) -> Result<()> {
        let settings = settings.sanitized();
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let store = SettingsStore::new(path.clone()).unwrap();

        let settings = AppSettings {
            default_duration_minutes: 50,
            streak_mode: StreakMode::ConsecutiveDays,
            ..AppSettings::default()
        };
        store.update(settings.clone()).unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.get(), settings);
    }

    #[test]
    fn partial_and_invalid_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        fs::write(&path, r#"{ "historyLimit": 3, "defaultDurationMinutes": 0 }"#).unwrap();
        let settings = SettingsStore::new(path.clone()).unwrap().get();
        assert_eq!(settings.history_limit, 3);
        assert_eq!(settings.default_duration_minutes, 25);
        assert_eq!(settings.daily_activity_days, 30);

        fs::write(&path, r#"{ "dailyActivityDays": 4000000000 }"#).unwrap();
        let settings = SettingsStore::new(path.clone()).unwrap().get();
        assert_eq!(settings.daily_activity_days, MAX_ACTIVITY_DAYS);

        fs::write(&path, "not json").unwrap();
        let settings = SettingsStore::new(path).unwrap().get();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn streak_mode_override_accepts_both_spellings() {
        let base = AppSettings::default();
        assert_eq!(
            base.clone()
                .with_streak_mode_override(Some("consecutive-days"))
                .streak_mode,
            StreakMode::ConsecutiveDays
        );
        assert_eq!(
            base.clone()
                .with_streak_mode_override(Some(" consecutiveDays "))
                .streak_mode,
            StreakMode::ConsecutiveDays
        );
        assert_eq!(
            base.with_streak_mode_override(None).streak_mode,
            StreakMode::AnyNewDay
        );
    }

    #[test]
    fn unknown_streak_mode_keeps_current() {
        let settings = AppSettings {
            streak_mode: StreakMode::ConsecutiveDays,
            ..AppSettings::default()
        }
        .with_streak_mode_override(Some("weekly"));
        assert_eq!(settings.streak_mode, StreakMode::ConsecutiveDays);
    }

    // The only test that touches this variable.
    #[test]
    fn env_override_reads_streak_mode_variable() {
        std::env::set_var(STREAK_MODE_ENV, "consecutive-days");
        let overridden = AppSettings::default().with_env_overrides();
        std::env::set_var(STREAK_MODE_ENV, "not-a-mode");
        let ignored = AppSettings::default().with_env_overrides();
        std::env::remove_var(STREAK_MODE_ENV);
        let unset = AppSettings::default().with_env_overrides();

        assert_eq!(overridden.streak_mode, StreakMode::ConsecutiveDays);
        assert_eq!(ignored.streak_mode, StreakMode::AnyNewDay);
        assert_eq!(unset.streak_mode, StreakMode::AnyNewDay);
    }
}
