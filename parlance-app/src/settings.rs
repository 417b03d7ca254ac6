//! Persistent host settings (JSON file in the app data directory).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parlance_core::{AuditPolicy, NumberConfig, PhoneRegion, Speaker, DEFAULT_PERSONA};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    pub default_persona: String,
    pub default_currency: String,
    pub spell_codes: bool,
    pub phone_region: String,
    /// Relative `--out` paths are resolved against this directory.
    pub output_dir: String,
    /// `jsonl`, `sqlite` or `none`.
    pub audit_backend: String,
    /// Overrides the backend's default file under the data directory.
    pub audit_path: Option<String>,
    pub audit_policy: AuditPolicy,
    pub retention_days: usize,
    pub synthetic_sample_rate: u32,
    pub synthetic_duration_secs: f64,
    pub extra_abbreviations: BTreeMap<String, String>,
    pub extra_personas: Vec<Speaker>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_persona: DEFAULT_PERSONA.into(),
            default_currency: "AUD".into(),
            spell_codes: true,
            phone_region: "AU".into(),
            output_dir: "outputs".into(),
            audit_backend: "jsonl".into(),
            audit_path: None,
            audit_policy: AuditPolicy::Propagate,
            retention_days: 90,
            synthetic_sample_rate: 22_050,
            synthetic_duration_secs: 1.0,
            extra_abbreviations: BTreeMap::new(),
            extra_personas: Vec::new(),
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        let persona = self.default_persona.trim();
        self.default_persona = if persona.is_empty() {
            DEFAULT_PERSONA.into()
        } else {
            persona.to_string()
        };
        self.default_currency = normalize_currency(&self.default_currency);
        self.phone_region = normalize_phone_region(&self.phone_region);
        self.audit_backend = normalize_audit_backend(&self.audit_backend);
        self.audit_path = self
            .audit_path
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if self.output_dir.trim().is_empty() {
            self.output_dir = "outputs".into();
        }
        self.retention_days = self.retention_days.clamp(1, 3650);
        self.synthetic_sample_rate = self.synthetic_sample_rate.clamp(8_000, 48_000);
        self.synthetic_duration_secs = if self.synthetic_duration_secs.is_finite() {
            self.synthetic_duration_secs.clamp(0.0, 60.0)
        } else {
            1.0
        };
        self.extra_abbreviations
            .retain(|short, _| !short.trim().is_empty());
        self.extra_personas
            .retain(|s| !s.persona.trim().is_empty() && !s.voice_handle.trim().is_empty());
    }

    pub fn number_config(&self) -> NumberConfig {
        NumberConfig {
            default_currency: self.default_currency.clone(),
            spell_codes: self.spell_codes,
            phone_region: self.phone_region.parse().unwrap_or_default(),
        }
    }

    /// Explicit `audit_path`, else the backend's file in the data directory.
    pub fn resolved_audit_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.audit_path {
            return Some(PathBuf::from(path));
        }
        match self.audit_backend.as_str() {
            "jsonl" => Some(data_dir().join("audit.jsonl")),
            "sqlite" => Some(data_dir().join("parlance.db")),
            _ => None,
        }
    }

    /// Where a `speak` destination ends up: absolute paths pass through,
    /// relative ones land under `output_dir`.
    pub fn resolve_output(&self, destination: &str) -> PathBuf {
        let path = Path::new(destination);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.output_dir).join(path)
        }
    }
}

pub fn normalize_currency(raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        code
    } else {
        "AUD".into()
    }
}

pub fn normalize_phone_region(raw: &str) -> String {
    match raw.parse::<PhoneRegion>() {
        Ok(region) => region.code().to_string(),
        Err(e) => {
            warn!("{e}; using AU");
            PhoneRegion::Au.code().to_string()
        }
    }
}

pub fn normalize_audit_backend(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite3" | "db" => "sqlite".into(),
        "none" | "off" | "noop" => "none".into(),
        _ => "jsonl".into(),
    }
}

pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Lattice Labs")
            .join("Parlance")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("parlance")
    }
}

pub fn default_settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<AppSettings>(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), "malformed settings, using defaults: {e}");
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    };
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&dir.path().join("nope.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(load_settings(&path), AppSettings::default());
    }

    #[test]
    fn partial_file_is_filled_and_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
                "defaultCurrency": "usd",
                "phoneRegion": "gb",
                "auditBackend": "SQLite",
                "auditPolicy": "best_effort",
                "syntheticSampleRate": 1,
                "extraAbbreviations": { "NPP": "New Payments Platform", " ": "blank" }
            }"#,
        )
        .expect("write");

        let settings = load_settings(&path);
        assert_eq!(settings.default_currency, "USD");
        assert_eq!(settings.phone_region, "UK");
        assert_eq!(settings.audit_backend, "sqlite");
        assert_eq!(settings.audit_policy, AuditPolicy::BestEffort);
        assert_eq!(settings.synthetic_sample_rate, 8_000);
        assert_eq!(settings.extra_abbreviations.len(), 1);
        assert_eq!(settings.default_persona, DEFAULT_PERSONA);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/settings.json");
        let mut settings = AppSettings {
            default_persona: "friendly_female".into(),
            ..AppSettings::default()
        };
        settings.extra_personas.push(Speaker::new(
            "australian_specialist",
            "p230",
            "Australian Banking Specialist",
            "Local AU accent.",
        ));
        save_settings(&path, &settings).expect("save");
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn number_config_follows_settings() {
        let settings = AppSettings {
            default_currency: "NZD".into(),
            phone_region: "NZ".into(),
            spell_codes: false,
            ..AppSettings::default()
        };
        let config = settings.number_config();
        assert_eq!(config.default_currency, "NZD");
        assert_eq!(config.phone_region, PhoneRegion::Nz);
        assert!(!config.spell_codes);
    }

    #[test]
    fn relative_outputs_land_in_output_dir() {
        let settings = AppSettings {
            output_dir: "/srv/tts".into(),
            ..AppSettings::default()
        };
        assert_eq!(settings.resolve_output("a.wav"), PathBuf::from("/srv/tts/a.wav"));
        assert_eq!(settings.resolve_output("/tmp/b.wav"), PathBuf::from("/tmp/b.wav"));
    }

    #[test]
    fn explicit_audit_path_wins() {
        let settings = AppSettings {
            audit_backend: "none".into(),
            audit_path: Some("/var/log/audit.jsonl".into()),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.resolved_audit_path(),
            Some(PathBuf::from("/var/log/audit.jsonl"))
        );
        let none = AppSettings {
            audit_backend: "none".into(),
            ..AppSettings::default()
        };
        assert_eq!(none.resolved_audit_path(), None);
    }
}
