//! Command handlers. Each returns the text to print on stdout.

use anyhow::{bail, Context};
use parlance_core::{synthetic_manifest, SynthesisRequest};
use serde::Serialize;
use tracing::info;

use crate::settings::save_settings;
use crate::state::{AppState, AuditBackend};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Normalize { text: String },
    Speak {
        text: String,
        persona: Option<String>,
        out: Option<String>,
    },
    Phone { number: String },
    Personas,
    Phrases { text: String },
    Manifest {
        texts: Vec<String>,
        speaker: Option<String>,
    },
    Audit { limit: usize },
    Settings { save: bool },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeakSummary<'a> {
    success: bool,
    persona: &'a str,
    normalized_text: &'a str,
    resolved_destination: Option<&'a str>,
    sample_count: Option<usize>,
    duration_secs: f64,
    elapsed_secs: f64,
    rtf: f64,
}

pub fn run(state: &AppState, command: &Command) -> anyhow::Result<String> {
    match command {
        Command::Normalize { text } => Ok(state.pipeline.normalize(text)),
        Command::Speak { text, persona, out } => {
            speak(state, text, persona.as_deref(), out.as_deref())
        }
        Command::Phone { number } => Ok(state.pipeline.numbers().phone(number)),
        Command::Personas => Ok(personas(state)),
        Command::Phrases { text } => Ok(phrases(state, text)),
        Command::Manifest { texts, speaker } => {
            let manifest = synthetic_manifest(texts, speaker.as_deref(), None);
            Ok(serde_json::to_string_pretty(&manifest)?)
        }
        Command::Audit { limit } => audit(state, *limit),
        Command::Settings { save } => settings(state, *save),
    }
}

fn speak(
    state: &AppState,
    text: &str,
    persona: Option<&str>,
    out: Option<&str>,
) -> anyhow::Result<String> {
    let persona = persona.unwrap_or(&state.settings.default_persona);
    let mut request = SynthesisRequest::new(text, persona).with_metadata("channel", "cli");
    if let Some(out) = out {
        let destination = state.settings.resolve_output(out);
        request = request.with_destination(destination.display().to_string());
    }

    let result = state
        .service
        .speak(&request)
        .with_context(|| format!("speaking as '{persona}'"))?;
    info!(persona, rtf = result.rtf, "speak command finished");

    let summary = SpeakSummary {
        success: result.success,
        persona,
        normalized_text: &result.normalized_text,
        resolved_destination: result.resolved_destination.as_deref(),
        sample_count: result.artifact.as_ref().map(|a| a.samples.len()),
        duration_secs: result.duration_secs,
        elapsed_secs: result.elapsed_secs,
        rtf: result.rtf,
    };
    Ok(serde_json::to_string(&summary)?)
}

fn personas(state: &AppState) -> String {
    let default = state.registry.default_persona();
    state
        .registry
        .speakers()
        .iter()
        .map(|s| {
            let marker = if s.persona == default { "*" } else { " " };
            format!(
                "{marker} {:<22} {:<6} {} ({})",
                s.persona, s.voice_handle, s.display_name, s.usage_guidance
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn phrases(state: &AppState, text: &str) -> String {
    state
        .phrases
        .find(text)
        .into_iter()
        .map(|phrase| {
            let category = state.phrases.classify(&phrase).unwrap_or_default();
            format!("{category}: {phrase}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn audit(state: &AppState, limit: usize) -> anyhow::Result<String> {
    let events = match &state.audit {
        AuditBackend::Sqlite(store) => store.recent(limit)?,
        AuditBackend::Jsonl(log) => {
            let mut events = log.read_all()?;
            events.reverse();
            events.truncate(limit.max(1));
            events
        }
        AuditBackend::None => bail!("audit backend is 'none'; nothing is recorded"),
    };
    let lines = events
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Effective settings as JSON; `save` also writes them to the settings path.
fn settings(state: &AppState, save: bool) -> anyhow::Result<String> {
    if save {
        save_settings(&state.settings_path, &state.settings)
            .with_context(|| format!("writing {}", state.settings_path.display()))?;
        info!(path = %state.settings_path.display(), "settings saved");
    }
    Ok(serde_json::to_string_pretty(&state.settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;

    fn state(backend: &str, dir: &tempfile::TempDir) -> AppState {
        let settings = AppSettings {
            audit_backend: backend.into(),
            audit_path: Some(
                dir.path()
                    .join(if backend == "sqlite" { "audit.db" } else { "audit.jsonl" })
                    .display()
                    .to_string(),
            ),
            output_dir: dir.path().join("out").display().to_string(),
            synthetic_duration_secs: 0.25,
            ..AppSettings::default()
        };
        AppState::new(settings, dir.path().join("settings.json")).expect("state")
    }

    #[test]
    fn normalize_command() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run(
            &state("none", &dir),
            &Command::Normalize {
                text: "Your OTP is 482913.".into(),
            },
        )
        .expect("normalize");
        assert_eq!(out, "Your One Time Password is four eight two nine one three.");
    }

    #[test]
    fn speak_writes_wav_and_audits_to_sqlite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state("sqlite", &dir);
        let out = run(
            &state,
            &Command::Speak {
                text: "Please confirm your KYC.".into(),
                persona: Some("professional_female".into()),
                out: Some("kyc.wav".into()),
            },
        )
        .expect("speak");

        let summary: serde_json::Value = serde_json::from_str(&out).expect("json summary");
        assert_eq!(summary["success"], true);
        assert_eq!(
            summary["normalizedText"],
            "Please confirm your Know Your Customer."
        );
        assert!(summary["sampleCount"].is_null());
        let written = summary["resolvedDestination"].as_str().expect("destination");
        assert!(std::path::Path::new(written).exists());

        let audit = run(&state, &Command::Audit { limit: 5 }).expect("audit");
        let event: serde_json::Value = serde_json::from_str(&audit).expect("audit json");
        assert_eq!(event["persona"], "professional_female");
        assert_eq!(event["speakerVoiceHandle"], "p228");
        assert_eq!(event["metadata"]["channel"], "cli");
    }

    #[test]
    fn speak_without_out_keeps_audio_in_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state("jsonl", &dir);
        let out = run(
            &state,
            &Command::Speak {
                text: "hello".into(),
                persona: None,
                out: None,
            },
        )
        .expect("speak");
        let summary: serde_json::Value = serde_json::from_str(&out).expect("json summary");
        assert_eq!(summary["sampleCount"], 5_513);
        assert!(summary["resolvedDestination"].is_null());

        let audit = run(&state, &Command::Audit { limit: 1 }).expect("audit");
        assert_eq!(audit.lines().count(), 1);
    }

    #[test]
    fn empty_text_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run(
            &state("none", &dir),
            &Command::Speak {
                text: "  ".into(),
                persona: None,
                out: None,
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("must not be empty"));
    }

    #[test]
    fn audit_needs_a_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(run(&state("none", &dir), &Command::Audit { limit: 3 }).is_err());
    }

    #[test]
    fn personas_mark_the_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run(&state("none", &dir), &Command::Personas).expect("personas");
        assert_eq!(out.lines().count(), 4);
        let default_line = out
            .lines()
            .find(|l| l.starts_with('*'))
            .expect("default marked");
        assert!(default_line.contains("neutral_male"));
    }

    #[test]
    fn phrases_are_categorised() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run(
            &state("none", &dir),
            &Command::Phrases {
                text: "Fraud alert on your credit card".into(),
            },
        )
        .expect("phrases");
        assert_eq!(out, "fraud_alerts: fraud alert\nproduct_names: credit card");
    }

    #[test]
    fn phone_and_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state("none", &dir);
        assert_eq!(
            run(&state, &Command::Phone { number: "0412 345 678".into() }).expect("phone"),
            "four one two three four five six seven eight"
        );
        let manifest = run(
            &state,
            &Command::Manifest {
                texts: vec!["a".into(), "b".into()],
                speaker: None,
            },
        )
        .expect("manifest");
        let entries: serde_json::Value = serde_json::from_str(&manifest).expect("json");
        assert_eq!(entries.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn settings_save_writes_the_effective_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state("none", &dir);
        let shown = run(&state, &Command::Settings { save: false }).expect("settings");
        assert!(!dir.path().join("settings.json").exists());

        let saved = run(&state, &Command::Settings { save: true }).expect("settings");
        assert_eq!(shown, saved);
        let reloaded = crate::settings::load_settings(&dir.path().join("settings.json"));
        assert_eq!(reloaded, state.settings);
    }
}
