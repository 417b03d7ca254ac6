//! Host application state: settings plus the service wired to concrete adapters.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use parlance_core::{
    adapters::{JsonlAuditLog, NoopAuditLog, SilenceSynthesizer, WavFileSink},
    AuditSink, NormalizationPipeline, PhraseCatalog, ServiceConfig, ServicePorts, SpeechService,
    VoiceRegistry,
};
use tracing::{info, warn};

use crate::settings::AppSettings;
use crate::storage::AuditStore;

/// The audit backend selected by settings, kept concretely so commands can
/// read it back.
#[derive(Clone)]
pub enum AuditBackend {
    Jsonl(Arc<JsonlAuditLog>),
    Sqlite(Arc<AuditStore>),
    None,
}

impl AuditBackend {
    fn sink(&self) -> Arc<dyn AuditSink> {
        match self {
            Self::Jsonl(log) => log.clone(),
            Self::Sqlite(store) => store.clone(),
            Self::None => Arc::new(NoopAuditLog),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Jsonl(_) => "jsonl",
            Self::Sqlite(_) => "sqlite",
            Self::None => "none",
        }
    }
}

pub struct AppState {
    pub settings: AppSettings,
    pub settings_path: PathBuf,
    pub pipeline: NormalizationPipeline,
    pub registry: Arc<VoiceRegistry>,
    pub phrases: PhraseCatalog,
    pub audit: AuditBackend,
    pub service: SpeechService,
}

impl AppState {
    pub fn new(settings: AppSettings, settings_path: PathBuf) -> anyhow::Result<Self> {
        let pipeline = NormalizationPipeline::with_config(settings.number_config());
        for (short, expanded) in &settings.extra_abbreviations {
            pipeline.abbreviations().add_abbreviation(short, expanded);
        }

        let registry = VoiceRegistry::with_builtin();
        for speaker in &settings.extra_personas {
            registry.register_speaker(speaker.clone());
        }
        let registry = if registry.list().contains(&settings.default_persona) {
            Arc::new(VoiceRegistry::new(&settings.default_persona, registry.speakers())?)
        } else {
            warn!(
                persona = %settings.default_persona,
                "configured default persona is not registered, keeping {}",
                registry.default_persona()
            );
            Arc::new(registry)
        };

        let audit = match (settings.audit_backend.as_str(), settings.resolved_audit_path()) {
            ("jsonl", Some(path)) => AuditBackend::Jsonl(Arc::new(
                JsonlAuditLog::new(&path)
                    .with_context(|| format!("opening audit log {}", path.display()))?,
            )),
            ("sqlite", Some(path)) => {
                let store = AuditStore::new(path.clone())
                    .with_context(|| format!("opening audit store {}", path.display()))?;
                if let Err(e) = store.prune(settings.retention_days) {
                    warn!(path = %store.path().display(), "audit prune failed at startup: {e}");
                }
                AuditBackend::Sqlite(Arc::new(store))
            }
            _ => AuditBackend::None,
        };

        let service = SpeechService::new(
            ServicePorts {
                normalizer: Arc::new(pipeline.clone()),
                synthesizer: Arc::new(SilenceSynthesizer::new(
                    settings.synthetic_sample_rate,
                    settings.synthetic_duration_secs,
                )),
                sink: Arc::new(WavFileSink::new()),
                audit: audit.sink(),
            },
            Arc::clone(&registry),
            ServiceConfig {
                audit_policy: settings.audit_policy,
            },
        );

        info!(
            settings_path = %settings_path.display(),
            default_persona = registry.default_persona(),
            audit_backend = audit.name(),
            "host state ready"
        );

        Ok(Self {
            settings,
            settings_path,
            pipeline,
            registry,
            phrases: PhraseCatalog::with_builtin(),
            audit,
            service,
        })
    }
}
