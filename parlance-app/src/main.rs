//! `parlance` — headless host for the Parlance speech service.

mod commands;
mod settings;
mod state;
mod storage;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use tracing::info;

use crate::commands::Command;
use crate::settings::{default_settings_path, load_settings};
use crate::state::AppState;

const USAGE: &str = "\
Usage: parlance [--settings PATH] <command>

Commands:
  normalize <text>                          print the spoken form of <text>
  speak [--persona P] [--out FILE] <text>   synthesise <text>, print a JSON summary
  phone <number>                            print the spoken form of a phone number
  personas                                  list registered personas
  phrases <text>                            list BFSI phrases found in <text>
  manifest [--speaker S] <text>...          print a synthetic dataset manifest
  audit [--limit N]                         print recent audit events
  settings [--save]                         print (and optionally write) effective settings";

#[derive(Debug, PartialEq)]
struct Cli {
    settings_path: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Cli> {
    let mut settings_path = None;
    let mut it = args.into_iter().peekable();

    while it.peek().is_some_and(|a| a.starts_with("--")) {
        match it.next().as_deref() {
            Some("--settings") => {
                let Some(v) = it.next() else {
                    bail!("missing value for --settings");
                };
                settings_path = Some(PathBuf::from(v));
            }
            Some("--help") => bail!("{USAGE}"),
            Some(other) => bail!("unknown option: {other}\n\n{USAGE}"),
            None => break,
        }
    }

    let name = it.next().ok_or_else(|| anyhow!("missing command\n\n{USAGE}"))?;
    let mut persona = None;
    let mut out = None;
    let mut speaker = None;
    let mut limit = 20usize;
    let mut save = false;
    let mut words: Vec<String> = Vec::new();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--persona" => persona = Some(it.next().context("missing value for --persona")?),
            "--out" => out = Some(it.next().context("missing value for --out")?),
            "--speaker" => speaker = Some(it.next().context("missing value for --speaker")?),
            "--limit" => {
                let v = it.next().context("missing value for --limit")?;
                limit = v
                    .parse::<usize>()
                    .with_context(|| format!("invalid value for --limit: {v}"))?
                    .clamp(1, 1000);
            }
            "--save" => save = true,
            _ => words.push(arg),
        }
    }

    let text = || -> anyhow::Result<String> {
        if words.is_empty() {
            bail!("'{name}' needs text\n\n{USAGE}");
        }
        Ok(words.join(" "))
    };

    let command = match name.as_str() {
        "normalize" => Command::Normalize { text: text()? },
        "speak" => Command::Speak {
            text: text()?,
            persona,
            out,
        },
        "phone" => Command::Phone { number: text()? },
        "personas" => Command::Personas,
        "phrases" => Command::Phrases { text: text()? },
        "manifest" => {
            if words.is_empty() {
                bail!("'manifest' needs at least one text\n\n{USAGE}");
            }
            Command::Manifest {
                texts: words.clone(),
                speaker,
            }
        }
        "audit" => Command::Audit { limit },
        "settings" => Command::Settings { save },
        other => bail!("unknown command: {other}\n\n{USAGE}"),
    };

    Ok(Cli {
        settings_path,
        command,
    })
}

fn run() -> anyhow::Result<()> {
    let cli = parse_args(std::env::args().skip(1))?;

    let settings_path = cli.settings_path.unwrap_or_else(default_settings_path);
    let settings = load_settings(&settings_path);
    info!(
        settings_path = %settings_path.display(),
        default_persona = %settings.default_persona,
        audit_backend = %settings.audit_backend,
        "settings loaded"
    );

    let state = AppState::new(settings, settings_path)?;
    let output = commands::run(&state, &cli.command)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn main() {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("parlance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("parlance: {e:#}");
        std::process::exit(1);
    }
}
