//! Normalization and end-to-end `speak` latency over a text corpus.
//!
//! Corpus files are `*.txt` under the fixtures directory, one case per line.
//! A line may carry the expected spoken form after a tab:
//! `Your OTP is 4829<TAB>Your One Time Password is four eight two nine`.
//! The category of a case is its file stem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parlance_core::{
    adapters::{NoopAuditLog, SilenceSynthesizer},
    AudioArtifact, AudioSink, NormalizationPipeline, ServiceConfig, ServicePorts, SinkError,
    SpeechService, SynthesisRequest, VoiceRegistry,
};
use serde::Serialize;

const BUILTIN_CORPUS: &[(&str, &str, &str)] = &[
    (
        "otp",
        "Your OTP is 482913.",
        "Your One Time Password is four eight two nine one three.",
    ),
    (
        "currency",
        "A fee of $1,234.50 applies.",
        "A fee of one thousand two hundred and thirty-four dollars and fifty cents applies.",
    ),
    (
        "compliance",
        "Please confirm your KYC.",
        "Please confirm your Know Your Customer.",
    ),
    ("plain", "You have 3 new messages.", "You have three new messages."),
];

fn main() {
    if let Err(e) = run() {
        eprintln!("benchmark failed: {e}");
        std::process::exit(1);
    }
}

#[derive(Debug)]
struct Args {
    fixtures_dir: Option<PathBuf>,
    iterations: usize,
    output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Case {
    category: String,
    input: String,
    expected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct CaseResult {
    category: String,
    input: String,
    iteration: usize,
    normalize_ms: f64,
    speak_ms: f64,
    rtf: f64,
    matches_expected: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct CategorySummary {
    category: String,
    runs: usize,
    p50_normalize_ms: f64,
    p95_normalize_ms: f64,
    p50_speak_ms: f64,
    p95_speak_ms: f64,
    accuracy: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    corpus: String,
    iterations: usize,
    total_runs: usize,
    p50_normalize_ms: f64,
    p95_normalize_ms: f64,
    p50_speak_ms: f64,
    p95_speak_ms: f64,
    accuracy: Option<f64>,
    categories: Vec<CategorySummary>,
    cases: Vec<CaseResult>,
}

/// Sink that reports the destination without touching the disk.
struct DiscardSink;

impl AudioSink for DiscardSink {
    fn write(&self, _artifact: &AudioArtifact, destination: &str) -> Result<String, SinkError> {
        Ok(destination.to_string())
    }
}

fn parse_args() -> Result<Args, String> {
    let mut fixtures_dir: Option<PathBuf> = None;
    let mut iterations: usize = 1;
    let mut output: Option<PathBuf> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--fixtures" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --fixtures".into());
                };
                fixtures_dir = Some(PathBuf::from(v));
            }
            "--iterations" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --iterations".into());
                };
                iterations = v
                    .parse::<usize>()
                    .map_err(|_| "invalid value for --iterations".to_string())?
                    .clamp(1, 1000);
            }
            "--output" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --output".into());
                };
                output = Some(PathBuf::from(v));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cargo run -p parlance-core --bin benchmark -- \\
  [--fixtures <dir>] [--iterations <n>] [--output <file.json>]"
                );
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        fixtures_dir,
        iterations,
        output,
    })
}

fn collect_corpus(dir: &Path, out: &mut Vec<Case>) -> Result<(), String> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_corpus(&path, out)?;
            continue;
        }
        let is_txt = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if !is_txt {
            continue;
        }
        let category = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "other".into());
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            let (input, expected) = match line.split_once('\t') {
                Some((input, expected)) => (input, Some(expected.trim().to_string())),
                None => (line, None),
            };
            out.push(Case {
                category: category.clone(),
                input: input.trim().to_string(),
                expected,
            });
        }
    }
    Ok(())
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn accuracy(rows: &[CaseResult]) -> Option<f64> {
    let checked: Vec<bool> = rows.iter().filter_map(|r| r.matches_expected).collect();
    if checked.is_empty() {
        return None;
    }
    Some(checked.iter().filter(|ok| **ok).count() as f64 / checked.len() as f64)
}

fn summarize(category: String, rows: &[CaseResult]) -> CategorySummary {
    let normalize = rows.iter().map(|r| r.normalize_ms).collect::<Vec<_>>();
    let speak = rows.iter().map(|r| r.speak_ms).collect::<Vec<_>>();
    CategorySummary {
        category,
        runs: rows.len(),
        p50_normalize_ms: percentile(&normalize, 0.50),
        p95_normalize_ms: percentile(&normalize, 0.95),
        p50_speak_ms: percentile(&speak, 0.50),
        p95_speak_ms: percentile(&speak, 0.95),
        accuracy: accuracy(rows),
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let cases = match &args.fixtures_dir {
        Some(dir) => {
            if !dir.exists() {
                return Err(format!("fixtures directory not found: {}", dir.display()));
            }
            let mut cases = Vec::new();
            collect_corpus(dir, &mut cases)?;
            if cases.is_empty() {
                return Err(format!("no .txt corpus lines found in {}", dir.display()));
            }
            cases
        }
        None => BUILTIN_CORPUS
            .iter()
            .map(|(category, input, expected)| Case {
                category: (*category).to_string(),
                input: (*input).to_string(),
                expected: Some((*expected).to_string()),
            })
            .collect(),
    };
    let corpus = args
        .fixtures_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "builtin".into());

    println!(
        "Running Parlance benchmark on {} cases (iterations={})",
        cases.len(),
        args.iterations
    );

    let pipeline = NormalizationPipeline::default();
    let service = SpeechService::new(
        ServicePorts {
            normalizer: Arc::new(pipeline.clone()),
            synthesizer: Arc::new(SilenceSynthesizer::default()),
            sink: Arc::new(DiscardSink),
            audit: Arc::new(NoopAuditLog),
        },
        Arc::new(VoiceRegistry::default()),
        ServiceConfig::default(),
    );

    let mut results = Vec::new();
    for case in &cases {
        for iteration in 1..=args.iterations {
            let started = Instant::now();
            let spoken = pipeline.normalize(&case.input);
            let normalize_ms = started.elapsed().as_secs_f64() * 1000.0;

            let started = Instant::now();
            let result = service
                .speak(
                    &SynthesisRequest::new(case.input.clone(), "neutral_male")
                        .with_destination(format!("{}-{iteration}.wav", case.category)),
                )
                .map_err(|e| format!("{}: {e}", case.input))?;
            let speak_ms = started.elapsed().as_secs_f64() * 1000.0;

            results.push(CaseResult {
                category: case.category.clone(),
                input: case.input.clone(),
                iteration,
                normalize_ms,
                speak_ms,
                rtf: result.rtf,
                matches_expected: case.expected.as_ref().map(|e| *e == spoken),
            });
        }
    }

    let mut grouped: BTreeMap<String, Vec<CaseResult>> = BTreeMap::new();
    for row in &results {
        grouped.entry(row.category.clone()).or_default().push(row.clone());
    }
    let categories = grouped
        .into_iter()
        .map(|(name, rows)| summarize(name, &rows))
        .collect();

    let normalize = results.iter().map(|r| r.normalize_ms).collect::<Vec<_>>();
    let speak = results.iter().map(|r| r.speak_ms).collect::<Vec<_>>();
    let summary = Summary {
        corpus,
        iterations: args.iterations,
        total_runs: results.len(),
        p50_normalize_ms: percentile(&normalize, 0.50),
        p95_normalize_ms: percentile(&normalize, 0.95),
        p50_speak_ms: percentile(&speak, 0.50),
        p95_speak_ms: percentile(&speak, 0.95),
        accuracy: accuracy(&results),
        categories,
        cases: results,
    };

    println!(
        "Done. runs={} normalize p50={:.3}ms speak p50={:.3}ms accuracy={}",
        summary.total_runs,
        summary.p50_normalize_ms,
        summary.p50_speak_ms,
        summary
            .accuracy
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "n/a".into())
    );

    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    if let Some(out) = args.output {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&out, json).map_err(|e| e.to_string())?;
        println!("Wrote benchmark report: {}", out.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
