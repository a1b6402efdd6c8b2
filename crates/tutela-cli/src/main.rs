//! Tutela CLI
//!
//! Command-line interface for compliance evaluation of processing
//! activities (RAT records) under Chile's Law 21.719.
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate an activity record
//! tutela evaluate --activity actividad.json
//!
//! # Pipe from stdin, JSON output
//! cat actividad.json | tutela evaluate --format json
//!
//! # Batch: a JSON array evaluates each element
//! tutela evaluate --activity lote.json
//!
//! # Validate a custom keyword catalog
//! tutela catalog validate catalogo.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - 0: low risk
//! - 1: medium risk
//! - 2: high risk
//! - 3: critical risk
//! - 4: error
//!
//! For batch input the exit code reflects the worst risk level found.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use tutela_core::{Catalog, EvaluationResult, ProcessingActivity, RiskLevel};

/// Tutela: compliance evaluation for Chile's Law 21.719
#[derive(Parser)]
#[command(name = "tutela")]
#[command(version)]
#[command(about = "Evaluate processing activities against Law 21.719 obligations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one activity record, or a JSON array of records
    Evaluate {
        /// Path to the activity JSON (reads from stdin if not provided)
        #[arg(short, long)]
        activity: Option<PathBuf>,

        /// Path to a custom keyword catalog (YAML or JSON)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Explicit timestamp for deterministic evaluation (ISO 8601 / RFC 3339).
        /// Use for reproducible results in golden tests or audits.
        /// Example: --evaluated-at 2026-03-01T00:00:00Z
        #[arg(long, value_parser = parse_datetime)]
        evaluated_at: Option<DateTime<Utc>>,
    },

    /// Keyword catalog commands
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog file
    Validate {
        /// Path to the catalog file (YAML or JSON)
        path: PathBuf,
    },

    /// Show the built-in catalog, or a catalog file
    Show {
        /// Path to a catalog file; omits to show the built-in tables
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Parse ISO 8601 / RFC 3339 datetime string to DateTime<Utc>.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            format!("Invalid datetime format: {e}. Expected ISO 8601/RFC 3339 (e.g., 2026-03-01T00:00:00Z)")
        })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(4)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            activity,
            catalog,
            format,
            evaluated_at,
        } => evaluate_command(activity, catalog, format, evaluated_at),

        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => validate_catalog(path),
            CatalogAction::Show { path } => show_catalog(path),
        },
    }
}

fn evaluate_command(
    activity_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    format: OutputFormat,
    evaluated_at: Option<DateTime<Utc>>,
) -> Result<ExitCode> {
    let content = match activity_path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read activity from {path:?}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    let catalog = match catalog_path {
        Some(path) => Catalog::from_file(&path)
            .with_context(|| format!("Failed to load catalog from {path:?}"))?,
        None => Catalog::builtin().clone(),
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).context("Activity input is not valid JSON")?;

    // A JSON array is a batch; each element evaluates independently
    let inputs: Vec<serde_json::Value> = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let evaluated_at = evaluated_at.unwrap_or_else(Utc::now);
    let mut results = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let activity = ProcessingActivity::from_value(input)
            .with_context(|| format!("Invalid activity at index {index}"))?;
        results.push(tutela_core::evaluate_with_catalog_at(
            &activity,
            &catalog,
            evaluated_at,
        ));
    }

    match format {
        OutputFormat::Json => {
            if results.len() == 1 {
                println!("{}", serde_json::to_string_pretty(&results[0])?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        OutputFormat::Text => {
            for (index, result) in results.iter().enumerate() {
                if results.len() > 1 {
                    println!("=== Actividad {} ===", index + 1);
                }
                print_text_result(result);
                if index + 1 < results.len() {
                    println!();
                }
            }
        }
    }

    let worst = results
        .iter()
        .map(|r| r.risk_level)
        .max()
        .unwrap_or(RiskLevel::Low);
    Ok(exit_code_for(worst))
}

fn exit_code_for(level: RiskLevel) -> ExitCode {
    match level {
        RiskLevel::Low => ExitCode::from(0),
        RiskLevel::Medium => ExitCode::from(1),
        RiskLevel::High => ExitCode::from(2),
        RiskLevel::Critical => ExitCode::from(3),
    }
}

fn print_text_result(result: &EvaluationResult) {
    println!("Sector: {}", result.sector);
    println!("Riesgo: {:?}", result.risk_level);
    println!(
        "Consulta previa: {}",
        if result.requires_prior_consultation {
            "requerida"
        } else {
            "no requerida"
        }
    );

    if !result.sensitive_categories.is_empty() {
        println!();
        println!("Categorías sensibles:");
        for category in &result.sensitive_categories {
            println!("  - {category}");
        }
    }

    if !result.risk_factors.is_empty() {
        println!();
        println!("Factores de riesgo:");
        for factor in &result.risk_factors {
            println!("  - {factor}");
        }
    }

    if !result.alerts.is_empty() {
        println!();
        println!("Alertas:");
        for alert in &result.alerts {
            println!("  [{:?}] {}", alert.severity, alert.title);
            println!("      {}", alert.legal_basis);
        }
    }

    if !result.required_documents.is_empty() {
        println!();
        println!("Documentos requeridos:");
        for doc in &result.required_documents {
            println!(
                "  - {} (plazo: {} días, urgencia: {:?})",
                doc.document_type, doc.due_in_days, doc.urgency
            );
        }
    }

    if !result.notifications.is_empty() {
        println!();
        println!("Notificaciones al DPO: {}", result.notifications.len());
    }
}

fn validate_catalog(path: PathBuf) -> Result<ExitCode> {
    match Catalog::from_file(&path) {
        Ok(catalog) => {
            println!("Catalog is valid: version {}", catalog.version);
            println!();
            println!("Sectors: {}", catalog.sector_keywords.len());
            println!("Sensitive categories: {}", catalog.sensitive_keywords.len());
            println!(
                "International providers: {}",
                catalog.international_providers.len()
            );
            println!("Profiling keywords: {}", catalog.profiling_keywords.len());
            Ok(ExitCode::from(0))
        }
        Err(e) => {
            eprintln!("Catalog validation failed: {e}");
            Ok(ExitCode::from(4))
        }
    }
}

fn show_catalog(path: Option<PathBuf>) -> Result<ExitCode> {
    let catalog = match path {
        Some(path) => Catalog::from_file(&path)
            .with_context(|| format!("Failed to load catalog from {path:?}"))?,
        None => Catalog::builtin().clone(),
    };

    println!("Catalog version: {}", catalog.version);
    println!();

    println!("Sector keywords (classification priority order):");
    for entry in &catalog.sector_keywords {
        println!("  {}: {} keywords", entry.sector, entry.keywords.len());
    }
    println!();

    println!("Sensitive categories:");
    for entry in &catalog.sensitive_keywords {
        println!(
            "  {}: {} tags, {} keywords",
            entry.category,
            entry.declared_tags.len(),
            entry.keywords.len()
        );
    }
    println!();

    println!(
        "International providers: {}",
        catalog.international_providers.join(", ")
    );

    Ok(ExitCode::from(0))
}
