//! CLI transport: the terminal view over sessions and history

use crate::api::ApiClient;
use crate::config::Config;
use crate::core::{CandidateFile, SessionState, UploadSession};
use crate::history::{ConfidenceBand, HistoryAggregator};
use crate::presenter::{format_timestamp, Framing, PredictionView, ResultPresenter};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};

/// Output format for commands that print results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Scan one image: validate, preview, submit, and print the diagnosis
pub async fn run_scan(config: &Config, path: &Path, format: OutputFormat) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url);
    let mut session = UploadSession::new(config.upload.validation_policy());

    let file = CandidateFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match session.select_file(file) {
        Ok(ticket) => {
            let outcome = ticket.render().await;
            session.apply_preview(outcome);
        }
        Err(_) => return report_session_error(&session, format),
    }

    if format == OutputFormat::Table {
        if let Some(candidate) = session.candidate() {
            println!("{} {}", "Analyzing".cyan(), candidate.label());
        }
    }

    session.submit(&client).await?;

    match (session.state(), session.result()) {
        (SessionState::Succeeded, Some(prediction)) => {
            let view = ResultPresenter::present(prediction);
            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "state": session.state().as_str(),
                        "message": session.status_message(),
                        "result": view,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Table => {
                    if let Some(message) = session.status_message() {
                        println!("{} {}", "✓".green(), message);
                    }
                    print_prediction(&view);
                }
            }
            Ok(())
        }
        _ => report_session_error(&session, format),
    }
}

fn report_session_error(session: &UploadSession, format: OutputFormat) -> Result<()> {
    let message = session.error().unwrap_or("prediction failed").to_string();
    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "state": session.state().as_str(),
            "error": message,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    anyhow::bail!(message)
}

fn print_prediction(view: &PredictionView) {
    println!("\n{}", "=== PREDICTION RESULT ===".bold().cyan());
    println!();
    println!("Primary Diagnosis: {}", view.disease.bold());
    println!("Confidence:        {}", view.confidence_display());
    if let Some(filename) = &view.filename {
        println!("File:              {}", filename);
    }
    println!();

    if !view.ranked.is_empty() {
        #[derive(Tabled)]
        struct RankRow {
            #[tabled(rename = "#")]
            rank: usize,
            #[tabled(rename = "Class")]
            label: String,
            #[tabled(rename = "Confidence")]
            confidence: String,
        }

        let rows: Vec<RankRow> = view
            .ranked
            .iter()
            .enumerate()
            .map(|(i, entry)| RankRow {
                rank: i + 1,
                label: entry.label.clone(),
                confidence: entry.display(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
        println!();
    }

    match view.framing {
        Framing::Healthy => println!("{}", view.framing.title().bold().green()),
        Framing::DiseaseDetected => println!("{}", view.framing.title().bold().red()),
    }
    println!("{}", view.framing.message());
    println!();

    println!("{}", "Recommended actions".bold());
    for action in &view.care {
        println!("  • {}: {}", action.title, action.description);
    }
    println!();

    println!("{}", format!("Analysis ID: {}", view.prediction_id).dimmed());
    println!("{}", format!("Timestamp:   {}", view.timestamp).dimmed());
}

/// Fetch and print past predictions with summary statistics
pub async fn run_history(
    config: &Config,
    limit: Option<usize>,
    skip: usize,
    format: OutputFormat,
) -> Result<()> {
    let client = Arc::new(ApiClient::new(&config.api.base_url));
    let limit = limit.unwrap_or(config.history.limit);
    let mut aggregator = HistoryAggregator::with_limit(client, limit);

    let summary = aggregator.refresh_page(skip).await?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summary,
                "total": aggregator.total(),
                "results": aggregator.records(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("\n{}", "=== SCAN HISTORY ===".bold().cyan());
            println!();

            #[derive(Tabled)]
            struct SummaryRow {
                #[tabled(rename = "Metric")]
                metric: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let summary_data = vec![
                SummaryRow {
                    metric: "Total Scans".to_string(),
                    value: summary.count.to_string(),
                },
                SummaryRow {
                    metric: "Avg Confidence".to_string(),
                    value: format!("{}%", summary.mean_confidence_percent),
                },
                SummaryRow {
                    metric: "Issues Detected".to_string(),
                    value: summary.issue_count.to_string(),
                },
            ];

            let mut table = Table::new(summary_data);
            table.with(Style::rounded());
            println!("{}", table);
            println!();

            if aggregator.records().is_empty() {
                println!("{}", "No predictions yet. Run 'agriscan scan <image>' to start.".yellow());
                return Ok(());
            }

            #[derive(Tabled)]
            struct RecordRow {
                #[tabled(rename = "Date")]
                date: String,
                #[tabled(rename = "File")]
                filename: String,
                #[tabled(rename = "Diagnosis")]
                disease: String,
                #[tabled(rename = "Confidence")]
                confidence: String,
                #[tabled(rename = "Band")]
                band: &'static str,
            }

            let rows: Vec<RecordRow> = aggregator
                .records()
                .iter()
                .map(|r| RecordRow {
                    date: format_timestamp(&r.timestamp),
                    filename: r.filename.clone(),
                    disease: r.predicted_disease.clone(),
                    confidence: format!("{:.1}%", crate::presenter::percent(r.confidence)),
                    band: ConfidenceBand::for_confidence(r.confidence).as_str(),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);

            if let Some(total) = aggregator.total() {
                println!(
                    "{}",
                    format!("Showing {} of {} predictions", summary.count, total).dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Probe the service and print its status
pub async fn run_health(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url);

    let health = client
        .health()
        .await
        .with_context(|| format!("Service at {} is unreachable", client.base_url()))?;
    // The banner is informational; a missing root route is not a failure
    let info = client.service_info().await.ok();

    let marker = if health.is_healthy() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("{} {} ({})", marker, health.service, health.status);
    if let Some(info) = info {
        println!("  {} v{}", info.message, info.version);
    }
    println!("  {}", client.base_url().dimmed());

    if !health.is_healthy() {
        anyhow::bail!("service reported status '{}'", health.status);
    }
    Ok(())
}

/// Print the effective configuration, optionally writing it to disk
pub fn run_config(config: &Config, init: bool) -> Result<()> {
    if init {
        let path = config.save().context("Failed to write config file")?;
        println!("{} Wrote {}", "✓".green(), path.display());
    } else if let Ok(path) = Config::config_path() {
        println!("{}", format!("# {}", path.display()).dimmed());
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
