//! Workbench CLI Module
//!
//! Command-line interface for training on a CSV file and for starting the
//! HTTP server.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::ingest;
use crate::pipeline::Session;
use crate::training::{Metrics, PipelineConfig, ProblemType};
use crate::visualization::SvgPlotter;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "workbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload, train and predict with small tabular models")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model on a CSV file
    Train {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Model (linear_regression, knn)
        #[arg(short, long, default_value = "linear_regression")]
        model: String,

        /// Problem type (classification, regression)
        #[arg(long, default_value = "regression")]
        problem_type: String,

        /// Directory for the prediction plot
        #[arg(long, default_value = "./plots")]
        plots_dir: PathBuf,

        /// Comma-separated feature vector to predict after training (repeatable)
        #[arg(long, value_name = "VALUES")]
        predict: Vec<String>,
    },

    /// Start the web server
    Serve {
        /// Server port
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}

/// Parse `"1.0, 2.5,3"` into a feature vector
pub fn parse_feature_vector(raw: &str) -> anyhow::Result<Vec<f64>> {
    raw.split(',')
        .map(|v| {
            let v = v.trim();
            v.parse::<f64>()
                .map_err(|e| anyhow::anyhow!("Invalid feature value '{}': {}", v, e))
        })
        .collect()
}

fn print_metrics(metrics: &Metrics) {
    match metrics {
        Metrics::Classification { accuracy } => {
            println!("  {:<16} {}", muted("Accuracy"), format!("{:.4}", accuracy).white().bold());
        }
        Metrics::Regression { mse, mae } => {
            println!("  {:<16} {}", muted("MSE"), format!("{:.4}", mse).white().bold());
            println!("  {:<16} {}", muted("MAE"), format!("{:.4}", mae).white().bold());
        }
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: &Path,
    target: &str,
    model: &str,
    problem_type: &str,
    plots_dir: &Path,
    predict: &[String],
) -> anyhow::Result<()> {
    section("Train");

    let problem_type: ProblemType = problem_type.parse()?;
    let queries = predict
        .iter()
        .map(|raw| parse_feature_vector(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    step_run("Loading data");
    let start = Instant::now();
    let df = ingest::read_csv_path(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    step_run(&format!("Training {}", model.cyan()));
    let plotter = SvgPlotter::new(plots_dir);
    let session = Session::train(
        model,
        problem_type,
        PipelineConfig::default(),
        &df,
        target,
        &plotter,
    )?;
    step_done(&format!("{:.3}s", session.report.training_time_secs));

    let report = &session.report;
    println!();
    println!("  {:<16} {}", muted("Session"), session.id.white());
    println!("  {:<16} {} / {}", muted("Train / test"), report.n_train, report.n_test);
    println!("  {:<16} {}", muted("Features"), report.feature_names.join(", ").white());
    print_metrics(&report.metrics);
    if let Some(artifact) = &report.artifact {
        println!("  {:<16} {}", muted("Plot"), artifact.path.display().to_string().white());
    }

    if !queries.is_empty() {
        section("Predict");
        for query in &queries {
            let prediction = session.predict(query)?;
            println!("  {} {:?} {} {:?}", accent("›"), query, dim("→"), prediction);
        }
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "ML Workbench".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Train  ", &format!("POST http://{}:{}/api/train", host, port)));
    line_box(&kv("Predict", &format!("POST http://{}:{}/api/predict", host, port)));
    line_box(&kv("Health ", &format!("GET  http://{}:{}/api/health", host, port)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig::default().with_address(host, port);
    run_server(config).await
}
