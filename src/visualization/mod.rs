//! Visualization module: renders held-out predictions for inspection.
//!
//! The pipeline only sees the [`PredictionPlotter`] trait; the returned
//! [`ArtifactHandle`] is handed back to the caller untouched.

use crate::error::Result;
use ndarray::Array1;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reference to a rendered artifact on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactHandle {
    pub path: PathBuf,
    pub media_type: String,
}

/// Receives the test split's true and predicted values
pub trait PredictionPlotter: Send + Sync {
    fn render(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Option<ArtifactHandle>>;
}

/// Plotter that renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlotter;

impl PredictionPlotter for NoopPlotter {
    fn render(&self, _y_true: &Array1<f64>, _y_pred: &Array1<f64>) -> Result<Option<ArtifactHandle>> {
        Ok(None)
    }
}

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 56.0;
const ACTUAL_COLOR: &str = "#1f77b4";
const PREDICTED_COLOR: &str = "#ff7f0e";

/// Writes an "Actual vs Predicted" scatter plot as SVG
#[derive(Debug, Clone)]
pub struct SvgPlotter {
    dir: PathBuf,
    file_name: String,
}

impl SvgPlotter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: "result.svg".to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn write_svg(&self, path: &Path, svg: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

impl PredictionPlotter for SvgPlotter {
    fn render(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Option<ArtifactHandle>> {
        let svg = render_scatter(y_true, y_pred);
        let path = self.output_path();
        self.write_svg(&path, &svg)?;
        debug!(path = %path.display(), points = y_true.len(), "Rendered prediction plot");

        Ok(Some(ArtifactHandle {
            path,
            media_type: "image/svg+xml".to_string(),
        }))
    }
}

/// Build the SVG document. Both series share the index axis.
pub fn render_scatter(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> String {
    let finite = y_true.iter().chain(y_pred.iter()).copied().filter(|v| v.is_finite());
    let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        lo = 0.0;
        hi = 1.0;
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let n = y_true.len().max(y_pred.len()).max(2);
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let px = |i: usize| MARGIN + plot_w * i as f64 / (n - 1) as f64;
    let py = |v: f64| HEIGHT - MARGIN - plot_h * (v - lo) / (hi - lo);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="28" font-family="sans-serif" font-size="18" text-anchor="middle">Actual vs Predicted</text>"#,
        WIDTH / 2.0
    );

    // axes
    let _ = writeln!(
        svg,
        r#"<line x1="{m}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/><line x1="{m}" y1="{m}" x2="{m}" y2="{b}" stroke="black"/>"#,
        m = MARGIN,
        b = HEIGHT - MARGIN,
        r = WIDTH - MARGIN
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-family="sans-serif" font-size="13" text-anchor="middle">Index</text>"#,
        WIDTH / 2.0,
        HEIGHT - 16.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="16" y="{y}" font-family="sans-serif" font-size="13" text-anchor="middle" transform="rotate(-90 16 {y})">Value</text>"#,
        y = HEIGHT / 2.0
    );
    for v in [lo, hi] {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{:.3}</text>"#,
            MARGIN - 6.0,
            py(v) + 4.0,
            v
        );
    }

    for (series, color) in [(y_true, ACTUAL_COLOR), (y_pred, PREDICTED_COLOR)] {
        for (i, &v) in series.iter().enumerate().filter(|(_, v)| v.is_finite()) {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{}" fill-opacity="0.8"/>"#,
                px(i),
                py(v),
                color
            );
        }
    }

    // legend
    for (row, (label, color)) in [("Actual", ACTUAL_COLOR), ("Predicted", PREDICTED_COLOR)]
        .into_iter()
        .enumerate()
    {
        let y = MARGIN + 12.0 + 18.0 * row as f64;
        let x = WIDTH - MARGIN - 90.0;
        let _ = writeln!(
            svg,
            r#"<circle cx="{x}" cy="{y}" r="5" fill="{color}"/><text x="{}" y="{}" font-family="sans-serif" font-size="12">{label}</text>"#,
            x + 10.0,
            y + 4.0
        );
    }

    svg.push_str("</svg>\n");
    svg
}
