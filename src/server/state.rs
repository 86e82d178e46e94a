//! Application state management

use crate::pipeline::SessionSlot;
use crate::training::PipelineConfig;
use crate::visualization::SvgPlotter;
use std::path::PathBuf;

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline_config: PipelineConfig,
    pub sessions: SessionSlot,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            pipeline_config: PipelineConfig::default(),
            sessions: SessionSlot::new(),
        }
    }

    /// Plotter writing to a file owned by one session, so overlapping
    /// training runs never overwrite each other's plot
    pub fn plotter_for(&self, session_id: &str) -> SvgPlotter {
        SvgPlotter::new(&self.config.plots_dir).with_file_name(format!("result-{}.svg", session_id))
    }

    /// Destination for an uploaded file. Only the final path component of the
    /// client-supplied name is kept.
    pub fn upload_path(&self, file_name: &str) -> PathBuf {
        let name = std::path::Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("upload.csv");
        PathBuf::from(&self.config.data_dir).join(name)
    }
}
