// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::{DetectorConfig, ServerConfig};

/// Assis detection service
#[derive(Parser, Debug, Default)]
#[command(name = "assis-detect")]
#[command(version)]
#[command(about = "Authenticated HTTP object detection service", long_about = None)]
pub struct Cli {
    /// Bind host (overrides BACKEND_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides PORT / BACKEND_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to the YOLOv8 ONNX model (overrides MODEL_PATH)
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Class names file, one per line (overrides LABELS_PATH)
    #[arg(long)]
    pub labels_path: Option<PathBuf>,

    /// Enable debug logging (overrides BACKEND_DEBUG)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Layer explicit flags over environment-derived configuration
    pub fn apply(&self, server: &mut ServerConfig, detector: &mut DetectorConfig) {
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        if self.debug {
            server.debug = true;
        }
        if let Some(path) = &self.model_path {
            detector.model_path = path.clone();
        }
        if let Some(path) = &self.labels_path {
            detector.labels_path = Some(path.clone());
        }
    }
}
