// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for loading the detection model

use std::env;
use std::path::PathBuf;

use super::parse_or;
use crate::vision::detection::YoloParams;

/// Configuration for the YOLO detector
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX model (default: ./models/yolov8n.onnx)
    pub model_path: PathBuf,
    /// Optional class names file; COCO names when absent
    pub labels_path: Option<PathBuf>,
    /// Post-processing parameters
    pub params: YoloParams,
}

impl DetectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let params = YoloParams {
            input_size: parse_or(env::var("MODEL_INPUT_SIZE").ok(), defaults.params.input_size),
            conf_threshold: parse_or(
                env::var("CONFIDENCE_THRESHOLD").ok(),
                defaults.params.conf_threshold,
            ),
            iou_threshold: parse_or(env::var("IOU_THRESHOLD").ok(), defaults.params.iou_threshold),
            max_detections: parse_or(
                env::var("MAX_DETECTIONS").ok(),
                defaults.params.max_detections,
            ),
        };

        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            labels_path: env::var("LABELS_PATH").ok().map(PathBuf::from),
            params,
        }
    }

    /// Model name reported by the health endpoint (file stem of the model path)
    pub fn model_name(&self) -> String {
        self.model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.params.input_size == 0 || self.params.input_size % 32 != 0 {
            return Err(format!(
                "input_size must be a positive multiple of 32, got {}",
                self.params.input_size
            ));
        }
        if !(0.0..=1.0).contains(&self.params.conf_threshold) {
            return Err("conf_threshold must be within 0.0-1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.params.iou_threshold) {
            return Err("iou_threshold must be within 0.0-1.0".to_string());
        }
        if self.params.max_detections == 0 {
            return Err("max_detections must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/yolov8n.onnx"),
            labels_path: None,
            params: YoloParams::default(),
        }
    }
}
