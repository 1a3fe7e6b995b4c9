// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detector on ONNX Runtime
//!
//! Expects a standard Ultralytics ONNX export: one image input of shape
//! [1, 3, S, S] and one output of shape [1, 4 + C, N] (boxes as cx, cy, w, h
//! followed by C class scores). The transposed [1, N, 4 + C] layout is also
//! accepted.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

use super::{BoundingBox, Detection, DetectionError, Detector};
use crate::vision::preprocessing::{preprocess_for_yolo, LetterboxInfo, YOLO_INPUT_SIZE};

/// Post-processing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoloParams {
    /// Square model input size (640 typical)
    pub input_size: u32,
    /// Minimum class score kept (0..1)
    pub conf_threshold: f32,
    /// IoU above which same-class boxes are suppressed (0..1)
    pub iou_threshold: f32,
    /// Upper bound on returned boxes
    pub max_detections: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: YOLO_INPUT_SIZE,
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Box candidate before NMS, in original image space
#[derive(Debug, Clone)]
struct Candidate {
    bbox: BoundingBox,
    score: f32,
    class_id: usize,
}

/// YOLOv8 detector
///
/// Runs on CPU only. The ONNX session is shared behind a mutex, so concurrent
/// requests run inference one at a time.
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Class names indexed by class id
    labels: Arc<Vec<String>>,
    params: YoloParams,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLOv8 ONNX model from disk
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(model_path: P, params: YoloParams, labels: Vec<String>) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Detection model input: {} {:?}", input.name, input.input_type);
        }

        info!(
            "✅ Detection model loaded (CPU-only, {} classes, input {}px)",
            labels.len(),
            params.input_size
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: Arc::new(labels),
            params,
        })
    }

    pub fn params(&self) -> &YoloParams {
        &self.params
    }
}

impl Detector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectionError> {
        let started = Instant::now();
        let (tensor, letterbox) = preprocess_for_yolo(image, self.params.input_size);

        let input_value = Value::from_array(tensor)
            .map_err(|e| DetectionError::InvalidInput(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::Unavailable("detector session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| DetectionError::InvalidOutput(e.to_string()))?;

        let detections = decode_output(output.view(), &letterbox, &self.params, &self.labels)?;

        debug!(
            "Detected {} objects in {}ms",
            detections.len(),
            started.elapsed().as_millis()
        );

        Ok(detections)
    }
}

/// Decode a raw YOLOv8 output tensor into response-ready detections
pub fn decode_output(
    output: ArrayViewD<f32>,
    letterbox: &LetterboxInfo,
    params: &YoloParams,
    labels: &[String],
) -> Result<Vec<Detection>, DetectionError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 {
        return Err(DetectionError::InvalidOutput(format!(
            "expected [1, 4 + classes, anchors], got {:?}",
            shape
        )));
    }

    // Exports put the short attribute axis first; anchors always outnumber attributes.
    let channels_first = shape[1] <= shape[2];
    let (channels, anchors) = if channels_first {
        (shape[1], shape[2])
    } else {
        (shape[2], shape[1])
    };

    if channels < 5 {
        return Err(DetectionError::InvalidOutput(format!(
            "output has {} attributes per box, need at least 5",
            channels
        )));
    }

    let value = |attr: usize, anchor: usize| -> f32 {
        if channels_first {
            output[IxDyn(&[0, attr, anchor])]
        } else {
            output[IxDyn(&[0, anchor, attr])]
        }
    };

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let (class_id, score) = (4..channels)
            .map(|attr| (attr - 4, value(attr, anchor)))
            .fold((0usize, f32::MIN), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            });

        if !(score >= params.conf_threshold) {
            continue;
        }

        let cx = value(0, anchor);
        let cy = value(1, anchor);
        let w = value(2, anchor);
        let h = value(3, anchor);

        let (x1, y1) = letterbox.to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_original(cx + w / 2.0, cy + h / 2.0);
        let bbox = BoundingBox::from_corners(x1, y1, x2, y2);

        if !(bbox.area() > 0.0) {
            continue;
        }

        candidates.push(Candidate {
            bbox,
            score,
            class_id,
        });
    }

    let mut kept = non_max_suppression(candidates, params.iou_threshold);
    kept.truncate(params.max_detections);

    Ok(kept
        .into_iter()
        .map(|c| {
            let name = labels
                .get(c.class_id)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", c.class_id));
            Detection::new(c.class_id as u32, name, c.score, c.bbox)
        })
        .collect())
}

/// Class-aware non-maximum suppression, highest score first
fn non_max_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}
