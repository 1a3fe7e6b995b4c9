// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection boundary
//!
//! The HTTP layer only sees the [`Detector`] trait and the [`Detection`]
//! record; how detections are produced is the implementation's business.
//!
//! Components:
//! - `classes` - Class name tables
//! - `yolo` - YOLOv8 ONNX detector running on CPU

pub mod classes;
pub mod yolo;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classes::{load_labels, COCO_CLASSES};
pub use yolo::{YoloDetector, YoloParams};

/// Detector failure. Always replaces the whole result, never a partial list.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Detector unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected model output: {0}")]
    InvalidOutput(String),
}

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Build a box from two corners, ordering them so that x1 <= x2 and y1 <= y2
    pub fn from_corners(xa: f32, ya: f32, xb: f32, yb: f32) -> Self {
        Self {
            x1: xa.min(xb),
            y1: ya.min(yb),
            x2: xa.max(xb),
            y2: ya.max(yb),
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Intersection over union
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One recognized object instance, as returned by `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub class_name: String,
    /// Confidence score (0.0-1.0), 3 decimals
    pub confidence: f32,
    /// Bounding box, 2 decimals
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a response-ready detection.
    ///
    /// Confidence is clamped into [0, 1] and rounded to 3 decimals, box
    /// coordinates are ordered and rounded to 2 decimals.
    pub fn new(class_id: u32, class_name: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        let confidence = if confidence.is_finite() {
            round_to(confidence.clamp(0.0, 1.0), 3)
        } else {
            0.0
        };
        let ordered = BoundingBox::from_corners(bbox.x1, bbox.y1, bbox.x2, bbox.y2);

        Self {
            class_id,
            class_name: class_name.into(),
            confidence,
            bbox: BoundingBox {
                x1: round_to(ordered.x1, 2),
                y1: round_to(ordered.y1, 2),
                x2: round_to(ordered.x2, 2),
                y2: round_to(ordered.y2, 2),
            },
        }
    }

    /// x1 <= x2, y1 <= y2 and confidence within [0, 1]
    pub fn is_well_formed(&self) -> bool {
        self.bbox.x1 <= self.bbox.x2
            && self.bbox.y1 <= self.bbox.y2
            && (0.0..=1.0).contains(&self.confidence)
    }
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

/// An object detection capability.
///
/// Implementations must be shareable across request handlers; any internal
/// locking is theirs to provide.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectionError>;
}
