// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based object detection
//!
//! This module provides:
//! - Image acquisition from uploads and URLs
//! - Letterbox preprocessing for YOLO models
//! - The detector boundary and its YOLOv8 ONNX implementation

pub mod acquisition;
pub mod detection;
pub mod image_utils;
pub mod preprocessing;

pub use acquisition::{AcquisitionError, FetchError, ImageAcquirer};
pub use detection::{BoundingBox, Detection, DetectionError, Detector, YoloDetector, YoloParams};
pub use image_utils::{decode_image_bytes, detect_format, DecodedImage, ImageError, ImageInfo};
