// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the YOLO detector

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Default square input size for YOLOv8 exports
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Gray used by Ultralytics for letterbox padding
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox resize, needed to map boxes back to the source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale factor applied to both axes
    pub scale: f32,
    /// Horizontal padding on the left
    pub pad_x: f32,
    /// Vertical padding on the top
    pub pad_y: f32,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
}

impl LetterboxInfo {
    /// Calculate letterbox geometry for an image of the given size
    pub fn new(original_width: u32, original_height: u32, target_size: u32) -> Self {
        if original_width == 0 || original_height == 0 {
            return Self {
                scale: 1.0,
                pad_x: 0.0,
                pad_y: 0.0,
                original_width,
                original_height,
            };
        }

        let target = target_size as f32;
        let scale = (target / original_width as f32).min(target / original_height as f32);
        let (new_w, new_h) = scaled_dimensions(original_width, original_height, scale);

        Self {
            scale,
            pad_x: ((target_size - new_w) / 2) as f32,
            pad_y: ((target_size - new_h) / 2) as f32,
            original_width,
            original_height,
        }
    }

    /// Map a point in model-input space back into original image space,
    /// clamped to the image bounds
    pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let ox = (x - self.pad_x) / self.scale;
        let oy = (y - self.pad_y) / self.scale;
        (
            ox.clamp(0.0, self.original_width as f32),
            oy.clamp(0.0, self.original_height as f32),
        )
    }
}

fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let new_w = ((width as f32 * scale).round() as u32).max(1);
    let new_h = ((height as f32 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resize with letterbox (padding, no distortion, keeps all content)
pub fn letterbox_resize(image: &DynamicImage, target_size: u32) -> (RgbImage, LetterboxInfo) {
    let (orig_w, orig_h) = image.dimensions();
    let info = LetterboxInfo::new(orig_w, orig_h, target_size);

    let mut output = RgbImage::from_pixel(
        target_size,
        target_size,
        Rgb([PAD_VALUE, PAD_VALUE, PAD_VALUE]),
    );

    if orig_w == 0 || orig_h == 0 {
        return (output, info);
    }

    let (new_w, new_h) = scaled_dimensions(orig_w, orig_h, info.scale);
    let resized = image
        .resize_exact(new_w, new_h, FilterType::Triangle)
        .to_rgb8();

    let offset_x = info.pad_x as u32;
    let offset_y = info.pad_y as u32;
    for (x, y, pixel) in resized.enumerate_pixels() {
        output.put_pixel(x + offset_x, y + offset_y, *pixel);
    }

    (output, info)
}

/// Preprocess an image for a YOLO model
///
/// Steps:
/// 1. Letterbox to `target_size` x `target_size`
/// 2. Scale pixels to 0.0-1.0 (no mean/std normalization)
/// 3. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_yolo(image: &DynamicImage, target_size: u32) -> (Array4<f32>, LetterboxInfo) {
    let (letterboxed, info) = letterbox_resize(image, target_size);

    let size = target_size as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in letterboxed.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, info)
}
