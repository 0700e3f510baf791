// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLOv8

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

use super::BoundingBox;

/// Square input size of the YOLOv8 export
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Letterbox fill value used by the YOLOv8 training pipeline
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox transform, kept to map boxes back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub orig_width: u32,
    pub orig_height: u32,
}

impl Letterbox {
    /// Compute the transform that fits `width`x`height` into a `target` square
    pub fn fit(width: u32, height: u32, target: u32) -> Self {
        if width == 0 || height == 0 {
            return Self {
                scale: 1.0,
                pad_x: 0.0,
                pad_y: 0.0,
                orig_width: width,
                orig_height: height,
            };
        }

        let scale = (target as f32 / width as f32).min(target as f32 / height as f32);
        let new_w = ((width as f32 * scale).round() as u32).clamp(1, target);
        let new_h = ((height as f32 * scale).round() as u32).clamp(1, target);

        Self {
            scale,
            pad_x: ((target - new_w) / 2) as f32,
            pad_y: ((target - new_h) / 2) as f32,
            orig_width: width,
            orig_height: height,
        }
    }

    /// Resized (unpadded) dimensions inside the square
    pub fn scaled_size(&self) -> (u32, u32) {
        let w = ((self.orig_width as f32 * self.scale).round() as u32).max(1);
        let h = ((self.orig_height as f32 * self.scale).round() as u32).max(1);
        (w, h)
    }

    /// Map corner coordinates from model space back to the original image
    pub fn to_original(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        let max_x = self.orig_width as f32;
        let max_y = self.orig_height as f32;
        let unmap_x = |x: f32| ((x - self.pad_x) / self.scale).clamp(0.0, max_x);
        let unmap_y = |y: f32| ((y - self.pad_y) / self.scale).clamp(0.0, max_y);

        BoundingBox {
            x1: unmap_x(x1),
            y1: unmap_y(y1),
            x2: unmap_x(x2),
            y2: unmap_y(y2),
        }
    }
}

/// Preprocess an image for YOLOv8
///
/// Steps:
/// 1. Letterbox to YOLO_INPUT_SIZE, padding with gray (114)
/// 2. Convert to RGB
/// 3. Scale pixels to [0, 1]
/// 4. Convert to NCHW tensor format [1, 3, 640, 640]
pub fn preprocess_for_yolo(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();
    let letterbox = Letterbox::fit(orig_w, orig_h, YOLO_INPUT_SIZE);
    let padded = letterbox_image(image, &letterbox, YOLO_INPUT_SIZE);

    let size = YOLO_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in padded.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, letterbox)
}

/// Resize with aspect ratio preservation and pad to a `target` square
pub fn letterbox_image(image: &DynamicImage, letterbox: &Letterbox, target: u32) -> RgbImage {
    let mut output = RgbImage::from_pixel(target, target, Rgb([PAD_VALUE; 3]));

    if letterbox.orig_width == 0 || letterbox.orig_height == 0 {
        return output;
    }

    let (new_w, new_h) = letterbox.scaled_size();
    let resized = image
        .resize_exact(new_w, new_h, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let offset_x = letterbox.pad_x as u32;
    let offset_y = letterbox.pad_y as u32;
    for (x, y, pixel) in resized.enumerate_pixels() {
        if x + offset_x < target && y + offset_y < target {
            output.put_pixel(x + offset_x, y + offset_y, *pixel);
        }
    }

    output
}
