//! Deterministic preprocessing for classifier inputs.
//!
//! The pipeline mirrors the standard ImageNet evaluation transform: resize
//! the short side to 256, center-crop 224x224, normalize per channel, and
//! lay the result out CHW.

use image::{imageops::FilterType, DynamicImage};

use crate::{CROP_SIZE, RESIZE_SIZE};

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize an image so its short side equals `target`, preserving aspect ratio
pub fn resize_short_side(image: &DynamicImage, target: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());

    let (new_width, new_height) = if width <= height {
        let scaled = (height as u64 * target as u64) / width as u64;
        (target, scaled.max(target as u64) as u32)
    } else {
        let scaled = (width as u64 * target as u64) / height as u64;
        (scaled.max(target as u64) as u32, target)
    };

    image.resize_exact(new_width, new_height, FilterType::Triangle)
}

/// Crop a centered square of `size` pixels
pub fn center_crop(image: &DynamicImage, size: u32) -> DynamicImage {
    let x = image.width().saturating_sub(size) / 2;
    let y = image.height().saturating_sub(size) / 2;
    image.crop_imm(x, y, size.min(image.width()), size.min(image.height()))
}

/// Normalize an RGB image to a flat CHW float vector
pub fn normalize_chw(image: &DynamicImage) -> Vec<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let num_pixels = (width * height) as usize;

    let mut normalized = vec![0.0f32; 3 * num_pixels];

    for (i, pixel) in rgb.pixels().enumerate() {
        let r = (pixel[0] as f32 / 255.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let g = (pixel[1] as f32 / 255.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        let b = (pixel[2] as f32 / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];

        // CHW layout: all R values, then all G values, then all B values
        normalized[i] = r;
        normalized[num_pixels + i] = g;
        normalized[2 * num_pixels + i] = b;
    }

    normalized
}

/// Full evaluation transform: resize, crop, normalize.
///
/// Returns `3 * CROP_SIZE * CROP_SIZE` floats in CHW order.
pub fn preprocess(image: &DynamicImage) -> Vec<f32> {
    let resized = resize_short_side(image, RESIZE_SIZE);
    let cropped = center_crop(&resized, CROP_SIZE);
    normalize_chw(&cropped)
}
