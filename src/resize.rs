//! Frame size normalization.
//!
//! Every frame appended to the output container must have the configured
//! target dimensions. [`normalize`] enforces that: frames already at the
//! target size pass through untouched (no resampling, no quality loss),
//! everything else is resampled with a high-quality filter.

use image::{DynamicImage, imageops::FilterType};

/// Bring a frame to exactly `target` pixels.
///
/// If the frame already matches the target size it is returned unchanged,
/// byte for byte. Otherwise it is resampled with Lanczos3 into a new buffer
/// of exactly the target dimensions, keeping the source colour model.
pub fn normalize(frame: DynamicImage, target: (u32, u32)) -> DynamicImage {
    let (target_width, target_height) = target;
    if (frame.width(), frame.height()) == target {
        return frame;
    }

    log::trace!(
        "Resampling frame {}x{} -> {}x{}",
        frame.width(),
        frame.height(),
        target_width,
        target_height,
    );
    frame.resize_exact(target_width, target_height, FilterType::Lanczos3)
}
