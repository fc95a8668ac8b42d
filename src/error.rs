//! Error types for the `regif` crate.
//!
//! This module defines [`RegifError`], the unified error type returned by all
//! fallible operations in the crate. Any error aborts the conversion that
//! produced it — there is no partial success and no automatic retry.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `regif` operations.
///
/// Every public method that can fail returns `Result<T, RegifError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site. All variants are terminal for the
/// conversion that raised them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegifError {
    /// A frame count of zero was requested.
    #[error("Frame count must be at least 1")]
    InvalidFrameCount,

    /// The source reports a zero or negative duration, so no time points
    /// can be scheduled over it.
    #[error("Source duration must be positive")]
    EmptyDuration,

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The resolved output size has a zero dimension.
    #[error("Invalid target size: {width}x{height}")]
    InvalidTargetSize {
        /// Resolved output width.
        width: u32,
        /// Resolved output height.
        height: u32,
    },

    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// No frame could be decoded at or near a requested time point.
    #[error("Failed to decode frame near {seconds:.3}s: {reason}")]
    DecodeError {
        /// The requested offset, in seconds.
        seconds: f64,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// The GIF container could not be created or a frame could not be
    /// written to it.
    #[error("GIF encoding error: {0}")]
    EncodeError(String),

    /// The container was finalized with fewer or more frames than it was
    /// declared for at creation.
    #[error("Output declared for {declared} frames but {appended} were appended")]
    FrameCountMismatch {
        /// Frame count declared when the writer was created.
        declared: u32,
        /// Frames actually appended before finalize.
        appended: u32,
    },

    /// An I/O error occurred while writing the output file.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during frame conversion.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for RegifError {
    fn from(error: FfmpegError) -> Self {
        RegifError::FfmpegError(error.to_string())
    }
}
