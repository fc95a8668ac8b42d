//! The conversion pipeline: evenly spaced sampling into an animated GIF.
//!
//! [`Converter`] wires the pieces together: it opens a [`VideoSource`],
//! resolves the output size, schedules the time points, then runs the
//! decode → normalize → append loop and finalizes the container. The whole
//! conversion is synchronous and blocking, holds at most one frame in
//! memory, and aborts on the first error at any stage.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use regif::{GifSettings, convert};
//!
//! let settings = GifSettings::new()
//!     .with_frame_count(24)
//!     .with_frame_delay(Duration::from_millis(80));
//!
//! let gif = convert("input.mp4", "output.gif", &settings)?;
//! println!("wrote {}", gif.display());
//! # Ok::<(), regif::RegifError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    decode::{FrameDecoder, VideoSource},
    encode::{ContainerWriter, GifWriter},
    error::RegifError,
    progress::{NoOpProgress, ProgressCallback, ProgressInfo},
    resize,
    timing::{self, SEEK_TOLERANCE, TimePoint},
};

/// Settings for a GIF conversion.
///
/// All fields have defaults; override them with the `with_*` builder
/// methods.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use regif::GifSettings;
///
/// let settings = GifSettings::new()
///     .with_target_size(480, 270)
///     .with_frame_count(32)
///     .with_frame_delay(Duration::from_millis(60))
///     .with_loop_count(3);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct GifSettings {
    /// Output size in pixels. `None` derives the size from the video
    /// track's display geometry (natural size with orientation applied).
    pub target_size: Option<(u32, u32)>,
    /// Number of evenly spaced frames to sample (default: 10).
    pub frame_count: u32,
    /// Display duration of each frame (default: 100 ms). Rounded to the GIF
    /// delay field's 10 ms resolution when encoding.
    pub frame_delay: Duration,
    /// How many times the animation repeats: 0 loops forever (default),
    /// any other value repeats that many times.
    pub loop_count: u16,
}

impl Default for GifSettings {
    fn default() -> Self {
        Self {
            target_size: None,
            frame_count: 10,
            frame_delay: Duration::from_millis(100),
            loop_count: 0,
        }
    }
}

impl GifSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit output size in pixels.
    pub fn with_target_size(mut self, width: u32, height: u32) -> Self {
        self.target_size = Some((width, height));
        self
    }

    /// Set the number of evenly spaced frames to sample.
    pub fn with_frame_count(mut self, frame_count: u32) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// Set each frame's display duration.
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Set the repeat count. 0 loops forever.
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }
}

/// Runs conversions according to a [`GifSettings`].
///
/// A converter is cheap to construct and can run any number of conversions;
/// each call owns its own source, writer, and frame buffer, so conversions
/// with distinct output paths do not interfere with one another.
pub struct Converter {
    settings: GifSettings,
    progress: Arc<dyn ProgressCallback>,
}

impl Converter {
    /// Create a converter with the given settings.
    pub fn new(settings: GifSettings) -> Self {
        Self {
            settings,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Attach a progress callback, invoked once per appended frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The settings this converter runs with.
    pub fn settings(&self) -> &GifSettings {
        &self.settings
    }

    /// Convert a video file to an animated GIF at `output`.
    ///
    /// Samples [`GifSettings::frame_count`] frames at evenly spaced time
    /// points across the video's duration, scales each to the resolved
    /// output size, and writes a GIF with the configured loop count and
    /// per-frame delay. Creating the output truncates any existing file at
    /// that path, so re-running with identical inputs overwrites the
    /// previous result.
    ///
    /// On failure at any stage the partially written output file is
    /// deleted; a pre-existing file at `output` is only touched once the
    /// conversion's arguments have validated.
    ///
    /// # Errors
    ///
    /// - [`RegifError::FileOpen`] if the source cannot be opened.
    /// - [`RegifError::InvalidFrameCount`] / [`RegifError::EmptyDuration`]
    ///   if no sampling plan can be made.
    /// - [`RegifError::NoVideoStream`] / [`RegifError::InvalidTargetSize`]
    ///   if no output size can be resolved.
    /// - [`RegifError::DecodeError`] if any frame fails to decode; the
    ///   conversion aborts at the first failing frame.
    /// - [`RegifError::EncodeError`] / [`RegifError::IoError`] if the
    ///   container cannot be written or finalized.
    pub fn convert<P, Q>(&self, input: P, output: Q) -> Result<PathBuf, RegifError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        log::info!(
            "Converting {:?} -> {:?} ({} frames)",
            input,
            output,
            self.settings.frame_count,
        );

        let mut source = VideoSource::open(input)?;
        let target_size = self.target_size(&source)?;
        let time_points = timing::schedule(source.duration(), self.settings.frame_count)?;

        let writer = GifWriter::create(
            output,
            target_size,
            self.settings.frame_count,
            self.settings.frame_delay,
            self.settings.loop_count,
        )?;

        let result = self.run(&mut source, writer, &time_points, target_size);
        if result.is_err() {
            // The writer truncated the destination before the failure, so
            // whatever is there now is partial output.
            if let Err(remove_error) = fs::remove_file(output) {
                log::debug!("Could not remove partial output {output:?}: {remove_error}");
            }
        }
        result
    }

    /// Convert using an explicit, caller-supplied time-point sequence and
    /// pre-built collaborators.
    ///
    /// This is the lower-level entry point for custom sampling: the caller
    /// chooses the time points (in the order frames should appear), the
    /// decoder, and the writer. The writer must have been declared for
    /// exactly `time_points.len()` frames or finalize will fail. Unlike
    /// [`convert`](Converter::convert), no output cleanup is attempted on
    /// failure — the caller owns the destination.
    ///
    /// # Errors
    ///
    /// Same as [`convert`](Converter::convert), minus source opening.
    pub fn convert_at<D, W>(
        &self,
        decoder: &mut D,
        writer: W,
        time_points: &[TimePoint],
        target_size: (u32, u32),
    ) -> Result<PathBuf, RegifError>
    where
        D: FrameDecoder,
        W: ContainerWriter,
    {
        let (width, height) = target_size;
        if width == 0 || height == 0 {
            return Err(RegifError::InvalidTargetSize { width, height });
        }
        self.run(decoder, writer, time_points, target_size)
    }

    /// Resolve the output size for a source: the explicit
    /// [`GifSettings::target_size`] if one was set, otherwise the source's
    /// display size (natural track size with orientation applied).
    ///
    /// # Errors
    ///
    /// - [`RegifError::NoVideoStream`] if no explicit size is set and the
    ///   source has no video track to infer one from.
    /// - [`RegifError::InvalidTargetSize`] if the resolved size has a zero
    ///   dimension.
    pub fn target_size<D: FrameDecoder>(&self, decoder: &D) -> Result<(u32, u32), RegifError> {
        let (width, height) = match self.settings.target_size {
            Some(size) => size,
            None => decoder
                .track_geometry()
                .ok_or(RegifError::NoVideoStream)?
                .oriented_size(),
        };
        if width == 0 || height == 0 {
            return Err(RegifError::InvalidTargetSize { width, height });
        }
        Ok((width, height))
    }

    /// The decode → normalize → append loop, shared by both entry points.
    fn run<D, W>(
        &self,
        decoder: &mut D,
        mut writer: W,
        time_points: &[TimePoint],
        target_size: (u32, u32),
    ) -> Result<PathBuf, RegifError>
    where
        D: FrameDecoder,
        W: ContainerWriter,
    {
        let tolerance = TimePoint::from_seconds(SEEK_TOLERANCE);
        let total = time_points.len() as u32;

        for (index, &time_point) in time_points.iter().enumerate() {
            let frame = decoder.frame_near(time_point, tolerance, tolerance)?;
            let frame = resize::normalize(frame, target_size);
            writer.append(&frame)?;

            self.progress.on_frame(&ProgressInfo {
                current: index as u32 + 1,
                total,
                timestamp: time_point,
            });
        }

        writer.finalize()
    }
}

/// Convert a video file to an animated GIF.
///
/// Convenience wrapper over [`Converter::convert`]. When
/// [`GifSettings::target_size`] is unset, the output size is derived from
/// the video track's display geometry.
///
/// # Errors
///
/// See [`Converter::convert`].
pub fn convert<P, Q>(input: P, output: Q, settings: &GifSettings) -> Result<PathBuf, RegifError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Converter::new(settings.clone()).convert(input, output)
}

/// Convert a video file to an animated GIF with an explicit output size.
///
/// Convenience wrapper that overrides any size in `settings` with
/// `target_size`.
///
/// # Errors
///
/// See [`Converter::convert`].
pub fn convert_with_size<P, Q>(
    input: P,
    output: Q,
    target_size: (u32, u32),
    settings: &GifSettings,
) -> Result<PathBuf, RegifError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (width, height) = target_size;
    let settings = settings.clone().with_target_size(width, height);
    Converter::new(settings).convert(input, output)
}
