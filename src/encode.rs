//! Animated-image container assembly.
//!
//! This module defines the [`ContainerWriter`] trait — the narrow seam
//! between the conversion pipeline and the container encoder — and
//! [`GifWriter`], the `gif`-crate implementation that writes GIF89a files
//! with a global loop-count extension and per-frame delay blocks.
//!
//! A writer is created for an exact number of frames. Appending fewer or
//! more than declared makes [`finalize`](ContainerWriter::finalize) fail;
//! the output is all-or-nothing.

use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use gif::{Encoder, Frame, Repeat};
use image::DynamicImage;

use crate::error::RegifError;

/// A sink assembling an animated-image container frame by frame.
///
/// Frames must be appended in presentation order; the writer preserves that
/// order in the output. Consuming `self` in
/// [`finalize`](ContainerWriter::finalize) guarantees no frame can be
/// appended after the container is closed.
pub trait ContainerWriter {
    /// Append the next frame.
    ///
    /// # Errors
    ///
    /// Fails if the frame's dimensions differ from the writer's configured
    /// size, or if the underlying write fails.
    fn append(&mut self, frame: &DynamicImage) -> Result<(), RegifError>;

    /// Close the container and return the location it was written to.
    ///
    /// # Errors
    ///
    /// Fails if the number of appended frames does not match the count the
    /// writer was declared for, or if flushing to storage fails.
    fn finalize(self) -> Result<PathBuf, RegifError>
    where
        Self: Sized;
}

/// [`ContainerWriter`] for animated GIF output.
///
/// Wraps a [`gif::Encoder`] over a freshly created file. Each appended frame
/// is quantized to a 256-colour palette by the `gif` crate. Creating a
/// writer truncates any existing file at the destination, so converting
/// twice to the same path overwrites rather than appends.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use image::DynamicImage;
/// use regif::{ContainerWriter, GifWriter};
///
/// let mut writer = GifWriter::create("out.gif", (320, 240), 1, Duration::from_millis(100), 0)?;
/// writer.append(&DynamicImage::new_rgba8(320, 240))?;
/// let path = writer.finalize()?;
/// # Ok::<(), regif::RegifError>(())
/// ```
pub struct GifWriter {
    encoder: Encoder<File>,
    path: PathBuf,
    width: u32,
    height: u32,
    declared: u32,
    appended: u32,
    /// Per-frame delay in the GIF delay field's units (hundredths of a second).
    delay: u16,
}

impl GifWriter {
    /// Open a GIF container writer at `path`, declared for exactly
    /// `frame_count` frames of `dimensions` pixels.
    ///
    /// `frame_delay` is each frame's display duration, rounded to the GIF
    /// delay field's resolution of 10 ms. `loop_count` follows the animation
    /// convention: 0 loops forever, any other value repeats that many times.
    ///
    /// # Errors
    ///
    /// - [`RegifError::InvalidTargetSize`] if either dimension is zero or
    ///   exceeds the format's 65535-pixel limit.
    /// - [`RegifError::InvalidFrameCount`] if `frame_count` is zero.
    /// - [`RegifError::IoError`] if the file cannot be created.
    /// - [`RegifError::EncodeError`] if the encoder rejects the header.
    pub fn create<P: AsRef<Path>>(
        path: P,
        dimensions: (u32, u32),
        frame_count: u32,
        frame_delay: Duration,
        loop_count: u16,
    ) -> Result<Self, RegifError> {
        let path = path.as_ref().to_path_buf();
        let (width, height) = dimensions;

        if width == 0 || height == 0 || width > u32::from(u16::MAX) || height > u32::from(u16::MAX)
        {
            return Err(RegifError::InvalidTargetSize { width, height });
        }
        if frame_count == 0 {
            return Err(RegifError::InvalidFrameCount);
        }

        let delay = (frame_delay.as_secs_f64() * 100.0)
            .round()
            .clamp(0.0, f64::from(u16::MAX)) as u16;

        log::debug!(
            "Creating GIF at {:?}: {}x{}, {} frames, delay {}cs, loop count {}",
            path,
            width,
            height,
            frame_count,
            delay,
            loop_count,
        );

        // From here on the destination has been truncated; a failed header
        // write must not leave a stub behind.
        let file = File::create(&path)?;
        let mut encoder = match Encoder::new(file, width as u16, height as u16, &[]) {
            Ok(encoder) => encoder,
            Err(error) => {
                let _ = std::fs::remove_file(&path);
                return Err(RegifError::EncodeError(format!(
                    "failed to create encoder: {error}"
                )));
            }
        };

        let repeat = match loop_count {
            0 => Repeat::Infinite,
            count => Repeat::Finite(count),
        };
        if let Err(error) = encoder.set_repeat(repeat) {
            drop(encoder);
            let _ = std::fs::remove_file(&path);
            return Err(RegifError::EncodeError(format!(
                "failed to set loop count: {error}"
            )));
        }

        Ok(Self {
            encoder,
            path,
            width,
            height,
            declared: frame_count,
            appended: 0,
            delay,
        })
    }

    /// Frames appended so far.
    pub fn appended(&self) -> u32 {
        self.appended
    }
}

impl ContainerWriter for GifWriter {
    fn append(&mut self, frame: &DynamicImage) -> Result<(), RegifError> {
        if (frame.width(), frame.height()) != (self.width, self.height) {
            return Err(RegifError::EncodeError(format!(
                "frame is {}x{} but the container was opened for {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height,
            )));
        }

        let mut pixels = frame.to_rgba8().into_raw();
        let mut gif_frame =
            Frame::from_rgba_speed(self.width as u16, self.height as u16, &mut pixels, 10);
        gif_frame.delay = self.delay;

        self.encoder
            .write_frame(&gif_frame)
            .map_err(|error| RegifError::EncodeError(format!("failed to write frame: {error}")))?;

        self.appended += 1;
        Ok(())
    }

    fn finalize(self) -> Result<PathBuf, RegifError> {
        if self.appended != self.declared {
            return Err(RegifError::FrameCountMismatch {
                declared: self.declared,
                appended: self.appended,
            });
        }

        // Writes the trailer and hands the file back; sync surfaces any
        // deferred storage errors while the operation can still fail loudly.
        let file = self
            .encoder
            .into_inner()
            .map_err(|error| RegifError::EncodeError(format!("failed to finish file: {error}")))?;
        file.sync_all()?;

        log::debug!("Finalized GIF at {:?} ({} frames)", self.path, self.appended);
        Ok(self.path)
    }
}
