//! Frame retrieval from video sources.
//!
//! This module defines the [`FrameDecoder`] trait — the narrow seam between
//! the conversion pipeline and whatever produces decoded frames — and
//! [`VideoSource`], the FFmpeg-backed implementation used for real files.
//!
//! Keeping the seam narrow means the scheduling and container-assembly logic
//! can be exercised with in-memory fake decoders, while `VideoSource` stays
//! the only place that touches the demuxer.

use std::{
    mem,
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_sys_next::{AVPacketSideDataType, av_display_rotation_get};
use image::{DynamicImage, RgbaImage};

use crate::{error::RegifError, timing::TimePoint};

/// Natural pixel size and preferred display orientation of a video track.
///
/// The rotation comes from the stream's display-matrix side data (or its
/// `rotate` metadata tag on older containers) and is expressed in degrees,
/// normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    /// Stored frame width in pixels, before orientation is applied.
    pub width: u32,
    /// Stored frame height in pixels, before orientation is applied.
    pub height: u32,
    /// Preferred display rotation in degrees.
    pub rotation: f64,
}

impl TrackGeometry {
    /// The display size of the track: the natural size with the preferred
    /// rotation applied, taking absolute values of the transformed
    /// dimensions.
    ///
    /// A 1920×1080 track with a 90° rotation displays as 1080×1920.
    pub fn oriented_size(&self) -> (u32, u32) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let oriented_width = (width * cos - height * sin).abs().round() as u32;
        let oriented_height = (width * sin + height * cos).abs().round() as u32;
        (oriented_width, oriented_height)
    }
}

/// A source of decoded video frames.
///
/// The conversion pipeline depends on this trait rather than on FFmpeg
/// directly, so custom sources and test fakes can stand in for real files.
pub trait FrameDecoder {
    /// Total duration of the source.
    fn duration(&self) -> TimePoint;

    /// Geometry of the first video track, or `None` if the source has no
    /// video track.
    fn track_geometry(&self) -> Option<TrackGeometry>;

    /// Decode the frame displayed at the requested offset.
    ///
    /// The decoder returns the frame it judges closest to `time`. A decoded
    /// frame whose timestamp falls within `[time - tolerance_before,
    /// time + tolerance_after]` is an exact-enough match and ends the search
    /// immediately. The returned image has the track's preferred orientation
    /// already applied.
    ///
    /// # Errors
    ///
    /// Any failure to produce a frame aborts the conversion that issued the
    /// request; implementations must not skip ahead on error.
    fn frame_near(
        &mut self,
        time: TimePoint,
        tolerance_before: TimePoint,
        tolerance_after: TimePoint,
    ) -> Result<DynamicImage, RegifError>;
}

/// FFmpeg-backed [`FrameDecoder`] for video files and URLs.
///
/// Opens the source once and caches its duration and track geometry. Each
/// [`frame_near`](FrameDecoder::frame_near) call seeks the container to the
/// requested offset and decodes forward until the covering frame is found.
///
/// # Example
///
/// ```no_run
/// use regif::{FrameDecoder, VideoSource};
///
/// let source = VideoSource::open("input.mp4")?;
/// println!("duration: {}", source.duration());
/// # Ok::<(), regif::RegifError>(())
/// ```
pub struct VideoSource {
    /// The opened FFmpeg input (demuxer) context.
    input: Input,
    /// Index of the best video stream, if one exists.
    stream_index: Option<usize>,
    /// Container duration, cached at open time.
    duration: TimePoint,
    /// Geometry of the best video track, cached at open time.
    geometry: Option<TrackGeometry>,
    /// Container format name, cached at open time.
    format: String,
    /// Average frame rate of the best video track, if the container knows it.
    frame_rate: Option<f64>,
    /// Path to the opened file (kept for error messages).
    path: PathBuf,
}

impl VideoSource {
    /// Open a video file for frame retrieval.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches duration and track geometry.
    ///
    /// # Errors
    ///
    /// Returns [`RegifError::FileOpen`] if the file cannot be opened or its
    /// video stream parameters cannot be read. A file without any video
    /// stream opens successfully; the missing track surfaces later as
    /// [`RegifError::NoVideoStream`] when geometry or frames are requested.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RegifError> {
        let path = path.as_ref().to_path_buf();

        ffmpeg_next::init().map_err(|error| RegifError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| RegifError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        let stream_index = input
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index());

        // Container duration is reported in AV_TIME_BASE (microseconds).
        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            TimePoint::from_seconds(duration_microseconds as f64 / 1_000_000.0)
        } else {
            TimePoint::ZERO
        };

        let format = input.format().name().to_string();

        let mut frame_rate = None;
        let geometry = match stream_index {
            Some(index) => {
                let stream = input.stream(index).ok_or(RegifError::NoVideoStream)?;

                let rate = stream.avg_frame_rate();
                if rate.denominator() != 0 && rate.numerator() != 0 {
                    frame_rate =
                        Some(f64::from(rate.numerator()) / f64::from(rate.denominator()));
                }

                let decoder_context = CodecContext::from_parameters(stream.parameters())
                    .map_err(|error| RegifError::FileOpen {
                        path: path.clone(),
                        reason: format!("Failed to read video codec parameters: {error}"),
                    })?;
                let decoder =
                    decoder_context
                        .decoder()
                        .video()
                        .map_err(|error| RegifError::FileOpen {
                            path: path.clone(),
                            reason: format!("Failed to create video decoder: {error}"),
                        })?;

                Some(TrackGeometry {
                    width: decoder.width(),
                    height: decoder.height(),
                    rotation: display_rotation(&stream),
                })
            }
            None => None,
        };

        log::debug!(
            "Opened {:?}: duration {}, geometry {:?}",
            path,
            duration,
            geometry,
        );

        Ok(Self {
            input,
            stream_index,
            duration,
            geometry,
            format,
            frame_rate,
            path,
        })
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub fn format_name(&self) -> &str {
        &self.format
    }

    /// Average frame rate of the video track, if the container reports one.
    pub fn frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    /// Apply the track's preferred rotation to a decoded frame.
    fn orient(&self, image: DynamicImage) -> DynamicImage {
        let rotation = match self.geometry {
            Some(geometry) => geometry.rotation,
            None => return image,
        };

        // Display rotations are multiples of 90 in practice; anything else
        // cannot be applied losslessly to a raster, so it is left as-is.
        match rotation.round() as i64 {
            90 => image.rotate90(),
            180 => image.rotate180(),
            270 => image.rotate270(),
            0 => image,
            other => {
                log::warn!("Ignoring non-quarter-turn display rotation of {other} degrees");
                image
            }
        }
    }
}

impl FrameDecoder for VideoSource {
    fn duration(&self) -> TimePoint {
        self.duration
    }

    fn track_geometry(&self) -> Option<TrackGeometry> {
        self.geometry
    }

    fn frame_near(
        &mut self,
        time: TimePoint,
        tolerance_before: TimePoint,
        tolerance_after: TimePoint,
    ) -> Result<DynamicImage, RegifError> {
        let stream_index = self.stream_index.ok_or(RegifError::NoVideoStream)?;

        let requested = time.as_seconds();
        let lower = requested - tolerance_before.as_seconds();
        let upper = requested + tolerance_after.as_seconds();

        // Build a fresh decoder from the stream parameters; the demuxer is
        // about to be repositioned, so no decoder state is worth keeping.
        let (time_base, decoder_context) = {
            let stream = self
                .input
                .stream(stream_index)
                .ok_or(RegifError::NoVideoStream)?;
            (
                stream.time_base(),
                CodecContext::from_parameters(stream.parameters())?,
            )
        };
        let mut decoder = decoder_context.decoder().video()?;

        // Seek the container backward to the nearest keyframe at or before
        // the requested offset, in AV_TIME_BASE (microseconds).
        let seek_target = (requested * 1_000_000.0) as i64;
        self.input
            .seek(seek_target, ..seek_target)
            .map_err(|error| RegifError::DecodeError {
                seconds: requested,
                reason: format!("seek failed: {error}"),
            })?;

        let pts_to_seconds = |pts: i64| {
            pts as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
        };

        let mut decoded = VideoFrame::empty();
        let mut best: Option<(f64, VideoFrame)> = None;

        // Decode forward from the keyframe. Frames arrive in display order,
        // so once a frame lands at or past the requested offset (or inside
        // the tolerance window) the nearest candidate is decided.
        let consider =
            |seconds: f64, frame: VideoFrame, best: &mut Option<(f64, VideoFrame)>| -> bool {
                let improves = match best {
                    None => true,
                    Some((held, _)) => (seconds - requested).abs() < (held - requested).abs(),
                };
                if improves {
                    *best = Some((seconds, frame));
                }
                (improves && seconds >= lower && seconds <= upper) || seconds >= requested
            };

        'demux: for (stream, packet) in self.input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            while decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(0);
                let seconds = pts_to_seconds(pts);
                let frame = mem::replace(&mut decoded, VideoFrame::empty());
                if consider(seconds, frame, &mut best) {
                    break 'demux;
                }
            }
        }

        // Drain the decoder in case the stream ended before the target.
        if best.as_ref().is_none_or(|(seconds, _)| *seconds < requested) {
            decoder.send_eof()?;
            while decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(0);
                let seconds = pts_to_seconds(pts);
                let frame = mem::replace(&mut decoded, VideoFrame::empty());
                if consider(seconds, frame, &mut best) {
                    break;
                }
            }
        }

        let (actual, frame) = best.ok_or_else(|| RegifError::DecodeError {
            seconds: requested,
            reason: "no decodable frame at or near the requested offset".into(),
        })?;

        if !time.approx_eq(TimePoint::from_seconds(actual), crate::timing::SEEK_TOLERANCE) {
            log::trace!(
                "Requested {} resolved to frame at {actual:.3}s",
                time,
            );
        }

        let image = frame_to_image(&frame, requested)?;
        Ok(self.orient(image))
    }
}

/// Convert a decoded FFmpeg frame to an RGBA [`DynamicImage`] at its native
/// resolution. Resampling to the output size happens later, so a frame that
/// already matches the target passes through the pipeline byte-for-byte.
fn frame_to_image(frame: &VideoFrame, requested: f64) -> Result<DynamicImage, RegifError> {
    let width = frame.width();
    let height = frame.height();

    let mut scaler = ScalingContext::get(
        frame.format(),
        width,
        height,
        Pixel::RGBA,
        width,
        height,
        ScalingFlags::BILINEAR,
    )?;

    let mut rgba_frame = VideoFrame::empty();
    scaler.run(frame, &mut rgba_frame)?;

    let buffer = strip_stride(&rgba_frame, width, height);
    let image = RgbaImage::from_raw(width, height, buffer).ok_or_else(|| {
        RegifError::DecodeError {
            seconds: requested,
            reason: "decoded frame buffer has unexpected length".into(),
        }
    })?;

    Ok(DynamicImage::ImageRgba8(image))
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGBA
/// buffer. FFmpeg frames frequently carry per-row padding (stride >
/// width × 4); this strips that padding so the result can be passed directly
/// to [`RgbaImage::from_raw`].
fn strip_stride(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let expected_stride = (width as usize) * 4;
    let data = frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Read the preferred display rotation of a stream, in degrees normalized to
/// `[0, 360)`.
///
/// Checks the display-matrix side data first, then falls back to the legacy
/// `rotate` metadata tag written by older muxers. The side data lives behind
/// the codec parameters, which the safe wrapper does not expose, so it is
/// read through the sys bindings.
fn display_rotation(stream: &ffmpeg_next::Stream<'_>) -> f64 {
    // SAFETY: the stream pointer is valid for the lifetime of `stream`, and
    // coded_side_data holds nb_coded_side_data entries whose display-matrix
    // payload is nine packed i32 values.
    unsafe {
        let parameters = (*stream.as_ptr()).codecpar;
        if !parameters.is_null() {
            let count = (*parameters).nb_coded_side_data.max(0) as usize;
            for index in 0..count {
                let entry = (*parameters).coded_side_data.add(index);
                if (*entry).type_ != AVPacketSideDataType::AV_PKT_DATA_DISPLAYMATRIX
                    || (*entry).data.is_null()
                    || (*entry).size < 9 * mem::size_of::<i32>()
                {
                    continue;
                }
                let rotation = av_display_rotation_get((*entry).data.cast::<i32>());
                if rotation.is_nan() {
                    continue;
                }
                // av_display_rotation_get reports counterclockwise degrees;
                // the track's preferred transform is the clockwise negation.
                return (-rotation).rem_euclid(360.0);
            }
        }
    }

    stream
        .metadata()
        .get("rotate")
        .and_then(|value| value.parse::<f64>().ok())
        .map(|degrees| degrees.rem_euclid(360.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::TrackGeometry;

    #[test]
    fn oriented_size_unrotated() {
        let geometry = TrackGeometry {
            width: 1920,
            height: 1080,
            rotation: 0.0,
        };
        assert_eq!(geometry.oriented_size(), (1920, 1080));
    }

    #[test]
    fn oriented_size_quarter_turn_swaps_dimensions() {
        let geometry = TrackGeometry {
            width: 1920,
            height: 1080,
            rotation: 90.0,
        };
        assert_eq!(geometry.oriented_size(), (1080, 1920));
    }

    #[test]
    fn oriented_size_half_turn_keeps_dimensions() {
        let geometry = TrackGeometry {
            width: 640,
            height: 480,
            rotation: 180.0,
        };
        assert_eq!(geometry.oriented_size(), (640, 480));
    }

    #[test]
    fn oriented_size_three_quarter_turn_swaps_dimensions() {
        let geometry = TrackGeometry {
            width: 1280,
            height: 720,
            rotation: 270.0,
        };
        assert_eq!(geometry.oriented_size(), (720, 1280));
    }
}
