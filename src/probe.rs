//! Lightweight video file probing.
//!
//! [`SourceProbe`] extracts the metadata a conversion would use — duration,
//! container format, track geometry, frame rate — without keeping the
//! demuxer open. Useful for inspecting a file before deciding how to sample
//! it, or for listing many files cheaply.
//!
//! For actual frame retrieval, use [`VideoSource::open`](crate::VideoSource)
//! instead.

use std::path::Path;

use crate::decode::{FrameDecoder, TrackGeometry, VideoSource};
use crate::error::RegifError;
use crate::timing::TimePoint;

/// Metadata snapshot for a video file.
///
/// Owned and fully independent of any file handle.
#[derive(Debug, Clone)]
#[must_use]
pub struct SourceInfo {
    /// Total duration of the container.
    pub duration: TimePoint,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
    /// Geometry of the best video track, if one exists.
    pub geometry: Option<TrackGeometry>,
    /// Average frame rate of the video track, if the container reports one.
    pub frame_rate: Option<f64>,
}

impl SourceInfo {
    /// The display size of the video track (natural size with orientation
    /// applied), if the file has one.
    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.geometry.map(|geometry| geometry.oriented_size())
    }
}

/// Lightweight video file probe.
///
/// # Example
///
/// ```no_run
/// use regif::SourceProbe;
///
/// let info = SourceProbe::probe("input.mp4")?;
/// println!("duration: {}, format: {}", info.duration, info.format);
/// if let Some((width, height)) = info.display_size() {
///     println!("displays at {width}x{height}");
/// }
/// # Ok::<(), regif::RegifError>(())
/// ```
pub struct SourceProbe;

impl SourceProbe {
    /// Probe a video file and return its metadata.
    ///
    /// Opens the file, reads the cached metadata, and closes the demuxer
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`RegifError::FileOpen`] if the file cannot be opened or
    /// recognised as a media file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<SourceInfo, RegifError> {
        let source = VideoSource::open(path)?;
        Ok(SourceInfo {
            duration: source.duration(),
            format: source.format_name().to_string(),
            geometry: source.track_geometry(),
            frame_rate: source.frame_rate(),
        })
    }

    /// Probe multiple video files.
    ///
    /// Files that cannot be probed produce an `Err` entry in the result
    /// vector rather than aborting the entire batch.
    pub fn probe_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<SourceInfo, RegifError>> {
        paths.iter().map(Self::probe).collect()
    }
}
