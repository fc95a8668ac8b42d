//! Rational time points and even-spacing scheduling.
//!
//! Offsets into a video's timeline are represented as [`TimePoint`] values, a
//! rational count of ticks at a fixed resolution of
//! [`TICKS_PER_SECOND`] ticks per second. Keeping time rational avoids the
//! floating-point drift that would otherwise accumulate when many evenly
//! spaced offsets are derived from a single duration.
//!
//! [`schedule`] produces the sampling plan for a conversion: `N` time points
//! evenly distributed over `[0, duration)`.

use crate::error::RegifError;

/// Internal timeline resolution, in ticks per second.
pub const TICKS_PER_SECOND: i32 = 600;

/// Matching tolerance, in seconds, applied on each side of a requested time
/// point when comparing it against actual decoded frame timestamps.
pub const SEEK_TOLERANCE: f64 = 0.01;

/// A rational offset into a video's timeline.
///
/// Stored as `value / timescale` seconds. All time points produced by this
/// crate use a timescale of [`TICKS_PER_SECOND`]; comparisons remain exact
/// across mixed timescales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimePoint {
    value: i64,
    timescale: i32,
}

impl TimePoint {
    /// The zero offset.
    pub const ZERO: TimePoint = TimePoint {
        value: 0,
        timescale: TICKS_PER_SECOND,
    };

    /// Create a time point from a tick count at the crate's resolution.
    pub fn from_ticks(value: i64) -> Self {
        Self {
            value,
            timescale: TICKS_PER_SECOND,
        }
    }

    /// Create a time point from seconds, rounded to the nearest
    /// representable tick.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            value: (seconds * f64::from(TICKS_PER_SECOND)).round() as i64,
            timescale: TICKS_PER_SECOND,
        }
    }

    /// The offset in seconds.
    pub fn as_seconds(&self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// The raw tick count.
    pub fn ticks(&self) -> i64 {
        self.value
    }

    /// The timescale (ticks per second) of this value.
    pub fn timescale(&self) -> i32 {
        self.timescale
    }

    /// Whether this offset is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    /// Compare against another time point with a symmetric tolerance in
    /// seconds. This is the comparison used when matching scheduled offsets
    /// against actual decoded frame timestamps.
    pub fn approx_eq(&self, other: TimePoint, tolerance_seconds: f64) -> bool {
        (self.as_seconds() - other.as_seconds()).abs() <= tolerance_seconds
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimePoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Exact rational comparison: a/b <=> c/d == a*d <=> c*b.
        let left = i128::from(self.value) * i128::from(other.timescale);
        let right = i128::from(other.value) * i128::from(self.timescale);
        left.cmp(&right)
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}

/// Compute `frame_count` evenly spaced time points over `[0, duration)`.
///
/// The spacing is `duration / frame_count`: the first point is always at
/// offset 0 and the last is one increment before the end of the video, so
/// the duration itself is never sampled. Each offset is rounded to the
/// nearest representable tick.
///
/// # Errors
///
/// - [`RegifError::InvalidFrameCount`] if `frame_count` is zero.
/// - [`RegifError::EmptyDuration`] if `duration` is not positive.
///
/// # Example
///
/// ```
/// use regif::timing::{TimePoint, schedule};
///
/// let points = schedule(TimePoint::from_seconds(10.0), 5)?;
/// let seconds: Vec<f64> = points.iter().map(TimePoint::as_seconds).collect();
/// assert_eq!(seconds, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
/// # Ok::<(), regif::RegifError>(())
/// ```
pub fn schedule(duration: TimePoint, frame_count: u32) -> Result<Vec<TimePoint>, RegifError> {
    if frame_count == 0 {
        return Err(RegifError::InvalidFrameCount);
    }
    if !duration.is_positive() {
        return Err(RegifError::EmptyDuration);
    }

    let increment = duration.as_seconds() / f64::from(frame_count);
    let points = (0..frame_count)
        .map(|index| TimePoint::from_seconds(increment * f64::from(index)))
        .collect();

    log::debug!(
        "Scheduled {} time points over {} (increment {:.3}s)",
        frame_count,
        duration,
        increment,
    );

    Ok(points)
}
