//! # regif
//!
//! Turn videos into animated GIFs by sampling evenly spaced frames.
//!
//! `regif` samples `N` frames at evenly distributed time points across a
//! video's duration, optionally rescales each frame to a target size, and
//! assembles the sequence into a GIF89a file with a configurable loop count
//! and per-frame delay. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; GIF
//! assembly by the [`gif`](https://crates.io/crates/gif) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use regif::GifSettings;
//!
//! let gif = regif::convert("input.mp4", "output.gif", &GifSettings::new())?;
//! println!("wrote {}", gif.display());
//! # Ok::<(), regif::RegifError>(())
//! ```
//!
//! ### Tuning the output
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use regif::GifSettings;
//!
//! let settings = GifSettings::new()
//!     .with_target_size(480, 270)
//!     .with_frame_count(24)
//!     .with_frame_delay(Duration::from_millis(80))
//!     .with_loop_count(0); // loop forever
//!
//! regif::convert("input.mp4", "output.gif", &settings)?;
//! # Ok::<(), regif::RegifError>(())
//! ```
//!
//! ### Custom sampling
//!
//! Advanced callers can bypass the even-spacing scheduler and supply their
//! own time points via [`Converter::convert_at`], together with any
//! [`FrameDecoder`] and [`ContainerWriter`] implementation:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use regif::{Converter, GifSettings, GifWriter, TimePoint, VideoSource};
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! let points: Vec<TimePoint> = [0.0, 0.5, 1.5, 3.5]
//!     .iter()
//!     .map(|&seconds| TimePoint::from_seconds(seconds))
//!     .collect();
//!
//! let writer = GifWriter::create(
//!     "output.gif",
//!     (320, 240),
//!     points.len() as u32,
//!     Duration::from_millis(250),
//!     0,
//! )?;
//!
//! Converter::new(GifSettings::new()).convert_at(&mut source, writer, &points, (320, 240))?;
//! # Ok::<(), regif::RegifError>(())
//! ```
//!
//! ## Behaviour
//!
//! - **Even spacing** — `N` frames over duration `D` are sampled at
//!   `0, D/N, 2·D/N, …`: one frame at the start, none at the very end.
//!   Offsets are rational ([`TimePoint`], 600 ticks per second), not
//!   floats, so spacing does not drift over long videos.
//! - **Size inference** — when no explicit size is set, the output size is
//!   the video track's natural size with its preferred display orientation
//!   applied, so rotated phone footage comes out upright.
//! - **Resize only when needed** — frames already at the target size are
//!   appended untouched; everything else is resampled with Lanczos3.
//! - **All-or-nothing** — any failure (open, decode, append, finalize)
//!   aborts the conversion and deletes the partial output file.
//! - **Bounded memory** — one frame in flight at a time, regardless of
//!   frame count.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system for
//! decoding. GIF encoding is pure Rust.

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod probe;
pub mod progress;
pub mod resize;
pub mod timing;

pub use convert::{Converter, GifSettings, convert, convert_with_size};
pub use decode::{FrameDecoder, TrackGeometry, VideoSource};
pub use encode::{ContainerWriter, GifWriter};
pub use error::RegifError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use probe::{SourceInfo, SourceProbe};
pub use progress::{ProgressCallback, ProgressInfo};
pub use timing::{SEEK_TOLERANCE, TICKS_PER_SECOND, TimePoint, schedule};
