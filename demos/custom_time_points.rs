//! Sample frames at caller-chosen offsets instead of even spacing.
//!
//! Builds a GIF that dwells on the opening second, then jumps ahead —
//! useful when the interesting content is not evenly distributed.
//!
//! Usage: `cargo run --example custom_time_points -- path/to/video.mp4`

use std::time::Duration;

use regif::{Converter, GifSettings, GifWriter, RegifError, TimePoint, VideoSource};

fn main() -> Result<(), RegifError> {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: custom_time_points <video_path>");

    let mut source = VideoSource::open(&path)?;

    // Dense sampling early, sparse later.
    let points: Vec<TimePoint> = [0.0, 0.25, 0.5, 0.75, 1.0, 2.0, 4.0, 8.0]
        .iter()
        .map(|&seconds| TimePoint::from_seconds(seconds))
        .collect();

    let target = (320, 180);
    let writer = GifWriter::create(
        "custom.gif",
        target,
        points.len() as u32,
        Duration::from_millis(250),
        0,
    )?;

    let converter = Converter::new(GifSettings::new());
    let output = converter.convert_at(&mut source, writer, &points, target)?;
    println!("GIF saved to {}", output.display());

    Ok(())
}
