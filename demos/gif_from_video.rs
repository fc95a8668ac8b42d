//! Convert a video into an animated GIF with default even spacing.
//!
//! Usage: `cargo run --example gif_from_video -- path/to/video.mp4`

use std::time::Duration;

use regif::{GifSettings, RegifError, SourceProbe};

fn main() -> Result<(), RegifError> {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: gif_from_video <video_path>");

    let info = SourceProbe::probe(&path)?;
    println!("Input: {} ({})", info.duration, info.format);
    if let Some((width, height)) = info.display_size() {
        println!("Displays at {width}x{height}");
    }

    let settings = GifSettings::new()
        .with_frame_count(16)
        .with_frame_delay(Duration::from_millis(120));

    let output = regif::convert(&path, "output.gif", &settings)?;
    println!("GIF saved to {}", output.display());

    Ok(())
}
