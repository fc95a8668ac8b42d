//! GIF container structure tests.
//!
//! These write real GIF files to a temp directory and decode them back with
//! the `gif` crate to verify frame count, per-frame delay, and the
//! loop-count application extension. No media fixtures required.

use std::{fs::File, time::Duration};

use image::{DynamicImage, Rgba, RgbaImage};
use regif::{ContainerWriter, GifWriter, RegifError};

fn solid_frame(width: u32, height: u32, shade: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([shade, shade / 2, 255 - shade, 255]),
    ))
}

fn decode_frames(path: &std::path::Path) -> (usize, Vec<u16>) {
    let file = File::open(path).expect("Failed to open GIF");
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(file).expect("Failed to read GIF header");

    let mut count = 0;
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().expect("Failed to read frame") {
        count += 1;
        delays.push(frame.delay);
    }
    (count, delays)
}

#[test]
fn writer_produces_decodable_animation() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("animation.gif");

    let mut writer =
        GifWriter::create(&path, (16, 12), 3, Duration::from_millis(120), 0).expect("create failed");
    for shade in [0u8, 100, 200] {
        writer.append(&solid_frame(16, 12, shade)).expect("append failed");
    }
    let written = writer.finalize().expect("finalize failed");
    assert_eq!(written, path);

    let (count, delays) = decode_frames(&path);
    assert_eq!(count, 3);
    // 120 ms rounds to 12 hundredths of a second.
    assert_eq!(delays, vec![12, 12, 12]);

    // Infinite looping is signalled by the Netscape application extension
    // with a loop field of zero.
    let bytes = std::fs::read(&path).expect("Failed to read GIF bytes");
    let marker = b"NETSCAPE2.0";
    let at = bytes
        .windows(marker.len())
        .position(|window| window == marker)
        .expect("loop-count extension missing");
    let sub_block = &bytes[at + marker.len()..at + marker.len() + 4];
    assert_eq!(sub_block, &[0x03, 0x01, 0x00, 0x00]);
}

#[test]
fn finite_loop_count_is_written() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("finite.gif");

    let mut writer =
        GifWriter::create(&path, (8, 8), 1, Duration::from_millis(100), 2).expect("create failed");
    writer.append(&solid_frame(8, 8, 50)).expect("append failed");
    writer.finalize().expect("finalize failed");

    let bytes = std::fs::read(&path).expect("Failed to read GIF bytes");
    let marker = b"NETSCAPE2.0";
    let at = bytes
        .windows(marker.len())
        .position(|window| window == marker)
        .expect("loop-count extension missing");
    let sub_block = &bytes[at + marker.len()..at + marker.len() + 4];
    assert_eq!(sub_block, &[0x03, 0x01, 0x02, 0x00]);
}

#[test]
fn delay_rounds_to_gif_resolution() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("delay.gif");

    // 123 ms is 12.3 hundredths; the GIF delay field rounds to 12.
    let mut writer =
        GifWriter::create(&path, (8, 8), 1, Duration::from_millis(123), 0).expect("create failed");
    writer.append(&solid_frame(8, 8, 10)).expect("append failed");
    writer.finalize().expect("finalize failed");

    let (_, delays) = decode_frames(&path);
    assert_eq!(delays, vec![12]);
}

#[test]
fn finalize_rejects_missing_frames() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("short.gif");

    let mut writer =
        GifWriter::create(&path, (8, 8), 2, Duration::from_millis(100), 0).expect("create failed");
    writer.append(&solid_frame(8, 8, 0)).expect("append failed");

    let result = writer.finalize();
    assert!(matches!(
        result,
        Err(RegifError::FrameCountMismatch {
            declared: 2,
            appended: 1,
        })
    ));
}

#[test]
fn append_rejects_mismatched_dimensions() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mismatch.gif");

    let mut writer =
        GifWriter::create(&path, (16, 12), 1, Duration::from_millis(100), 0).expect("create failed");
    let result = writer.append(&solid_frame(8, 8, 0));
    assert!(matches!(result, Err(RegifError::EncodeError(_))));
    assert_eq!(writer.appended(), 0);
}

#[test]
fn rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("rerun.gif");

    let mut writer =
        GifWriter::create(&path, (8, 8), 3, Duration::from_millis(100), 0).expect("create failed");
    for shade in [0u8, 80, 160] {
        writer.append(&solid_frame(8, 8, shade)).expect("append failed");
    }
    writer.finalize().expect("finalize failed");

    // Second run to the same path with fewer frames: the file is replaced,
    // not appended to.
    let mut writer =
        GifWriter::create(&path, (8, 8), 2, Duration::from_millis(100), 0).expect("create failed");
    for shade in [20u8, 220] {
        writer.append(&solid_frame(8, 8, shade)).expect("append failed");
    }
    writer.finalize().expect("finalize failed");

    let (count, _) = decode_frames(&path);
    assert_eq!(count, 2);
}

#[test]
fn identical_reruns_produce_identical_structure() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("idempotent.gif");

    let write_once = || {
        let mut writer = GifWriter::create(&path, (8, 8), 2, Duration::from_millis(150), 1)
            .expect("create failed");
        writer.append(&solid_frame(8, 8, 30)).expect("append failed");
        writer.append(&solid_frame(8, 8, 90)).expect("append failed");
        writer.finalize().expect("finalize failed");
        std::fs::read(&path).expect("Failed to read GIF bytes")
    };

    let first = write_once();
    let second = write_once();
    assert_eq!(first, second, "same inputs must produce the same bytes");
}

#[test]
fn zero_dimension_is_rejected_at_create() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("zero.gif");

    let result = GifWriter::create(&path, (0, 8), 1, Duration::from_millis(100), 0);
    assert!(matches!(
        result,
        Err(RegifError::InvalidTargetSize { width: 0, height: 8 })
    ));
    assert!(!path.exists(), "rejected create must not touch the destination");
}

#[test]
fn zero_frame_count_is_rejected_at_create() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("zero_frames.gif");

    let result = GifWriter::create(&path, (8, 8), 0, Duration::from_millis(100), 0);
    assert!(matches!(result, Err(RegifError::InvalidFrameCount)));
    assert!(!path.exists());
}

#[test]
fn oversized_dimensions_are_rejected_at_create() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("huge.gif");

    // The GIF logical screen is limited to 65535 pixels per side.
    let result = GifWriter::create(&path, (70_000, 8), 1, Duration::from_millis(100), 0);
    assert!(matches!(result, Err(RegifError::InvalidTargetSize { .. })));
}
