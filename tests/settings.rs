//! GifSettings builder tests.

use std::time::Duration;

use regif::{Converter, GifSettings};

#[test]
fn defaults() {
    let settings = GifSettings::new();
    assert_eq!(settings.target_size, None);
    assert_eq!(settings.frame_count, 10);
    assert_eq!(settings.frame_delay, Duration::from_millis(100));
    assert_eq!(settings.loop_count, 0, "default is infinite looping");
}

#[test]
fn builders_override_each_field() {
    let settings = GifSettings::new()
        .with_target_size(480, 270)
        .with_frame_count(32)
        .with_frame_delay(Duration::from_millis(60))
        .with_loop_count(3);

    assert_eq!(settings.target_size, Some((480, 270)));
    assert_eq!(settings.frame_count, 32);
    assert_eq!(settings.frame_delay, Duration::from_millis(60));
    assert_eq!(settings.loop_count, 3);
}

#[test]
fn converter_exposes_its_settings() {
    let settings = GifSettings::new().with_frame_count(7);
    let converter = Converter::new(settings.clone());
    assert_eq!(converter.settings().frame_count, settings.frame_count);
}

#[test]
fn default_trait_matches_new() {
    let from_default = GifSettings::default();
    let from_new = GifSettings::new();
    assert_eq!(from_default.frame_count, from_new.frame_count);
    assert_eq!(from_default.frame_delay, from_new.frame_delay);
    assert_eq!(from_default.loop_count, from_new.loop_count);
    assert_eq!(from_default.target_size, from_new.target_size);
}
