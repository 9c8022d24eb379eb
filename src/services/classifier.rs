// src/services/classifier.rs
use crate::models::{ColorSample, Season, ToneSignals, Undertone};

/// Warmth strictly above this is warm.
pub const WARMTH_THRESHOLD: i16 = 15;
/// Brightness strictly above this is light.
pub const BRIGHTNESS_THRESHOLD: f32 = 150.0;

pub fn signals(sample: ColorSample) -> ToneSignals {
    let sum = u16::from(sample.r) + u16::from(sample.g) + u16::from(sample.b);
    ToneSignals {
        brightness: f32::from(sum) / 3.0,
        warmth: i16::from(sample.r) - i16::from(sample.b),
    }
}

pub fn season_for(signals: ToneSignals) -> Season {
    let is_light = signals.brightness > BRIGHTNESS_THRESHOLD;
    let is_warm = signals.warmth > WARMTH_THRESHOLD;

    match (is_warm, is_light) {
        (true, true) => Season::Spring,
        (false, true) => Season::Summer,
        (true, false) => Season::Autumn,
        (false, false) => Season::Winter,
    }
}

pub fn classify(sample: ColorSample) -> (Season, Undertone) {
    let season = season_for(signals(sample));
    (season, season.undertone())
}
