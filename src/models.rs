// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::ToneError;

/// A face region reported by the face locator. Coordinates are in image pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceCandidate {
    pub top_left: [f32; 2],
    pub bottom_right: [f32; 2],
    #[serde(default)]
    pub landmarks: Vec<[f32; 2]>,
    pub probability: f32,
}

impl FaceCandidate {
    pub fn width(&self) -> f32 {
        (self.bottom_right[0] - self.top_left[0]).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.bottom_right[1] - self.top_left[1]).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// Sampled skin tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSample {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn from_hex(hex: &str) -> Result<Self, ToneError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ToneError::Validation(format!("Invalid hex color: {}", hex)));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ToneError::Validation(format!("Invalid hex color: {}", hex)))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Brightness and warmth derived from a [`ColorSample`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneSignals {
    /// Mean of the three channels, 0..=255.
    pub brightness: f32,
    /// Red minus blue, -255..=255.
    pub warmth: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Undertone is fixed by the season and never computed on its own.
    pub fn undertone(self) -> Undertone {
        match self {
            Season::Spring | Season::Autumn => Undertone::Warm,
            Season::Summer | Season::Winter => Undertone::Cool,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Undertone {
    Warm,
    Cool,
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Undertone::Warm => "Warm",
            Undertone::Cool => "Cool",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color_name: String,
    pub hex_code: String,
    pub suitable: bool,
}

/// An assembled analysis that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDraft {
    pub user_id: String,
    pub image_reference: String,
    pub skin_tone: ColorSample,
    pub season: Season,
    pub undertone: Undertone,
    pub recommended_colors: Vec<PaletteEntry>,
    pub colors_to_avoid: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub user_id: String,
    pub image_reference: String,
    pub skin_tone: ColorSample,
    pub season: Season,
    pub undertone: Undertone,
    pub recommended_colors: Vec<PaletteEntry>,
    pub colors_to_avoid: Vec<PaletteEntry>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Finalizes a draft with the identity and storage reference assigned on save.
    pub fn from_draft(
        draft: AnalysisDraft,
        id: Uuid,
        image_reference: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            image_reference,
            skin_tone: draft.skin_tone,
            season: draft.season,
            undertone: draft.undertone,
            recommended_colors: draft.recommended_colors,
            colors_to_avoid: draft.colors_to_avoid,
            created_at,
        }
    }
}

/// Outcome of running the pipeline on one image, before anything is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub faces_detected: usize,
    pub skin_tone: ColorSample,
    pub skin_tone_hex: String,
    pub season: Season,
    pub undertone: Undertone,
    pub recommended_colors: Vec<PaletteEntry>,
    pub colors_to_avoid: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAnalysisRequest {
    pub image: String,
    /// `#RRGGBB`, as returned in [`AnalysisReport::skin_tone_hex`].
    pub skin_tone: String,
    pub season: Season,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undertone_follows_season() {
        assert_eq!(Season::Spring.undertone(), Undertone::Warm);
        assert_eq!(Season::Autumn.undertone(), Undertone::Warm);
        assert_eq!(Season::Summer.undertone(), Undertone::Cool);
        assert_eq!(Season::Winter.undertone(), Undertone::Cool);
    }

    #[test]
    fn hex_formatting_is_uppercase_and_padded() {
        assert_eq!(ColorSample::new(255, 203, 164).hex(), "#FFCBA4");
        assert_eq!(ColorSample::new(0, 10, 1).hex(), "#000A01");
    }

    #[test]
    fn parses_hex_with_or_without_hash() {
        assert_eq!(
            ColorSample::from_hex("#ffcba4").unwrap(),
            ColorSample::new(255, 203, 164)
        );
        assert_eq!(
            ColorSample::from_hex("646464").unwrap(),
            ColorSample::new(100, 100, 100)
        );
        assert!(ColorSample::from_hex("#12345").is_err());
        assert!(ColorSample::from_hex("#GG0000").is_err());
    }

    #[test]
    fn candidate_geometry() {
        let face = FaceCandidate {
            top_left: [10.0, 20.0],
            bottom_right: [60.0, 120.0],
            landmarks: vec![],
            probability: 0.8,
        };
        assert_eq!(face.width(), 50.0);
        assert_eq!(face.height(), 100.0);
        assert_eq!(face.area(), 5000.0);
    }

    #[test]
    fn candidate_reads_detector_wire_format() {
        let json = r#"{"topLeft":[1,2],"bottomRight":[3,4],"probability":0.5}"#;
        let face: FaceCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(face.top_left, [1.0, 2.0]);
        assert!(face.landmarks.is_empty());
    }
}
