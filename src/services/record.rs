// src/services/record.rs
use crate::errors::ToneError;
use crate::models::{AnalysisDraft, ColorSample, PaletteEntry, Season, Undertone};
use crate::services::palette;

pub struct AnalysisRecordBuilder;

impl AnalysisRecordBuilder {
    /// Assembles an unsaved record. The palette is split on `suitable`; the
    /// undertone must be the one implied by `season`.
    pub fn build(
        user_id: &str,
        image_reference: &str,
        sample: ColorSample,
        season: Season,
        undertone: Undertone,
        palette_entries: Vec<PaletteEntry>,
    ) -> Result<AnalysisDraft, ToneError> {
        if user_id.trim().is_empty() {
            return Err(ToneError::Validation("user_id must not be empty".to_string()));
        }
        if undertone != season.undertone() {
            return Err(ToneError::Validation(format!(
                "{} undertone does not match {} season",
                undertone, season
            )));
        }

        let (recommended_colors, colors_to_avoid) = palette::partition(palette_entries);

        Ok(AnalysisDraft {
            user_id: user_id.to_string(),
            image_reference: image_reference.to_string(),
            skin_tone: sample,
            season,
            undertone,
            recommended_colors,
            colors_to_avoid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_palette() {
        let draft = AnalysisRecordBuilder::build(
            "user-1",
            "inline",
            ColorSample::new(255, 203, 164),
            Season::Spring,
            Undertone::Warm,
            palette::curate(Season::Spring),
        )
        .unwrap();

        assert_eq!(draft.recommended_colors.len(), 4);
        assert_eq!(draft.recommended_colors[0].color_name, "Peach");
        assert_eq!(draft.colors_to_avoid[0].color_name, "Navy Blue");
        assert_eq!(draft.colors_to_avoid[0].hex_code, "#000080");
    }

    #[test]
    fn rejects_mismatched_undertone() {
        let result = AnalysisRecordBuilder::build(
            "user-1",
            "inline",
            ColorSample::new(0, 0, 0),
            Season::Winter,
            Undertone::Warm,
            palette::curate(Season::Winter),
        );
        assert!(matches!(result, Err(ToneError::Validation(_))));
    }

    #[test]
    fn rejects_blank_user() {
        let result = AnalysisRecordBuilder::build(
            "  ",
            "inline",
            ColorSample::new(0, 0, 0),
            Season::Winter,
            Undertone::Cool,
            palette::curate(Season::Winter),
        );
        assert!(matches!(result, Err(ToneError::Validation(_))));
    }
}
