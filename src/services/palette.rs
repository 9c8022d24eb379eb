// src/services/palette.rs
use crate::models::{PaletteEntry, Season};

struct Swatch {
    name: &'static str,
    hex: &'static str,
    suitable: bool,
}

const fn wear(name: &'static str, hex: &'static str) -> Swatch {
    Swatch {
        name,
        hex,
        suitable: true,
    }
}

const fn avoid(name: &'static str, hex: &'static str) -> Swatch {
    Swatch {
        name,
        hex,
        suitable: false,
    }
}

const SPRING: [Swatch; 6] = [
    wear("Peach", "#FFCBA4"),
    wear("Coral", "#FF7F50"),
    wear("Warm Yellow", "#FFD700"),
    wear("Apple Green", "#8DB600"),
    avoid("Navy Blue", "#000080"),
    avoid("Burgundy", "#800020"),
];

const SUMMER: [Swatch; 6] = [
    wear("Lavender", "#E6E6FA"),
    wear("Powder Blue", "#B0E0E6"),
    wear("Soft Pink", "#FFB6C1"),
    wear("Periwinkle", "#CCCCFF"),
    avoid("Bright Orange", "#FF4500"),
    avoid("Olive Green", "#808000"),
];

const AUTUMN: [Swatch; 6] = [
    wear("Rust", "#B7410E"),
    wear("Olive Green", "#808000"),
    wear("Warm Brown", "#8B4513"),
    wear("Mustard", "#FFDB58"),
    avoid("Icy Blue", "#A5F2F3"),
    avoid("Hot Pink", "#FF69B4"),
];

const WINTER: [Swatch; 6] = [
    wear("Royal Blue", "#4169E1"),
    wear("Emerald Green", "#50C878"),
    wear("Ruby Red", "#E0115F"),
    wear("Pure White", "#FFFFFF"),
    avoid("Salmon Pink", "#FA8072"),
    avoid("Camel", "#C19A6B"),
];

fn catalogue(season: Season) -> &'static [Swatch] {
    match season {
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Autumn => &AUTUMN,
        Season::Winter => &WINTER,
    }
}

/// The season's catalogue in display order.
pub fn curate(season: Season) -> Vec<PaletteEntry> {
    catalogue(season)
        .iter()
        .map(|swatch| PaletteEntry {
            color_name: swatch.name.to_string(),
            hex_code: swatch.hex.to_string(),
            suitable: swatch.suitable,
        })
        .collect()
}

/// Splits entries into (recommended, to avoid), keeping their relative order.
pub fn partition(entries: Vec<PaletteEntry>) -> (Vec<PaletteEntry>, Vec<PaletteEntry>) {
    entries.into_iter().partition(|entry| entry.suitable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[PaletteEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.color_name.as_str()).collect()
    }

    #[test]
    fn spring_catalogue_in_order() {
        let entries = curate(Season::Spring);
        assert_eq!(
            names(&entries),
            ["Peach", "Coral", "Warm Yellow", "Apple Green", "Navy Blue", "Burgundy"]
        );
        assert_eq!(entries[0].hex_code, "#FFCBA4");
        assert!(!entries[4].suitable);
    }

    #[test]
    fn olive_green_depends_on_season() {
        let summer = curate(Season::Summer);
        let autumn = curate(Season::Autumn);
        let olive = |entries: &[PaletteEntry]| {
            entries
                .iter()
                .find(|e| e.color_name == "Olive Green")
                .map(|e| e.suitable)
        };
        assert_eq!(olive(&summer), Some(false));
        assert_eq!(olive(&autumn), Some(true));
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        for season in Season::ALL {
            let entries = curate(season);
            let (recommended, avoid) = partition(entries.clone());

            assert_eq!(recommended.len(), 4, "{}", season);
            assert_eq!(avoid.len(), 2, "{}", season);
            assert!(recommended.iter().all(|e| e.suitable));
            assert!(avoid.iter().all(|e| !e.suitable));
            assert!(recommended.iter().all(|e| !avoid.contains(e)));

            let mut rejoined = recommended.clone();
            rejoined.extend(avoid);
            assert_eq!(rejoined, entries);
        }
    }

    #[test]
    fn curation_is_stable() {
        for season in Season::ALL {
            assert_eq!(curate(season), curate(season));
        }
    }

    #[test]
    fn hex_codes_are_well_formed() {
        for season in Season::ALL {
            for entry in curate(season) {
                assert_eq!(entry.hex_code.len(), 7);
                assert!(entry.hex_code.starts_with('#'));
                assert!(entry.hex_code[1..].chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }

    #[test]
    fn winter_recommends_royal_blue() {
        let (recommended, _) = partition(curate(Season::Winter));
        assert_eq!(recommended[0].color_name, "Royal Blue");
        assert_eq!(recommended[0].hex_code, "#4169E1");
    }
}
