//! Static genre taxonomy.
//!
//! The storefront ships a fixed reference table mapping short stable genre
//! ids to display labels. Resolution accepts either the id or the label;
//! anything else passes through verbatim and becomes an ad-hoc genre id
//! (accept-as-fallback policy, kept here as the single auditable point).

use serde::Serialize;

/// One taxonomy entry: stable id plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: &'static str,
    pub label: &'static str,
}

const GENRES: &[Genre] = &[
    Genre { id: "FPS", label: "Шутер от первого лица" },
    Genre { id: "TPS", label: "Шутер от третьего лица" },
    Genre { id: "STR_TACT_RPG", label: "Стратегии и тактические ролевые" },
    Genre { id: "BUILD_SIM", label: "Симуляторы строительства и автоматизации" },
    Genre { id: "HOBBY_SIM", label: "Симуляторы хобби и работы" },
    Genre { id: "CASUAL", label: "Казуальные" },
    Genre { id: "ROGUELIKE", label: "Рогалики" },
    Genre { id: "CARD_TABLETOP", label: "Карточные и настольные" },
    Genre { id: "TURN_BASED", label: "Пошаговые стратегии" },
    Genre { id: "SCI_FI", label: "Научная фантастика" },
    Genre { id: "PUZZLE", label: "Головоломки" },
    Genre { id: "TOWER_DEF", label: "Башенная защита" },
    Genre { id: "SPORTS_SIM", label: "Спортивные симуляторы" },
    Genre { id: "HORROR", label: "Хорроры" },
    Genre { id: "RACING", label: "Гонки" },
    Genre { id: "SURVIVAL", label: "Выживание" },
];

/// The whole reference table, fixed at compile time and read-only.
pub fn all() -> &'static [Genre] {
    GENRES
}

/// Look up a taxonomy entry by its canonical id.
pub fn find(id: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|g| g.id == id)
}

/// Resolve an id or display label to the canonical genre id.
///
/// Unknown input is returned unchanged rather than rejected, so unresolved
/// strings become ad-hoc genre ids on the record that carries them.
pub fn resolve(raw: &str) -> &str {
    GENRES
        .iter()
        .find(|g| g.id == raw || g.label == raw)
        .map(|g| g.id)
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_id_to_itself() {
        assert_eq!(resolve("FPS"), "FPS");
        assert_eq!(resolve("TOWER_DEF"), "TOWER_DEF");
    }

    #[test]
    fn resolves_display_label_to_id() {
        assert_eq!(resolve("Головоломки"), "PUZZLE");
        assert_eq!(resolve("Шутер от первого лица"), "FPS");
    }

    #[test]
    fn unknown_strings_pass_through_verbatim() {
        assert_eq!(resolve("Metroidvania"), "Metroidvania");
        assert_eq!(resolve(""), "");
    }

    #[test]
    fn find_only_matches_ids() {
        assert!(find("RACING").is_some());
        assert!(find("Гонки").is_none());
        assert_eq!(all().len(), 16);
    }
}
