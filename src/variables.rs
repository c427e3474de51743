//! Tournament settings names.
//!
//! The store names its settings in French (the local names) and the document
//! in English (the canonical names). Both lookups are built from [`VARIABLES`],
//! so translating a name there and back always gives the name back.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// The longest value the `Value` column of the `INFO` table holds.
pub const MAX_VALUE_LENGTH: usize = 50;

/// `(local, canonical)` pairs.
const VARIABLES: [(&str, &str); 17] = [
    ("Nom", "name"),
    ("Genre", "type"),
    ("NbrRondes", "rounds"),
    ("Pairing", "pairing"),
    ("Cadence", "timeControl"),
    ("ClassElo", "ratingClass"),
    ("EloBase1", "minRating"),
    ("EloBase2", "maxRating"),
    ("Dep1", "tiebreak1"),
    ("Dep2", "tiebreak2"),
    ("Dep3", "tiebreak3"),
    ("DecomptePoints", "pointSystem"),
    ("Lieu", "venue"),
    ("DateDebut", "startDate"),
    ("DateFin", "endDate"),
    ("Arbitre", "arbiter"),
    ("Homologation", "homologation"),
];

struct Dictionary {
    to_canonical: FxHashMap<&'static str, &'static str>,
    to_local: FxHashMap<&'static str, &'static str>,
}

impl Dictionary {
    fn new() -> Self {
        let mut to_canonical = FxHashMap::default();
        let mut to_local = FxHashMap::default();

        for (local, canonical) in VARIABLES {
            to_canonical.insert(local, canonical);
            to_local.insert(canonical, local);
        }

        Self {
            to_canonical,
            to_local,
        }
    }
}

static DICTIONARY: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);

#[must_use]
pub fn to_canonical(local: &str) -> Option<&'static str> {
    DICTIONARY.to_canonical.get(local).copied()
}

#[must_use]
pub fn to_local(canonical: &str) -> Option<&'static str> {
    DICTIONARY.to_local.get(canonical).copied()
}

/// Whether the store accepts a setting under this local name.
#[must_use]
pub fn is_recognized(local: &str) -> bool {
    DICTIONARY.to_canonical.contains_key(local)
}

pub fn canonical_names() -> impl Iterator<Item = &'static str> {
    VARIABLES.iter().map(|(_, canonical)| *canonical)
}

/// Returns the first [`MAX_VALUE_LENGTH`] characters of `value`, or `None` if
/// it already fits.
#[must_use]
pub fn truncate_value(value: &str) -> Option<String> {
    if value.chars().count() <= MAX_VALUE_LENGTH {
        None
    } else {
        Some(value.chars().take(MAX_VALUE_LENGTH).collect())
    }
}
