//! The fixed translation table from palette color names to the property
//! identifiers declared in the shell's `Appearance.qml`.
//!
//! The generator writes Material 3 roles in camelCase (`onPrimary`,
//! `surfaceContainerHigh`) plus the five `*_paletteKeyColor` seeds.  The
//! shell declares each of them as a QML property with an `m3` prefix
//! (`m3onPrimary`, `m3primary_paletteKeyColor`, …).

/// Built-in `(palette name, property identifier)` pairs.
const BUILTIN: &[(&str, &str)] = &[
    ("primary_paletteKeyColor", "m3primary_paletteKeyColor"),
    ("secondary_paletteKeyColor", "m3secondary_paletteKeyColor"),
    ("tertiary_paletteKeyColor", "m3tertiary_paletteKeyColor"),
    ("neutral_paletteKeyColor", "m3neutral_paletteKeyColor"),
    ("neutral_variant_paletteKeyColor", "m3neutral_variant_paletteKeyColor"),
    ("background", "m3background"),
    ("onBackground", "m3onBackground"),
    ("surface", "m3surface"),
    ("surfaceDim", "m3surfaceDim"),
    ("surfaceBright", "m3surfaceBright"),
    ("surfaceContainerLowest", "m3surfaceContainerLowest"),
    ("surfaceContainerLow", "m3surfaceContainerLow"),
    ("surfaceContainer", "m3surfaceContainer"),
    ("surfaceContainerHigh", "m3surfaceContainerHigh"),
    ("surfaceContainerHighest", "m3surfaceContainerHighest"),
    ("onSurface", "m3onSurface"),
    ("surfaceVariant", "m3surfaceVariant"),
    ("onSurfaceVariant", "m3onSurfaceVariant"),
    ("inverseSurface", "m3inverseSurface"),
    ("inverseOnSurface", "m3inverseOnSurface"),
    ("outline", "m3outline"),
    ("outlineVariant", "m3outlineVariant"),
    ("shadow", "m3shadow"),
    ("scrim", "m3scrim"),
    ("surfaceTint", "m3surfaceTint"),
    ("primary", "m3primary"),
    ("onPrimary", "m3onPrimary"),
    ("primaryContainer", "m3primaryContainer"),
    ("onPrimaryContainer", "m3onPrimaryContainer"),
    ("inversePrimary", "m3inversePrimary"),
    ("secondary", "m3secondary"),
    ("onSecondary", "m3onSecondary"),
    ("secondaryContainer", "m3secondaryContainer"),
    ("onSecondaryContainer", "m3onSecondaryContainer"),
    ("tertiary", "m3tertiary"),
    ("onTertiary", "m3onTertiary"),
    ("tertiaryContainer", "m3tertiaryContainer"),
    ("onTertiaryContainer", "m3onTertiaryContainer"),
    ("error", "m3error"),
    ("onError", "m3onError"),
    ("errorContainer", "m3errorContainer"),
    ("onErrorContainer", "m3onErrorContainer"),
];

/// Mapping from palette color names to target property identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pairs: Vec<(String, String)>,
}

impl PropertyMapping {
    /// The compiled-in Material 3 table.
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().map(|&(k, p)| (k.to_string(), p.to_string())))
    }

    /// Build a mapping from `(palette name, property)` pairs, keeping their
    /// order.
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// `(palette name, property)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    /// The property a palette color is written to, if it is mapped at all.
    pub fn property_for(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, p)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Default for PropertyMapping {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The property identifier a palette name is declared under:
/// `surfaceContainerHigh` → `m3surfaceContainerHigh`.
pub fn property_name(name: &str) -> String {
    format!("m3{}", name)
}
