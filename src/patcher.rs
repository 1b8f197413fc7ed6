//! Rewriting color declarations in the shell's color file.
//!
//! A line declares property `P` when the text before its first `:` ends with
//! the whitespace-separated tokens `property color P`, and the text after
//! the colon holds a double-quoted value:
//!
//! ```qml
//! readonly property color m3background: "#141313"
//!     property   color m3primary :  "#cbc4cb" // accent
//! ```
//!
//! Only the first quoted substring after the colon is replaced.  Indentation,
//! trailing comments and line endings are left exactly as they were.

use crate::mapping::PropertyMapping;
use crate::palette::Palette;
use log::debug;
use std::ops::Range;

/// Result of patching a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// The rewritten document.
    pub text: String,
    /// Properties that had at least one declaration rewritten, in mapping
    /// order.  A property counts even if its value was already current.
    pub updated: Vec<String>,
    /// Mapped properties whose color is in the palette but which have no
    /// declaration in the document.
    pub missing: Vec<String>,
}

impl PatchOutcome {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Replace the value of every mapped property declared in `document` with
/// the corresponding palette color.
///
/// Mapped names that are absent from the palette are not considered.  A
/// property declared on several lines has all of them rewritten and is
/// counted once.
pub fn patch(document: &str, palette: &Palette, mapping: &PropertyMapping) -> PatchOutcome {
    let mut lines: Vec<String> = document.split_inclusive('\n').map(str::to_string).collect();
    let mut updated = Vec::new();
    let mut missing = Vec::new();

    for (name, property) in mapping.iter() {
        let Some(value) = palette.get(name) else {
            continue;
        };
        let mut found = false;
        for line in lines.iter_mut() {
            if let Some(span) = value_span(line, property) {
                line.replace_range(span, value);
                found = true;
            }
        }
        if found {
            debug!("{} = {}", property, value);
            updated.push(property.to_string());
        } else {
            debug!("no declaration of {} found, skipping", property);
            missing.push(property.to_string());
        }
    }

    PatchOutcome {
        text: lines.concat(),
        updated,
        missing,
    }
}

/// Byte range of the quoted value on `line` if it declares `property`.
fn value_span(line: &str, property: &str) -> Option<Range<usize>> {
    if line.trim_start().starts_with("//") {
        return None;
    }
    let colon = line.find(':')?;
    let head: Vec<&str> = line[..colon].split_whitespace().collect();
    if !matches!(head.as_slice(), [.., "property", "color", name] if *name == property) {
        return None;
    }
    let open = colon + 1 + line[colon + 1..].find('"')? + 1;
    let close = open + line[open..].find('"')?;
    Some(open..close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> PropertyMapping {
        PropertyMapping::new(pairs.iter().map(|&(k, p)| (k.to_string(), p.to_string())))
    }

    fn palette(pairs: &[(&str, &str)]) -> Palette {
        pairs.iter().copied().collect()
    }

    #[test]
    fn replaces_background_value() {
        let doc = "property color m3background: \"#000000\"\n";
        let out = patch(
            doc,
            &palette(&[("background", "#ffffff")]),
            &mapping(&[("background", "m3background")]),
        );
        assert_eq!(out.text, "property color m3background: \"#ffffff\"\n");
        assert_eq!(out.updated_count(), 1);
        assert!(out.missing.is_empty());
    }

    #[test]
    fn second_run_is_idempotent_and_still_counts() {
        let doc = "property color m3background: \"#000000\"\n";
        let p = palette(&[("background", "#ffffff")]);
        let m = mapping(&[("background", "m3background")]);
        let first = patch(doc, &p, &m);
        let second = patch(&first.text, &p, &m);
        assert_eq!(second.text, first.text);
        assert_eq!(second.updated_count(), 1);
    }

    #[test]
    fn undeclared_property_is_skipped_not_counted() {
        let doc = "property color m3background: \"#000000\"\n";
        let out = patch(
            doc,
            &palette(&[("background", "#ffffff"), ("primary", "#ff0000")]),
            &mapping(&[("background", "m3background"), ("primary", "m3primary")]),
        );
        assert_eq!(out.updated, ["m3background"]);
        assert_eq!(out.missing, ["m3primary"]);
        assert_eq!(out.text, "property color m3background: \"#ffffff\"\n");
    }

    #[test]
    fn names_missing_from_palette_are_ignored() {
        let doc = "property color m3primary: \"#000000\"\n";
        let out = patch(doc, &palette(&[]), &mapping(&[("primary", "m3primary")]));
        assert_eq!(out.text, doc);
        assert_eq!(out.updated_count(), 0);
        assert!(out.missing.is_empty());
    }

    #[test]
    fn tolerates_whitespace_and_prefixes() {
        let doc = "\
Singleton {
    readonly property color m3primary: \"#000000\"
\tproperty   color   m3onPrimary :\"#000000\" // text on accent
}
";
        let out = patch(
            doc,
            &palette(&[("primary", "#112233"), ("onPrimary", "#445566")]),
            &mapping(&[("primary", "m3primary"), ("onPrimary", "m3onPrimary")]),
        );
        assert_eq!(
            out.text,
            "\
Singleton {
    readonly property color m3primary: \"#112233\"
\tproperty   color   m3onPrimary :\"#445566\" // text on accent
}
"
        );
        assert_eq!(out.updated_count(), 2);
    }

    #[test]
    fn does_not_match_property_prefixes() {
        // m3surface must not touch m3surfaceContainer.
        let doc = "property color m3surfaceContainer: \"#000000\"\n";
        let out = patch(
            doc,
            &palette(&[("surface", "#ffffff")]),
            &mapping(&[("surface", "m3surface")]),
        );
        assert_eq!(out.text, doc);
        assert_eq!(out.missing, ["m3surface"]);
    }

    #[test]
    fn ignores_commented_out_and_unquoted_declarations() {
        let doc = "\
// property color m3primary: \"#000000\"
property color m3primary: Qt.rgba(0, 0, 0, 1)
";
        let out = patch(
            doc,
            &palette(&[("primary", "#ffffff")]),
            &mapping(&[("primary", "m3primary")]),
        );
        assert_eq!(out.text, doc);
        assert_eq!(out.updated_count(), 0);
    }

    #[test]
    fn rewrites_every_declaration_but_counts_once() {
        let doc = "property color m3scrim: \"#000000\"\nproperty color m3scrim: \"#111111\"\n";
        let out = patch(
            doc,
            &palette(&[("scrim", "#222222")]),
            &mapping(&[("scrim", "m3scrim")]),
        );
        assert_eq!(
            out.text,
            "property color m3scrim: \"#222222\"\nproperty color m3scrim: \"#222222\"\n"
        );
        assert_eq!(out.updated_count(), 1);
    }

    #[test]
    fn preserves_crlf_and_missing_final_newline() {
        let doc = "property color m3error: \"#000000\"\r\nproperty color m3onError: \"#000000\"";
        let out = patch(
            doc,
            &palette(&[("error", "#aa0000"), ("onError", "#ffffff")]),
            &mapping(&[("error", "m3error"), ("onError", "m3onError")]),
        );
        assert_eq!(
            out.text,
            "property color m3error: \"#aa0000\"\r\nproperty color m3onError: \"#ffffff\""
        );
    }

    #[test]
    fn works_with_builtin_mapping() {
        let doc = "\
pragma Singleton
import QtQuick

QtObject {
    property color m3background: \"#000000\"
    property color m3surfaceContainerHigh: \"#000000\"
}
";
        let p = Palette::parse("$background: #141313;\n$surfaceContainerHigh: #2b2a2a;\n");
        let out = patch(doc, &p, &PropertyMapping::builtin());
        assert!(out.text.contains("m3background: \"#141313\""));
        assert!(out.text.contains("m3surfaceContainerHigh: \"#2b2a2a\""));
        assert_eq!(out.updated, ["m3background", "m3surfaceContainerHigh"]);
    }

    #[test]
    fn generated_camel_case_keys_reach_their_properties() {
        let p = Palette::parse(
            "\
$background: #101010;
$onBackground: #202020;
$surfaceContainerLow: #303030;
$primary_paletteKeyColor: #404040;
",
        );
        let doc = "\
        property color m3primary_paletteKeyColor: \"#000000\"
        property color m3background: \"#000000\"
        property color m3onBackground: \"#000000\"
        property color m3surfaceContainerLow: \"#000000\"
";
        let out = patch(doc, &p, &PropertyMapping::builtin());
        assert_eq!(out.updated_count(), 4);
        assert!(!out.text.contains("#000000"));
        assert!(out.text.contains("m3primary_paletteKeyColor: \"#404040\""));
        assert!(out.text.contains("m3surfaceContainerLow: \"#303030\""));
    }
}
