//! Reading the palette generated from the wallpaper.
//!
//! The palette generator writes an SCSS-style variables file:
//!
//! ```text
//! $background: #141313;
//! $onPrimary: #1c1b1c;
//! $surfaceContainerHigh: #2b2a2a;
//! ```
//!
//! Only lines starting with `$` and containing `": "` are considered.
//! Everything else (comments, blank lines, rules) is ignored.

use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const SIGIL: char = '$';
const SEPARATOR: &str = ": ";
const TERMINATOR: char = ';';

/// Named colors parsed from the generated theme file.
///
/// Keys are unique; iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
}

/// Errors from reading a palette file.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("palette file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no colors found in {}", .0.display())]
    EmptyPalette(PathBuf),
}

impl Palette {
    /// Parse palette text. Lines that do not look like `$name: value;` are
    /// skipped; a repeated name keeps its last value.
    pub fn parse(text: &str) -> Self {
        let mut colors = BTreeMap::new();
        for line in text.lines() {
            if let Some((name, value)) = parse_line(line) {
                colors.insert(name.to_string(), value.to_string());
            }
        }
        Self { colors }
    }

    /// Read and parse the palette at `path`.
    pub fn read(path: &Path) -> Result<Self, PaletteError> {
        if !path.exists() {
            return Err(PaletteError::MissingFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| PaletteError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        let palette = Self::parse(&text);
        if palette.is_empty() {
            return Err(PaletteError::EmptyPalette(path.to_path_buf()));
        }
        debug!("read {} color(s) from {}", palette.len(), path.display());
        Ok(palette)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `(name, value)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Palette {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Split one `$name: value;` line into its name and value.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(SIGIL)?;
    let (name, value) = rest.split_once(SEPARATOR)?;
    let name = name.trim();
    let value = value.trim();
    let value = value.strip_suffix(TERMINATOR).unwrap_or(value).trim_end();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Block until `path` exists, polling every `poll` for at most `timeout`.
///
/// Returns `true` as soon as the file is present, `false` once the timeout
/// has elapsed without it appearing.
pub fn wait_for_file(path: &Path, timeout: Duration, poll: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if path.exists() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        debug!("waiting for {}", path.display());
        std::thread::sleep(poll.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_path(name: &str) -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "qs-recolor-palette-{}-{}-{}",
            std::process::id(),
            id,
            name
        ))
    }

    #[test]
    fn parses_all_valid_lines() {
        let text = "$background: #141313;\n$primary: #cbc4cb;\n$on_surface: #e6e1e1;\n";
        let p = Palette::parse(text);
        assert_eq!(p.len(), 3);
        assert_eq!(p.get("background"), Some("#141313"));
        assert_eq!(p.get("primary"), Some("#cbc4cb"));
        assert_eq!(p.get("on_surface"), Some("#e6e1e1"));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let text = "$primary: #111111;\n$secondary: #222222;\n$primary: #333333;\n";
        let p = Palette::parse(text);
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("primary"), Some("#333333"));
    }

    #[test]
    fn ignores_non_matching_lines() {
        let text = "\
// generated by matugen
body { color: red; }
$no_separator;
$spaced:#000000;
primary: #ffffff;

  $indented: #abcdef;
";
        let p = Palette::parse(text);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("indented"), Some("#abcdef"));
    }

    #[test]
    fn value_without_terminator_is_accepted() {
        let p = Palette::parse("$outline: #948f94\n");
        assert_eq!(p.get("outline"), Some("#948f94"));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let p = Palette::parse("$font: a: b;\n");
        assert_eq!(p.get("font"), Some("a: b"));
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let p = Palette::parse("$surface: #1;\n$background: #2;\n$primary: #3;\n");
        let names: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["background", "primary", "surface"]);
    }

    #[test]
    fn read_missing_file() {
        let path = tmp_path("missing.scss");
        match Palette::read(&path) {
            Err(PaletteError::MissingFile(p)) => assert_eq!(p, path),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn read_file_without_colors_is_empty_palette() {
        let path = tmp_path("empty.scss");
        std::fs::write(&path, "// nothing here\n").unwrap();
        let result = Palette::read(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(PaletteError::EmptyPalette(_))));
    }

    #[test]
    fn read_valid_file() {
        let path = tmp_path("colors.scss");
        std::fs::write(&path, "$background: #ffffff;\n$primary: #000000;\n").unwrap();
        let result = Palette::read(&path);
        let _ = std::fs::remove_file(&path);
        let p = result.unwrap();
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn read_directory_is_unreadable() {
        let path = tmp_path("dir.scss");
        std::fs::create_dir(&path).unwrap();
        let result = Palette::read(&path);
        let _ = std::fs::remove_dir(&path);
        match result {
            Err(PaletteError::UnreadableFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected UnreadableFile, got {other:?}"),
        }
    }

    #[test]
    fn wait_returns_immediately_for_existing_file() {
        let path = tmp_path("exists.scss");
        std::fs::write(&path, "").unwrap();
        let start = Instant::now();
        let found = wait_for_file(&path, Duration::from_secs(5), Duration::from_millis(50));
        let _ = std::fs::remove_file(&path);
        assert!(found);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn wait_times_out_for_absent_file() {
        let path = tmp_path("never.scss");
        let found = wait_for_file(&path, Duration::from_millis(60), Duration::from_millis(20));
        assert!(!found);
    }

    #[test]
    fn wait_sees_file_created_later() {
        let path = tmp_path("later.scss");
        let writer_path = path.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            std::fs::write(&writer_path, "$a: b;").unwrap();
        });
        let found = wait_for_file(&path, Duration::from_secs(5), Duration::from_millis(10));
        handle.join().unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(found);
    }
}
