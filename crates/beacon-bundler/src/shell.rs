//! HTML shell generation.
//!
//! The shell is the one HTML document served for every non-API, non-static
//! route. It references the build's entry script and stylesheets and carries
//! each [`TemplateToken`] marker exactly once, unsubstituted.

use std::path::{Path, PathBuf};

use crate::manifest::{BuildManifest, ManifestEntry};
use crate::tokens::TemplateToken;
use crate::writer::{resolve_output_path, write_files_atomic};
use crate::{Error, Result};

/// File name of the shell inside the output directory.
pub const SHELL_FILE_NAME: &str = "index.html";

/// Entry script URL used when the manifest names no usable entry.
pub const DEFAULT_ENTRY_PATH: &str = "/assets/index.js";

/// Theme pre-paint script. Runs before any bundle loads so the first paint
/// already uses the persisted theme.
const PREPAINT_SCRIPT: &str = r#"(function () {
  try {
    var stored = window.localStorage.getItem('theme');
    var dark = stored
      ? stored === 'dark'
      : window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches;
    var root = document.documentElement;
    root.classList.toggle('dark', dark);
    root.classList.toggle('light', !dark);
    root.style.colorScheme = dark ? 'dark' : 'light';
  } catch (e) {}
})();"#;

/// How the entry script was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySelection {
    /// A JS file whose name contains the entry marker.
    Marked(String),
    /// No name matched; the first JS chunk the bundler flagged as an entry.
    Flagged(String),
    /// Nothing usable in the manifest.
    Fallback,
}

impl EntrySelection {
    /// URL the shell's module script points at.
    pub fn url_path(&self) -> String {
        match self {
            EntrySelection::Marked(path) | EntrySelection::Flagged(path) => {
                format!("/{}", path.trim_start_matches('/'))
            }
            EntrySelection::Fallback => DEFAULT_ENTRY_PATH.to_string(),
        }
    }

    /// Manifest path of the selected file; `None` for the fallback.
    pub fn relative_path(&self) -> Option<&str> {
        match self {
            EntrySelection::Marked(path) | EntrySelection::Flagged(path) => Some(path),
            EntrySelection::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, EntrySelection::Fallback)
    }
}

/// Pick the entry script for the shell. Never fails.
///
/// Among JS files whose name contains `marker`, entry-flagged files win over
/// other chunks; manifest order breaks ties.
pub fn select_entry(manifest: &BuildManifest, marker: &str) -> EntrySelection {
    let marked = |entry: &&ManifestEntry| entry.file_name().contains(marker);

    if let Some(entry) = manifest
        .scripts()
        .filter(|e| e.is_entry)
        .find(marked)
        .or_else(|| manifest.scripts().find(marked))
    {
        return EntrySelection::Marked(entry.relative_path.clone());
    }

    if let Some(entry) = manifest.scripts().find(|e| e.is_entry) {
        return EntrySelection::Flagged(entry.relative_path.clone());
    }

    EntrySelection::Fallback
}

/// Renders and writes `index.html`.
#[derive(Debug, Clone)]
pub struct ShellGenerator {
    entry_marker: String,
}

impl Default for ShellGenerator {
    fn default() -> Self {
        Self::new("index")
    }
}

impl ShellGenerator {
    pub fn new(entry_marker: impl Into<String>) -> Self {
        Self {
            entry_marker: entry_marker.into(),
        }
    }

    pub fn select_entry(&self, manifest: &BuildManifest) -> EntrySelection {
        select_entry(manifest, &self.entry_marker)
    }

    /// Render the shell document.
    pub fn render(&self, manifest: &BuildManifest) -> String {
        let entry = self.select_entry(manifest);
        let mut html = String::with_capacity(2048);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n  <head>\n");
        html.push_str("    <meta charset=\"utf-8\" />\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n",
        );
        html.push_str(&format!("    <title>{}</title>\n", TemplateToken::Name));

        for stylesheet in manifest.stylesheets() {
            html.push_str(&format!(
                "    <link rel=\"stylesheet\" href=\"{}\" />\n",
                escape_attr(&stylesheet.url_path())
            ));
        }

        html.push_str(&format!("    <script nonce=\"{}\">\n", TemplateToken::Nonce));
        html.push_str(&format!(
            "window.configHydration = {};\n",
            TemplateToken::ServerConfigJson
        ));
        html.push_str(&format!(
            "window.statusHydration = {};\n",
            TemplateToken::StatusJson
        ));
        html.push_str(PREPAINT_SCRIPT);
        html.push_str("\n    </script>\n");

        html.push_str(&format!(
            "    <script type=\"module\" src=\"{}\"></script>\n",
            escape_attr(&entry.url_path())
        ));

        html.push_str("  </head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n");
        html
    }

    /// Write the shell into `out_dir`.
    ///
    /// The selected entry script must already be on disk unless the
    /// fallback path was used.
    pub fn write(&self, out_dir: &Path, manifest: &BuildManifest) -> Result<PathBuf> {
        let entry = self.select_entry(manifest);

        match entry.relative_path() {
            Some(relative) => {
                let on_disk = resolve_output_path(out_dir, relative)?;
                if !on_disk.is_file() {
                    return Err(Error::EntryMissing(on_disk));
                }
            }
            None => {
                tracing::warn!(
                    marker = %self.entry_marker,
                    fallback = DEFAULT_ENTRY_PATH,
                    "no entry script in build output, using default path"
                );
            }
        }

        let target = resolve_output_path(out_dir, SHELL_FILE_NAME)?;
        write_files_atomic(&[(target.clone(), self.render(manifest).into_bytes())])?;

        tracing::debug!(path = %target.display(), entry = %entry.url_path(), "wrote shell");
        Ok(target)
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::AssetKind;
    use crate::tokens::occurrences;

    fn manifest(entries: &[(&str, AssetKind, bool)]) -> BuildManifest {
        BuildManifest::new(
            entries
                .iter()
                .map(|(path, kind, is_entry)| ManifestEntry::new(*path, *kind, *is_entry, 1))
                .collect(),
        )
    }

    #[test]
    fn test_select_entry_by_marker() {
        let m = manifest(&[
            ("assets/player-aaa.js", AssetKind::Js, false),
            ("assets/index-bbb.js", AssetKind::Js, true),
        ]);
        assert_eq!(
            select_entry(&m, "index"),
            EntrySelection::Marked("assets/index-bbb.js".into())
        );
    }

    #[test]
    fn test_select_entry_prefers_flagged_marker_match() {
        let m = manifest(&[
            ("assets/index-helpers-aaa.js", AssetKind::Js, false),
            ("assets/index-bbb.js", AssetKind::Js, true),
        ]);
        assert_eq!(
            select_entry(&m, "index").relative_path(),
            Some("assets/index-bbb.js")
        );
    }

    #[test]
    fn test_select_entry_falls_back_to_flagged_chunk() {
        let m = manifest(&[
            ("assets/chunk-aaa.js", AssetKind::Js, false),
            ("assets/main-bbb.js", AssetKind::Js, true),
        ]);
        assert_eq!(
            select_entry(&m, "index"),
            EntrySelection::Flagged("assets/main-bbb.js".into())
        );
    }

    #[test]
    fn test_select_entry_never_fails() {
        let m = manifest(&[("assets/styles.css", AssetKind::Css, true)]);
        let selection = select_entry(&m, "index");
        assert!(selection.is_fallback());
        assert_eq!(selection.url_path(), DEFAULT_ENTRY_PATH);
        assert!(select_entry(&BuildManifest::default(), "index").is_fallback());
    }

    #[test]
    fn test_render_contains_each_token_once() {
        let m = manifest(&[
            ("assets/index-bbb.js", AssetKind::Js, true),
            ("assets/styles.css", AssetKind::Css, true),
        ]);
        let html = ShellGenerator::default().render(&m);

        for token in TemplateToken::ALL {
            assert_eq!(occurrences(&html, token), 1, "token {token}");
        }
        assert!(html.contains("<script type=\"module\" src=\"/assets/index-bbb.js\"></script>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/assets/styles.css\" />"));
        assert!(html.contains(PREPAINT_SCRIPT));
    }

    #[test]
    fn test_render_puts_each_tag_on_its_own_line() {
        let m = manifest(&[
            ("assets/index-bbb.js", AssetKind::Js, true),
            ("assets/styles.css", AssetKind::Css, true),
            ("assets/a&b.css", AssetKind::Css, false),
        ]);
        let html = ShellGenerator::default().render(&m);
        let lines = html.lines().collect::<Vec<_>>();

        for expected in [
            "    <title>{{.Name}}</title>",
            "    <link rel=\"stylesheet\" href=\"/assets/styles.css\" />",
            "    <link rel=\"stylesheet\" href=\"/assets/a&amp;b.css\" />",
            "    <script nonce=\"{{.Nonce}}\">",
            "window.configHydration = {{.ServerConfigJSON}};",
            "window.statusHydration = {{.StatusJSON}};",
            "    <script type=\"module\" src=\"/assets/index-bbb.js\"></script>",
        ] {
            assert!(lines.contains(&expected), "missing line {expected:?}");
        }
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_render_hydration_precedes_prepaint() {
        let html = ShellGenerator::default().render(&BuildManifest::default());
        let config = html.find("window.configHydration").unwrap();
        let status = html.find("window.statusHydration").unwrap();
        let prepaint = html.find("localStorage").unwrap();
        assert!(config < status && status < prepaint);
        assert_eq!(html.matches("<script nonce=").count(), 1);
    }

    #[test]
    fn test_write_requires_entry_on_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let m = manifest(&[("assets/index-bbb.js", AssetKind::Js, true)]);

        let err = ShellGenerator::default().write(temp.path(), &m).unwrap_err();
        assert!(matches!(err, Error::EntryMissing(_)));
        assert!(!temp.path().join(SHELL_FILE_NAME).exists());

        std::fs::create_dir_all(temp.path().join("assets")).unwrap();
        std::fs::write(temp.path().join("assets/index-bbb.js"), "export {}").unwrap();
        let path = ShellGenerator::default().write(temp.path(), &m).unwrap();
        assert_eq!(path, temp.path().join(SHELL_FILE_NAME));
        assert!(std::fs::read_to_string(path).unwrap().contains("{{.Nonce}}"));
    }

    #[test]
    fn test_write_with_fallback_entry() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = ShellGenerator::default()
            .write(temp.path(), &BuildManifest::default())
            .unwrap();
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains(DEFAULT_ENTRY_PATH));
    }
}
