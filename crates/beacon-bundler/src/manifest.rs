//! Build manifest: the ordered list of files a build produced.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coarse classification of an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetKind {
    Js,
    Css,
    Other,
}

impl AssetKind {
    /// Classify a path by its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("js" | "mjs") => AssetKind::Js,
            Some("css") => AssetKind::Css,
            _ => AssetKind::Other,
        }
    }
}

/// One output file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Forward-slash separated path relative to the output directory.
    pub relative_path: String,
    pub kind: AssetKind,
    pub is_entry: bool,
    /// Size in bytes as written.
    pub size: u64,
}

impl ManifestEntry {
    pub fn new(
        relative_path: impl Into<String>,
        kind: AssetKind,
        is_entry: bool,
        size: u64,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
            is_entry,
            size,
        }
    }

    /// File name component of the relative path.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Absolute URL path the browser uses to fetch this file.
    pub fn url_path(&self) -> String {
        format!("/{}", self.relative_path.trim_start_matches('/'))
    }
}

/// Ordered, immutable list of files produced by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    entries: Vec<ManifestEntry>,
}

impl BuildManifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JS files in manifest order.
    pub fn scripts(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.of_kind(AssetKind::Js)
    }

    /// CSS files in manifest order.
    pub fn stylesheets(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.of_kind(AssetKind::Css)
    }

    pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    pub fn find(&self, relative_path: &str) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.relative_path == relative_path)
    }

    /// Total bytes across every file.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    /// Serialize to pretty JSON.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
