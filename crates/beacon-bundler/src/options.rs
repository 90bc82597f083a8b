//! Build options.

use std::path::{Path, PathBuf};

/// Directory (relative to the output directory) holding generated bundle files.
pub const ASSETS_DIR: &str = "assets";

/// Default path of the compiled stylesheet, relative to the output directory.
pub const DEFAULT_STYLESHEET_PATH: &str = "assets/styles.css";

/// Default timeout for the stylesheet compiler.
pub const DEFAULT_CSS_TIMEOUT_SECS: u64 = 60;

/// Inputs and outputs of one build, all resolved to absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Project root the compilers run in.
    pub root: PathBuf,
    /// Application entry module.
    pub entry: PathBuf,
    /// Design source for the utility-class stylesheet compiler.
    pub stylesheet: PathBuf,
    /// Directory copied verbatim into the output directory.
    pub public_dir: PathBuf,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Substring identifying the entry chunk's file name.
    pub entry_marker: String,
    /// Compiled stylesheet location, relative to `out_dir`.
    pub stylesheet_path: String,
    /// Minify JS output.
    pub minify: bool,
    /// Stylesheet compiler timeout in seconds.
    pub css_timeout_secs: u64,
}

impl BuildOptions {
    /// Options using the conventional layout under `root`:
    /// `src/index.tsx`, `src/styles/global.css`, `public/` and `dist/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            entry: root.join("src").join("index.tsx"),
            stylesheet: root.join("src").join("styles").join("global.css"),
            public_dir: root.join("public"),
            out_dir: root.join("dist"),
            entry_marker: "index".to_string(),
            stylesheet_path: DEFAULT_STYLESHEET_PATH.to_string(),
            minify: true,
            css_timeout_secs: DEFAULT_CSS_TIMEOUT_SECS,
            root,
        }
    }

    pub fn entry(mut self, entry: impl AsRef<Path>) -> Self {
        self.entry = self.resolve(entry);
        self
    }

    pub fn stylesheet(mut self, stylesheet: impl AsRef<Path>) -> Self {
        self.stylesheet = self.resolve(stylesheet);
        self
    }

    pub fn public_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.public_dir = self.resolve(dir);
        self
    }

    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = self.resolve(dir);
        self
    }

    pub fn entry_marker(mut self, marker: impl Into<String>) -> Self {
        self.entry_marker = marker.into();
        self
    }

    pub fn stylesheet_path(mut self, path: impl Into<String>) -> Self {
        self.stylesheet_path = path.into();
        self
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn css_timeout_secs(mut self, secs: u64) -> Self {
        self.css_timeout_secs = secs;
        self
    }

    /// Directory holding hashed bundle files; cleared on every build.
    pub fn assets_dir(&self) -> PathBuf {
        self.out_dir.join(ASSETS_DIR)
    }

    /// Absolute path of the compiled stylesheet.
    pub fn stylesheet_output(&self) -> PathBuf {
        self.out_dir.join(&self.stylesheet_path)
    }

    fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
