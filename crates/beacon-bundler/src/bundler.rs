//! Script bundling.
//!
//! [`ScriptBundler`] is the seam between the build pipeline and the JS
//! compiler. [`RolldownBundler`] is the production implementation; tests
//! substitute their own.

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, RawMinifyOptions,
};

use crate::options::{BuildOptions, ASSETS_DIR};
use crate::{Error, Result};

/// One file produced by the script bundler, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledFile {
    /// Path relative to the output directory, `/` separated.
    pub relative_path: String,
    pub contents: Vec<u8>,
    /// Whether the bundler marked this chunk as an entry point.
    pub is_entry: bool,
}

impl BundledFile {
    pub fn new(
        relative_path: impl Into<String>,
        contents: impl Into<Vec<u8>>,
        is_entry: bool,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents: contents.into(),
            is_entry,
        }
    }
}

/// Compiles the application entry module into browser-ready files.
///
/// Implementations must either return every output file or fail; a partial
/// list is never acceptable because the caller writes exactly what it gets.
#[async_trait]
pub trait ScriptBundler: Send + Sync {
    async fn bundle(&self, options: &BuildOptions) -> Result<Vec<BundledFile>>;
}

/// ES module bundler for the browser, backed by Rolldown.
///
/// Every emitted file lands under `assets/` with a content hash in its name,
/// so identical input yields identical names and any content change yields a
/// new name.
#[derive(Debug, Clone, Default)]
pub struct RolldownBundler;

impl RolldownBundler {
    pub fn new() -> Self {
        Self
    }

    fn configure(options: &BuildOptions) -> BundlerOptions {
        let script_pattern = format!("{ASSETS_DIR}/[name]-[hash].js");

        let mut rolldown_options = BundlerOptions {
            input: Some(vec![InputItem {
                name: Some(entry_chunk_name(options)),
                import: options.entry.to_string_lossy().into_owned(),
            }]),
            cwd: Some(options.root.clone()),
            format: Some(OutputFormat::Esm),
            platform: Some(Platform::Browser),
            entry_filenames: Some(script_pattern.clone().into()),
            chunk_filenames: Some(script_pattern.into()),
            asset_filenames: Some(format!("{ASSETS_DIR}/[name]-[hash][extname]").into()),
            ..Default::default()
        };

        if options.minify {
            rolldown_options.minify = Some(RawMinifyOptions::from(true));
        }

        rolldown_options
    }
}

/// Name the entry chunk after the marker so the shell generator can find it.
fn entry_chunk_name(options: &BuildOptions) -> String {
    if options.entry_marker.is_empty() {
        "index".to_string()
    } else {
        options.entry_marker.clone()
    }
}

#[async_trait]
impl ScriptBundler for RolldownBundler {
    async fn bundle(&self, options: &BuildOptions) -> Result<Vec<BundledFile>> {
        if !options.entry.is_file() {
            return Err(Error::SourceNotFound(options.entry.clone()));
        }

        tracing::debug!(
            entry = %options.entry.display(),
            minify = options.minify,
            "bundling scripts"
        );

        let mut bundler = BundlerBuilder::default()
            .with_options(Self::configure(options))
            .build()
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let bundle = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let files = bundle
            .assets
            .iter()
            .map(|output| match output {
                rolldown_common::Output::Chunk(chunk) => BundledFile::new(
                    chunk.filename.to_string(),
                    chunk.code.clone().into_bytes(),
                    chunk.is_entry,
                ),
                rolldown_common::Output::Asset(asset) => {
                    let contents = match &asset.source {
                        rolldown_common::StrOrBytes::Str(s) => s.clone().into_bytes(),
                        rolldown_common::StrOrBytes::Bytes(b) => b.clone(),
                    };
                    BundledFile::new(asset.filename.to_string(), contents, false)
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(files = files.len(), "bundle generated");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_browser_esm() {
        let options = BuildOptions::new("/web");
        let rolldown_options = RolldownBundler::configure(&options);

        assert!(matches!(rolldown_options.format, Some(OutputFormat::Esm)));
        assert!(matches!(rolldown_options.platform, Some(Platform::Browser)));
        assert!(rolldown_options.minify.is_some());

        let input = rolldown_options.input.unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0].name.as_deref(), Some("index"));
        assert_eq!(input[0].import, "/web/src/index.tsx");
    }

    #[test]
    fn test_configure_without_minify() {
        let options = BuildOptions::new("/web").minify(false);
        assert!(RolldownBundler::configure(&options).minify.is_none());
    }

    #[test]
    fn test_entry_chunk_name_follows_marker() {
        let options = BuildOptions::new("/web").entry_marker("main");
        assert_eq!(entry_chunk_name(&options), "main");
        let options = BuildOptions::new("/web").entry_marker("");
        assert_eq!(entry_chunk_name(&options), "index");
    }

    #[tokio::test]
    async fn test_missing_entry_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = BuildOptions::new(temp.path());
        let err = RolldownBundler::new().bundle(&options).await.unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }
}
