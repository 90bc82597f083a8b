//! The asset build pipeline.

use std::fmt;
use std::sync::Arc;

use crate::bundler::{BundledFile, RolldownBundler, ScriptBundler};
use crate::manifest::{AssetKind, BuildManifest, ManifestEntry};
use crate::options::BuildOptions;
use crate::shell::SHELL_FILE_NAME;
use crate::stylesheet::{StylesheetCompiler, TailwindCli};
use crate::writer::{copy_tree, reset_dir, resolve_output_path, write_files_atomic};
use crate::{Error, Result};

/// Pipeline stage reported to a progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Scripts,
    Stylesheet,
    PublicAssets,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Scripts => f.write_str("Bundling scripts"),
            BuildStage::Stylesheet => f.write_str("Compiling stylesheet"),
            BuildStage::PublicAssets => f.write_str("Copying public assets"),
        }
    }
}

type ProgressFn = Arc<dyn Fn(BuildStage) + Send + Sync>;

/// Compiles scripts and the stylesheet, copies public assets, and returns
/// the resulting [`BuildManifest`].
///
/// ```no_run
/// # use beacon_bundler::{AssetBuilder, BuildOptions};
/// # async fn run() -> beacon_bundler::Result<()> {
/// let manifest = AssetBuilder::new(BuildOptions::new("."))
///     .build()
///     .await?;
/// println!("{} files", manifest.len());
/// # Ok(()) }
/// ```
pub struct AssetBuilder {
    options: BuildOptions,
    bundler: Arc<dyn ScriptBundler>,
    stylesheet_compiler: Arc<dyn StylesheetCompiler>,
    progress: Option<ProgressFn>,
}

impl fmt::Debug for AssetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AssetBuilder {
    /// Builder using Rolldown and the Tailwind CLI.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            bundler: Arc::new(RolldownBundler::new()),
            stylesheet_compiler: Arc::new(TailwindCli::new()),
            progress: None,
        }
    }

    pub fn with_bundler(mut self, bundler: impl ScriptBundler + 'static) -> Self {
        self.bundler = Arc::new(bundler);
        self
    }

    pub fn with_stylesheet_compiler(mut self, compiler: impl StylesheetCompiler + 'static) -> Self {
        self.stylesheet_compiler = Arc::new(compiler);
        self
    }

    /// Called at the start of each stage.
    pub fn on_progress(mut self, f: impl Fn(BuildStage) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Run the full pipeline.
    ///
    /// Scripts are bundled in memory first; a compile error returns before
    /// anything on disk is touched. After that the previous shell is removed
    /// and the assets directory is cleared, so no hashed file from an earlier
    /// build survives and a build that fails later leaves no shell pointing
    /// at deleted files.
    pub async fn build(&self) -> Result<BuildManifest> {
        let options = &self.options;
        tracing::info!(
            entry = %options.entry.display(),
            out_dir = %options.out_dir.display(),
            "starting build"
        );

        self.report(BuildStage::Scripts);
        let bundled = self.bundler.bundle(options).await?;

        let writes = bundled
            .iter()
            .map(|file| {
                resolve_output_path(&options.out_dir, &file.relative_path)
                    .map(|path| (path, file.contents.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        remove_shell(&options.out_dir)?;
        reset_dir(&options.assets_dir())?;
        write_files_atomic(&writes)?;

        let mut entries = bundled.iter().map(script_entry).collect::<Vec<_>>();

        self.report(BuildStage::Stylesheet);
        self.stylesheet_compiler.compile(options).await?;
        let stylesheet_output = options.stylesheet_output();
        let stylesheet_size = std::fs::metadata(&stylesheet_output)
            .map_err(|_| Error::StylesheetMissing(stylesheet_output.clone()))?
            .len();
        entries.push(ManifestEntry::new(
            options.stylesheet_path.trim_start_matches('/'),
            AssetKind::Css,
            true,
            stylesheet_size,
        ));

        self.report(BuildStage::PublicAssets);
        for (relative_path, size) in copy_tree(&options.public_dir, &options.out_dir)? {
            let kind = AssetKind::from_path(&relative_path);
            entries.push(ManifestEntry::new(relative_path, kind, false, size));
        }

        let manifest = BuildManifest::new(entries);
        tracing::info!(
            files = manifest.len(),
            bytes = manifest.total_size(),
            "build finished"
        );
        Ok(manifest)
    }

    fn report(&self, stage: BuildStage) {
        tracing::debug!(%stage, "build stage");
        if let Some(progress) = &self.progress {
            progress(stage);
        }
    }
}

/// The shell is rewritten only after a complete build.
fn remove_shell(out_dir: &std::path::Path) -> Result<()> {
    let shell = out_dir.join(SHELL_FILE_NAME);
    match std::fs::remove_file(&shell) {
        Ok(()) => {
            tracing::debug!(path = %shell.display(), "removed previous shell");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(
            format!("Failed to remove '{}'", shell.display()),
            e,
        )),
    }
}

fn script_entry(file: &BundledFile) -> ManifestEntry {
    ManifestEntry::new(
        file.relative_path.trim_start_matches('/'),
        AssetKind::from_path(&file.relative_path),
        file.is_entry,
        file.contents.len() as u64,
    )
}
