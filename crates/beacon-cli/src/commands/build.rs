//! `beacon build`.

use std::path::Path;
use std::time::Instant;

use beacon_bundler::{AssetBuilder, BuildManifest, ShellGenerator};

use crate::commands::utils;
use crate::config::BeaconConfig;
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// 1. Load configuration for the project root
/// 2. Bundle scripts, compile the stylesheet, copy public assets
/// 3. Write `index.html` pointing at the new entry script
/// 4. Print a summary
///
/// Any failure aborts; the caller maps it to exit code 1.
pub async fn execute() -> Result<()> {
    let start_time = Instant::now();

    let (root, config) = utils::load_project()?;
    ui::info(&format!("Building {}", config.entry.display()));

    let manifest = build(&config, &root).await?;

    ui::print_build_summary(&manifest, start_time.elapsed());
    ui::success(&format!("Output written to {}", config.out_dir(&root).display()));
    Ok(())
}

/// Full build for `config`, returning the manifest.
pub async fn build(config: &BeaconConfig, root: &Path) -> Result<BuildManifest> {
    let options = config.build_options(root);
    let out_dir = options.out_dir.clone();

    let spinner = ui::Spinner::new("Bundling scripts");
    let progress = spinner.handle();

    let result = AssetBuilder::new(options)
        .on_progress(move |stage| progress.set_message(stage.to_string()))
        .build()
        .await;

    let manifest = match result {
        Ok(manifest) => manifest,
        Err(e) => {
            spinner.fail("Build failed");
            return Err(e.into());
        }
    };

    spinner.set_message("Writing HTML shell");
    let shell = ShellGenerator::new(config.entry_marker.clone());
    let selection = shell.select_entry(&manifest);
    if let Err(e) = shell.write(&out_dir, &manifest) {
        spinner.fail("Build failed");
        return Err(e.into());
    }

    spinner.finish(&format!("Built {} files", manifest.len()));
    if selection.is_fallback() {
        ui::warning(&format!(
            "No entry script matched '{}'; index.html references {}",
            config.entry_marker,
            selection.url_path()
        ));
    }

    Ok(manifest)
}
