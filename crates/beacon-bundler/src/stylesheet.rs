//! Utility-class stylesheet compilation.
//!
//! The stylesheet compiler is an external CLI. It is run once per build
//! through the project's package manager and must write the compiled file to
//! [`BuildOptions::stylesheet_output`].

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::options::BuildOptions;
use crate::{Error, Result};

/// Longest stderr excerpt carried into an error.
const MAX_STDERR_LEN: usize = 4 * 1024;

/// Compiles the design source into the output stylesheet.
#[async_trait]
pub trait StylesheetCompiler: Send + Sync {
    /// Write the compiled stylesheet to `options.stylesheet_output()`.
    async fn compile(&self, options: &BuildOptions) -> Result<()>;
}

/// Package managers able to run the stylesheet CLI from project dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pnpm,
    Npm,
    Bun,
    Deno,
}

impl PackageManager {
    /// Detect from the `packageManager` field of package.json, then lockfiles.
    ///
    /// Falls back to npm when package.json exists; `None` otherwise.
    pub fn detect(project_root: &Path) -> Option<Self> {
        let package_json_path = project_root.join("package.json");

        if let Ok(content) = std::fs::read_to_string(&package_json_path) {
            let declared = serde_json::from_str::<serde_json::Value>(&content)
                .ok()
                .and_then(|parsed| {
                    parsed
                        .get("packageManager")
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                });

            if let Some(pm) = declared {
                if pm.starts_with("pnpm") {
                    return Some(Self::Pnpm);
                } else if pm.starts_with("bun") {
                    return Some(Self::Bun);
                } else if pm.starts_with("npm") {
                    return Some(Self::Npm);
                }
            }
        }

        let lockfiles = [
            ("pnpm-lock.yaml", Self::Pnpm),
            ("bun.lockb", Self::Bun),
            ("bun.lock", Self::Bun),
            ("deno.lock", Self::Deno),
            ("package-lock.json", Self::Npm),
        ];
        for (lockfile, pm) in lockfiles {
            if project_root.join(lockfile).exists() {
                return Some(pm);
            }
        }

        package_json_path.exists().then_some(Self::Npm)
    }

    /// Program and leading arguments that run the stylesheet CLI.
    pub fn command_prefix(&self) -> &'static [&'static str] {
        match self {
            Self::Pnpm => &["pnpm", "exec", "tailwindcss"],
            Self::Npm => &["npx", "--no-install", "tailwindcss"],
            Self::Bun => &["bunx", "tailwindcss"],
            Self::Deno => &["deno", "run", "--allow-all", "npm:@tailwindcss/cli"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Npm => "npm",
            Self::Bun => "bun",
            Self::Deno => "deno",
        }
    }
}

/// Runs `tailwindcss -i <source> -o <output> --minify`.
#[derive(Debug, Clone, Default)]
pub struct TailwindCli {
    package_manager: Option<PackageManager>,
}

impl TailwindCli {
    /// Detect the package manager at compile time from the project root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always use `package_manager`.
    pub fn with_package_manager(package_manager: PackageManager) -> Self {
        Self {
            package_manager: Some(package_manager),
        }
    }

    /// Full argument vector for one invocation.
    pub fn command_line(&self, options: &BuildOptions) -> Vec<String> {
        let package_manager = self
            .package_manager
            .or_else(|| PackageManager::detect(&options.root))
            .unwrap_or(PackageManager::Npm);

        let mut args: Vec<String> = package_manager
            .command_prefix()
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push("-i".to_string());
        args.push(options.stylesheet.to_string_lossy().into_owned());
        args.push("-o".to_string());
        args.push(options.stylesheet_output().to_string_lossy().into_owned());
        args.push("--minify".to_string());
        args
    }
}

#[async_trait]
impl StylesheetCompiler for TailwindCli {
    async fn compile(&self, options: &BuildOptions) -> Result<()> {
        if !options.stylesheet.is_file() {
            return Err(Error::SourceNotFound(options.stylesheet.clone()));
        }

        let args = self.command_line(options);
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::InvalidOutputPath("empty stylesheet command".to_string()))?;
        let rendered = args.join(" ");

        if let Some(parent) = options.stylesheet_output().parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(format!("Failed to create '{}'", parent.display()), e))?;
        }

        tracing::debug!(command = %rendered, "running stylesheet compiler");

        let child = Command::new(program)
            .args(rest)
            .current_dir(&options.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::StylesheetSpawn {
                command: rendered.clone(),
                source,
            })?;

        let output = timeout(
            Duration::from_secs(options.css_timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| Error::StylesheetTimeout {
            timeout_secs: options.css_timeout_secs,
        })?
        .map_err(|source| Error::StylesheetSpawn {
            command: rendered.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(Error::StylesheetExit {
                exit_code: output.status.code().unwrap_or(-1),
                stderr: truncate_stderr(&output.stderr),
            });
        }

        let target = options.stylesheet_output();
        if !target.is_file() {
            return Err(Error::StylesheetMissing(target));
        }

        Ok(())
    }
}

fn truncate_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= MAX_STDERR_LEN {
        return text.to_string();
    }
    let mut end = MAX_STDERR_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_prefixes() {
        assert_eq!(
            PackageManager::Pnpm.command_prefix(),
            &["pnpm", "exec", "tailwindcss"]
        );
        assert_eq!(
            PackageManager::Npm.command_prefix(),
            &["npx", "--no-install", "tailwindcss"]
        );
        assert_eq!(PackageManager::Bun.command_prefix(), &["bunx", "tailwindcss"]);
    }

    #[test]
    fn test_detect_prefers_package_manager_field() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"packageManager":"pnpm@9.1.0"}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("package-lock.json"), "{}").unwrap();

        assert_eq!(PackageManager::detect(temp.path()), Some(PackageManager::Pnpm));
    }

    #[test]
    fn test_detect_from_lockfile() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bun.lockb"), "").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), Some(PackageManager::Bun));
    }

    #[test]
    fn test_detect_defaults_to_npm_with_package_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), Some(PackageManager::Npm));
    }

    #[test]
    fn test_detect_nothing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(temp.path()), None);
    }

    #[test]
    fn test_command_line() {
        let options = BuildOptions::new("/web");
        let args = TailwindCli::with_package_manager(PackageManager::Pnpm).command_line(&options);
        assert_eq!(
            args,
            vec![
                "pnpm",
                "exec",
                "tailwindcss",
                "-i",
                "/web/src/styles/global.css",
                "-o",
                "/web/dist/assets/styles.css",
                "--minify",
            ]
        );
    }

    #[test]
    fn test_truncate_stderr() {
        assert_eq!(truncate_stderr(b"  boom \n"), "boom");
        let long = vec![b'x'; MAX_STDERR_LEN + 10];
        assert!(truncate_stderr(&long).ends_with('…'));
    }

    #[tokio::test]
    async fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let options = BuildOptions::new(temp.path());
        let err = TailwindCli::new().compile(&options).await.unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }
}
