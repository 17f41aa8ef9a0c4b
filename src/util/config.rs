//! Configuration file support.
//!
//! An optional `imgbuild.toml` in the working directory adjusts how the
//! external tool is called and how results are reported. The
//! `IMGBUILD_CONFIG` environment variable names an alternate file. Every key
//! has a default, and the defaults reproduce the fixed `make -f build.mk`
//! contract.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::shell::ColorChoice;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "imgbuild.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "IMGBUILD_CONFIG";

/// imgbuild configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool settings
    pub tool: ToolConfig,

    /// Build output settings
    pub output: OutputConfig,

    /// Reporting settings
    pub report: ReportConfig,
}

/// How the external tool is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Program to run, looked up in PATH unless it contains a separator
    pub program: PathBuf,

    /// Makefile passed with `-f`; a relative path is taken from the config
    /// file's directory
    pub makefile: PathBuf,

    /// Target that removes build outputs
    pub clean_target: String,

    /// Variable assignment that turns on debug instrumentation
    pub debug_define: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            program: PathBuf::from("make"),
            makefile: PathBuf::from("build.mk"),
            clean_target: "clean".to_string(),
            debug_define: "DEBUG=1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// The runnable image the build produces
    pub artifact: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            artifact: PathBuf::from("out/bin/main"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Exit with a distinct status when the build fails
    pub strict_exit: bool,

    /// Color output: "auto", "always" or "never"
    pub color: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config.anchor_to(path);
        Ok(config)
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
            let mut config = Self::default();
            config.anchor_to(path);
            config
        })
    }

    /// Resolve a relative makefile against the directory holding `config_file`.
    fn anchor_to(&mut self, config_file: &Path) {
        let Some(dir) = config_file.parent() else {
            return;
        };
        if self.tool.makefile.is_relative() {
            self.tool.makefile = dir.join(&self.tool.makefile);
        }
        tracing::debug!("makefile: {}", self.tool.makefile.display());
    }

    /// Parsed color choice; an invalid value falls back to auto.
    pub fn color(&self) -> ColorChoice {
        match self.report.color.as_deref().map(str::parse::<ColorChoice>) {
            Some(Ok(choice)) => choice,
            Some(Err(e)) => {
                tracing::warn!("{}", e);
                ColorChoice::Auto
            }
            None => ColorChoice::Auto,
        }
    }
}

/// Path of the config file to use: `IMGBUILD_CONFIG` if set, otherwise
/// `imgbuild.toml` in `cwd`.
pub fn config_path(cwd: &Path) -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => cwd.join(CONFIG_FILE_NAME),
    }
}

/// Load the configuration that applies to `cwd`.
pub fn load_config(cwd: &Path) -> Config {
    Config::load_or_default(&config_path(cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tool.program, PathBuf::from("make"));
        assert_eq!(config.tool.makefile, PathBuf::from("build.mk"));
        assert_eq!(config.tool.clean_target, "clean");
        assert_eq!(config.tool.debug_define, "DEBUG=1");
        assert_eq!(config.output.artifact, PathBuf::from("out/bin/main"));
        assert!(!config.report.strict_exit);
        assert_eq!(config.color(), ColorChoice::Auto);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
[tool]
makefile = "image.mk"
debug-define = "DEBUG=yes"

[report]
strict-exit = true
color = "never"
"#,
        )
        .unwrap();

        assert_eq!(config.tool.program, PathBuf::from("make"));
        assert_eq!(config.tool.makefile, PathBuf::from("image.mk"));
        assert_eq!(config.tool.debug_define, "DEBUG=yes");
        assert_eq!(config.output.artifact, PathBuf::from("out/bin/main"));
        assert!(config.report.strict_exit);
        assert_eq!(config.color(), ColorChoice::Never);
    }

    #[test]
    fn test_invalid_color_falls_back_to_auto() {
        let mut config = Config::default();
        config.report.color = Some("rainbow".to_string());
        assert_eq!(config.color(), ColorChoice::Auto);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join(CONFIG_FILE_NAME));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tool\nprogram = ").unwrap();

        assert!(Config::load(&path).is_err());
        let config = Config::load_or_default(&path);
        assert_eq!(config.report, Config::default().report);
        assert_eq!(config.tool.program, PathBuf::from("make"));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[output]\nartifact = \"build/kernel.elf\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.artifact, PathBuf::from("build/kernel.elf"));
    }

    #[test]
    fn test_relative_makefile_follows_config_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tool]\nmakefile = 'mk/image.mk'\n").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.tool.makefile, tmp.path().join("mk/image.mk"));

        // A config with no [tool] section still anchors the default makefile.
        std::fs::write(&path, "[report]\nstrict-exit = true\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.tool.makefile, tmp.path().join("build.mk"));
    }

    #[test]
    fn test_absolute_makefile_is_kept() {
        let tmp = TempDir::new().unwrap();
        let makefile = tmp.path().join("elsewhere").join("build.mk");
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, format!("[tool]\nmakefile = '{}'\n", makefile.display())).unwrap();

        assert_eq!(Config::load(&path).unwrap().tool.makefile, makefile);
    }

    #[test]
    fn test_malformed_config_still_anchors_makefile() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tool\n").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.tool.makefile, tmp.path().join("build.mk"));
    }
}
