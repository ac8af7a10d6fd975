//! Batch configuration, optionally loaded from a TOML file
//!
//! Every key in the file is optional. Values given on the command line are
//! merged over the file before it is turned into a [`BatchConfig`].

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::size::{SizeError, SizeSet, SizeSpec};

/// Rasterizer used when none is configured
pub const DEFAULT_RASTERIZER: &str = "rsvg-convert";

/// File name of the intermediate SVG inside the output directory
pub const DEFAULT_TEMP_NAME: &str = "temp_resized.svg";

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid sizes: {0}")]
    InvalidSizes(#[from] SizeError),
    #[error("no source SVG given (pass a file or set `source` in the config)")]
    MissingSource,
    #[error("temporary path '{}' is the source SVG; choose another temp_path", .0.display())]
    TempPathIsSource(PathBuf),
}

/// Raw contents of a config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub sizes: Option<Vec<u32>>,
    pub temp_path: Option<PathBuf>,
    pub keep_going: Option<bool>,
    pub rasterizer: Option<RasterizerConfig>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// External rasterizer program and extra leading arguments
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RasterizerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RASTERIZER.to_string(),
            args: Vec::new(),
        }
    }
}

impl RasterizerConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Validated configuration for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Source SVG
    pub source: PathBuf,
    /// Directory receiving `{size}x{size}.png`
    pub output_dir: PathBuf,
    pub sizes: SizeSet,
    /// Intermediate SVG path; defaults to `temp_resized.svg` inside `output_dir`
    pub temp_path: Option<PathBuf>,
    pub rasterizer: RasterizerConfig,
    /// Record per-size rasterizer failures and continue instead of aborting
    pub keep_going: bool,
}

impl BatchConfig {
    /// Create a configuration with defaults for everything but the source
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: PathBuf::from("."),
            sizes: SizeSet::default(),
            temp_path: None,
            rasterizer: RasterizerConfig::default(),
            keep_going: false,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_sizes(mut self, sizes: SizeSet) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_path = Some(path.into());
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: RasterizerConfig) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(DEFAULT_TEMP_NAME))
    }

    pub fn artifact_path(&self, size: SizeSpec) -> PathBuf {
        self.output_dir.join(size.artifact_name())
    }

    /// Reject settings that would make a run overwrite its own source
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temp_path = self.temp_path();
        if same_path(&temp_path, &self.source) {
            return Err(ConfigError::TempPathIsSource(temp_path));
        }
        Ok(())
    }
}

/// True when both paths name the same file, either spelled the same way
/// (ignoring `.` components) or resolving to the same location on disk
fn same_path(a: &Path, b: &Path) -> bool {
    if lexical(a) == lexical(b) {
        return true;
    }
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn lexical(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Canonical form of `path`, or of its parent joined with the file name when
/// the file itself does not exist yet
fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

impl TryFrom<ConfigFile> for BatchConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let source = file.source.ok_or(ConfigError::MissingSource)?;
        let mut config = BatchConfig::new(source);
        if let Some(dir) = file.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(sizes) = file.sizes {
            config = config.with_sizes(SizeSet::new(sizes)?);
        }
        config.temp_path = file.temp_path;
        config.rasterizer = file.rasterizer.unwrap_or_default();
        config.keep_going = file.keep_going.unwrap_or(false);
        config.validate()?;
        Ok(config)
    }
}
