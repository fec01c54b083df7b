use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default capacity of each chunk buffer, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Smallest buffer that still holds one whole Base32 group.
pub const MIN_BUFFER_SIZE: usize = 8;

/// Largest accepted buffer capacity, 64 MiB.
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// What decoding does with a byte that is not in the alphabet.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Stop with [`DecodeError::InvalidSymbol`](crate::DecodeError).
    #[default]
    Strict,
    /// Read the byte as the alphabet's first symbol (value zero).
    Lenient,
}

/// Decode behaviour resolved from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub policy: DecodePolicy,
    /// Skip `\r` and `\n` in encoded input.
    pub ignore_newlines: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            policy: DecodePolicy::Strict,
            ignore_newlines: true,
        }
    }
}

/// `[buffer]` table.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct BufferSettings {
    /// Capacity of each chunk buffer in bytes
    #[serde(default)]
    pub size: Option<usize>,
}

/// `[decode]` table.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DecodeSettings {
    #[serde(default)]
    pub policy: Option<DecodePolicy>,
    #[serde(default)]
    pub ignore_newlines: Option<bool>,
}

/// Transcoder settings loaded from TOML.
///
/// Every field is optional so that a later file only overrides the keys it
/// actually sets.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub buffer: BufferSettings,
    #[serde(default)]
    pub decode: DecodeSettings,
}

impl Settings {
    /// Parses settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the built-in defaults bundled with the library.
    pub fn load_default() -> Result<Self, ConfigError> {
        let content = include_str!("../../rfc4648.toml");
        let settings = Self::from_toml(content).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a custom file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in defaults (from library)
    /// 2. `~/.config/rfc4648/config.toml` (user overrides)
    /// 3. `./rfc4648.toml` (project-local overrides)
    ///
    /// A file that fails to load is skipped with a warning.
    pub fn load_with_overrides() -> Result<Self, ConfigError> {
        let mut settings = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("rfc4648").join("config.toml");
            settings.merge_optional(&user_config_path);
        }

        settings.merge_optional(Path::new("rfc4648.toml"));

        Ok(settings)
    }

    fn merge_optional(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(overrides) => {
                tracing::debug!(path = %path.display(), "loaded config overrides");
                self.merge(overrides);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config: {e}");
            }
        }
    }

    /// Merges another configuration into this one.
    ///
    /// Keys set in `other` replace the corresponding keys in `self`.
    pub fn merge(&mut self, other: Settings) {
        if other.buffer.size.is_some() {
            self.buffer.size = other.buffer.size;
        }
        if other.decode.policy.is_some() {
            self.decode.policy = other.decode.policy;
        }
        if other.decode.ignore_newlines.is_some() {
            self.decode.ignore_newlines = other.decode.ignore_newlines;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.buffer.size {
            Some(size) if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&size) => {
                Err(ConfigError::InvalidBufferSize { size })
            }
            _ => Ok(()),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        let defaults = DecodeOptions::default();
        DecodeOptions {
            policy: self.decode.policy.unwrap_or(defaults.policy),
            ignore_newlines: self.decode.ignore_newlines.unwrap_or(defaults.ignore_newlines),
        }
    }
}

/// Errors raised while loading [`Settings`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid settings TOML; `path` is `None` for the
    /// built-in defaults
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    /// `buffer.size` is below [`MIN_BUFFER_SIZE`] or above [`MAX_BUFFER_SIZE`]
    InvalidBufferSize { size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config {}: {}", path.display(), source),
            ConfigError::Parse { path: None, source } => {
                write!(f, "invalid built-in config: {}", source)
            }
            ConfigError::InvalidBufferSize { size } => write!(
                f,
                "buffer.size = {} is out of range, must be between {} and {}",
                size, MIN_BUFFER_SIZE, MAX_BUFFER_SIZE
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidBufferSize { .. } => None,
        }
    }
}
