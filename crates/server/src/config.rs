//! Server configuration, stored as JSON.
//!
//! Every field has a default, so a partial file (or no file at all) is a
//! valid configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::net::line_wrapper::{self, DEFAULT_PREFIX, LineWrapper, MAX_PREFIX_LEN};
use crate::net::packet::Packet;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Map loaded at startup. `.fcm` (native) or `.dat` (legacy).
    pub map_file: PathBuf,
    /// Hand loaded maps to the physics layer.
    pub physics: bool,
    /// Size of the flatgrass map generated when `map_file` does not exist.
    pub default_map: MapSize,
    pub chat: ChatConfig,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSize {
    pub width: i32,
    pub length: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Written at the start of every continuation line of a wrapped message.
    pub continuation_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            map_file: PathBuf::from("map.fcm"),
            physics: false,
            default_map: MapSize::default(),
            chat: ChatConfig::default(),
            log_level: "info".into(),
        }
    }
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            width: 256,
            length: 256,
            height: 64,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            continuation_prefix: String::from_utf8_lossy(DEFAULT_PREFIX).into_owned(),
        }
    }
}

impl ChatConfig {
    /// Packets for one outgoing message, continued with the configured prefix.
    pub fn wrap(&self, message: &str) -> Vec<Packet> {
        LineWrapper::with_prefix(message, self.continuation_prefix.as_bytes()).collect()
    }
}

impl ServerConfig {
    /// Read `path`. A missing file yields the defaults.
    ///
    /// A chat prefix the line wrapper cannot use is rejected here rather
    /// than when the first message is sent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !line_wrapper::is_valid_prefix(config.chat.continuation_prefix.as_bytes()) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "chat.continuation_prefix must be at most {} bytes with no newline",
                    MAX_PREFIX_LEN
                ),
            });
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let text = serde_json::to_string_pretty(self)
            .map_err(io::Error::from)
            .map_err(write_err)?;
        fs::write(path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{ "physics": true, "default_map": { "height": 128 } }"#).unwrap();
        assert!(config.physics);
        assert_eq!(config.map_file, PathBuf::from("map.fcm"));
        assert_eq!(config.default_map, MapSize { width: 256, length: 256, height: 128 });
        assert_eq!(config.chat.continuation_prefix, "> ");
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("classic_server_test_no_such_config.json");
        let _ = fs::remove_file(&path);
        assert_eq!(ServerConfig::load(&path).unwrap(), ServerConfig::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let path = std::env::temp_dir().join("classic_server_test_config.json");
        let mut config = ServerConfig::default();
        config.map_file = PathBuf::from("levels/main.dat");
        config.chat.continuation_prefix = "&7| ".into();
        config.save(&path).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap(), config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unusable_prefix_is_rejected() {
        let path = std::env::temp_dir().join("classic_server_test_prefix_config.json");
        let too_long = ">".repeat(MAX_PREFIX_LEN + 1);
        for prefix in ["> \\n", too_long.as_str()] {
            fs::write(&path, format!(r#"{{ "chat": {{ "continuation_prefix": "{}" }} }}"#, prefix))
                .unwrap();
            assert!(matches!(ServerConfig::load(&path), Err(ConfigError::Invalid { .. })));
        }
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn chat_wrap_uses_configured_prefix() {
        let chat = ChatConfig {
            continuation_prefix: "| ".into(),
        };
        let packets = chat.wrap(&"a".repeat(70));
        assert_eq!(packets.len(), 2);
        assert_eq!(&packets[1].payload()[..8], b"| aaaaaa");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join("classic_server_test_bad_config.json");
        fs::write(&path, "{ physics: yes").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }
}
