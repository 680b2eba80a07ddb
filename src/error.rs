//! Configuration loading errors
//!
//! The simulation itself never fails; only parsing and validating external
//! configuration (tuning files, level packs) can.

use std::fmt;

/// Error raised while loading tuning or level data
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(std::io::Error),
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// A level pack contained no levels
    EmptyLevelPack,
    /// A level contained no enemies, so it could never be won or lost
    EmptyLevel { level: usize },
    /// An enemy spawn descriptor was unusable
    InvalidEnemy {
        level: usize,
        index: usize,
        reason: &'static str,
    },
    /// A numeric setting was outside its usable range
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read file: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid JSON: {}", err),
            ConfigError::EmptyLevelPack => write!(f, "level pack defines no levels"),
            ConfigError::EmptyLevel { level } => {
                write!(f, "level {} defines no enemies", level + 1)
            }
            ConfigError::InvalidEnemy {
                level,
                index,
                reason,
            } => write!(f, "level {} enemy #{}: {}", level + 1, index, reason),
            ConfigError::OutOfRange {
                name,
                value,
                expected,
            } => write!(f, "'{}' = {} is outside {}", name, value, expected),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parse_error_keeps_source() {
        let err: ConfigError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "levels.json");
        let err = ConfigError::from(io);
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("levels.json"));
    }

    #[test]
    fn test_levels_are_reported_one_based() {
        let err = ConfigError::InvalidEnemy {
            level: 0,
            index: 2,
            reason: "health must be at least 1",
        };
        assert_eq!(err.to_string(), "level 1 enemy #2: health must be at least 1");
        assert!(err.source().is_none());
    }
}
