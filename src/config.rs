//! Command-line tool configuration
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! no file) is fine.  The demux core takes no configuration beyond the URL.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error, or an `EnvFilter` directive)
    pub level: String,

    /// Output format (json, pretty)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "avdemux=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// FFmpeg library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// FFmpeg's own log level (quiet, error, warning, info, verbose, debug, trace)
    pub log_level: String,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            log_level: "warning".to_string(),
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Log a line per dispatched packet
    pub print_packets: bool,

    /// Print the final summary as JSON instead of text
    pub json: bool,

    /// Stop after this many read iterations
    pub max_packets: Option<u64>,
}

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// FFmpeg configuration
    pub ffmpeg: FfmpegConfig,

    /// Report configuration
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// FFmpeg log level as an `AV_LOG_*` value
    pub fn av_log_level(&self) -> Result<i32> {
        crate::ffmpeg::av_log_level(&self.ffmpeg.log_level).ok_or_else(|| {
            Error::Config(format!("unknown FFmpeg log level: {}", self.ffmpeg.log_level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.ffmpeg.log_level, "warning");
        assert!(!config.report.print_packets);
        assert_eq!(config.report.max_packets, None);
    }

    #[test]
    fn test_partial_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[logging]\nformat = \"json\"\n\n[report]\nmax_packets = 50").unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "avdemux=info");
        assert_eq!(config.report.max_packets, Some(50));
        assert_eq!(config.ffmpeg.log_level, "warning");
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = AppConfig::default();
        config.report.print_packets = true;
        config.ffmpeg.log_level = "error".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        config.to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::from_file(temp_file.path()).unwrap();
        assert!(loaded.report.print_packets);
        assert_eq!(loaded.ffmpeg.log_level, "error");
    }

    #[test]
    fn test_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[logging]\nformat = \"xml\"").unwrap();
        assert!(matches!(
            AppConfig::from_file(temp_file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_av_log_level() {
        let mut config = AppConfig::default();
        assert!(config.av_log_level().is_ok());
        config.ffmpeg.log_level = "chatty".to_string();
        assert!(config.av_log_level().is_err());
    }
}
