//! Stream options.
//!
//! Hosts build one [`CddaConfig`] before opening a stream, usually by
//! deserializing a partial option set on top of the defaults.

use serde::Deserialize;

use crate::{
    drive::default_device,
    error::{Error, Result},
    types::Span,
};

/// Options controlling how a CD audio stream is opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CddaConfig {
    /// Device path; the platform default when unset
    pub device: Option<String>,
    /// Tracks to play, 0 meaning the disc boundary
    pub span: Span,
    /// Drive read speed, 0 leaves the drive alone
    pub speed: i32,
    /// Correction level: 0 none, 1 overlap only, 2 full
    pub paranoia: i32,
    /// Generic SCSI device to use instead of the block device
    pub generic_dev: Option<String>,
    /// Sectors per drive read, 0 keeps the drive default
    pub sector_size: i32,
    /// Overlap search length: negative unset, 0 off, positive forced on
    pub search_overlap: i32,
    /// Subtract the first track's start from every TOC entry
    pub toc_bias: bool,
    /// Sectors added to every TOC entry
    pub toc_offset: i32,
    /// Never skip unreadable sectors
    pub no_skip: bool,
}

impl Default for CddaConfig {
    fn default() -> Self {
        Self {
            device: None,
            span: Span::default(),
            speed: 0,
            paranoia: 0,
            generic_dev: None,
            sector_size: 0,
            search_overlap: -1,
            toc_bias: false,
            toc_offset: 0,
            no_skip: false,
        }
    }
}

impl CddaConfig {
    /// Check every option against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOption` naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        check_range("speed", self.speed, 0, 100)?;
        check_range("paranoia", self.paranoia, 0, 2)?;
        check_range("sector-size", self.sector_size, 0, 100)?;
        check_range("overlap", self.search_overlap, -1, 75)?;
        Ok(())
    }

    /// Device the drive should be identified through.
    ///
    /// The generic device wins over the block device; with neither set the
    /// platform default is used.
    #[must_use]
    pub fn device_path(&self) -> String {
        self.generic_dev
            .as_deref()
            .or(self.device.as_deref())
            .filter(|path| !path.is_empty())
            .map_or_else(default_device, String::from)
    }

    /// Correction level in the form the mode resolver takes.
    #[must_use]
    pub fn paranoia_level(&self) -> u8 {
        u8::try_from(self.paranoia.max(0)).unwrap_or(u8::MAX)
    }
}

fn check_range(name: &'static str, value: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            value: i64::from(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CddaConfig::default();
        assert_eq!(config.search_overlap, -1);
        assert_eq!(config.span, Span::new(0, 0));
        assert!(!config.no_skip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_options_merge_over_defaults() {
        let config: CddaConfig = serde_json::from_str(
            r#"{"device": "/dev/sr1", "span": {"first": 2, "last": 4}, "no-skip": true}"#,
        )
        .unwrap();
        assert_eq!(config.device.as_deref(), Some("/dev/sr1"));
        assert_eq!(config.span, Span::new(2, 4));
        assert!(config.no_skip);
        assert_eq!(config.search_overlap, -1);
        assert_eq!(config.paranoia, 0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = CddaConfig {
            paranoia: 3,
            ..CddaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidOption {
                name: "paranoia",
                value: 3
            })
        ));

        let config = CddaConfig {
            search_overlap: 76,
            ..CddaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CddaConfig {
            speed: 101,
            ..CddaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_path_precedence() {
        let mut config = CddaConfig::default();
        assert_eq!(config.device_path(), default_device());

        config.device = Some("/dev/sr0".to_string());
        assert_eq!(config.device_path(), "/dev/sr0");

        config.generic_dev = Some("/dev/sg1".to_string());
        assert_eq!(config.device_path(), "/dev/sg1");
    }

    #[test]
    fn test_paranoia_level() {
        let config = CddaConfig {
            paranoia: 2,
            ..CddaConfig::default()
        };
        assert_eq!(config.paranoia_level(), 2);
    }
}
