use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::convert::ConvertOptions;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub remove_empty_net: bool,
    pub remove_non_bottom_pins: bool,
    /// Emit via and segment sections when writing testcases.
    pub write_segments: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            remove_empty_net: false,
            remove_non_bottom_pins: false,
            write_segments: true,
        }
    }
}

impl ConvertConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            remove_empty_net: self.remove_empty_net,
            remove_non_bottom_pins: self.remove_non_bottom_pins,
        }
    }
}

pub fn parse_convert_config(path: impl AsRef<Path>) -> Result<ConvertConfig> {
    let contents = fs::read_to_string(path)?;
    let data = toml::from_str(&contents)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config() -> Result<()> {
        let config = parse_convert_config(concat!(env!("CARGO_MANIFEST_DIR"), "/gridconv.toml"))?;
        assert_eq!(config, ConvertConfig::default());
        assert_eq!(config.options(), ConvertOptions::default());
        Ok(())
    }

    #[test]
    fn test_missing_keys_take_defaults() -> Result<()> {
        let config: ConvertConfig = toml::from_str("remove_non_bottom_pins = true\n")?;
        assert!(config.remove_non_bottom_pins);
        assert!(!config.remove_empty_net);
        assert!(config.write_segments);
        Ok(())
    }

    #[test]
    fn test_unknown_value_type_is_rejected() {
        assert!(toml::from_str::<ConvertConfig>("write_segments = \"yes\"\n").is_err());
    }
}
