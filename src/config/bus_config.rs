use crate::errors::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;

/// Root structure for loading `[[bus]]` style TOML config
#[derive(Debug, Deserialize)]
pub struct BusConfig {
    #[serde(rename = "bus")]
    pub buses: Vec<BusEntry>,
}

/// One bus controller the port can be bound to
#[derive(Debug, Clone, Deserialize)]
pub struct BusEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: String, // 'type' is a reserved word in Rust, use raw identifier
    pub path: String,
}

impl BusConfig {
    pub fn find(&self, id: &str) -> Option<&BusEntry> {
        self.buses.iter().find(|b| b.id == id)
    }
}

/// Parse bus config from TOML text
pub fn parse_bus_config(content: &str) -> ConfigResult<BusConfig> {
    Ok(toml::from_str(content)?)
}

/// Load bus config file
pub fn load_bus_config(path: &str) -> ConfigResult<BusConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    parse_bus_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bus_tables() {
        let cfg = parse_bus_config(
            r#"
            [[bus]]
            id = "i2c1"
            type = "i2c"
            path = "/dev/i2c-1"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.buses.len(), 1);
        let bus = cfg.find("i2c1").unwrap();
        assert_eq!(bus.r#type, "i2c");
        assert_eq!(bus.path, "/dev/i2c-1");
        assert!(cfg.find("i2c0").is_none());
    }

    #[test]
    fn missing_path_is_a_format_error() {
        let err = parse_bus_config("[[bus]]\nid = \"i2c1\"\ntype = \"i2c\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::FormatError(_)));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_bus_config("/nonexistent/buses.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/buses.toml"));
    }
}
