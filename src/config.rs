use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub data_csv: PathBuf,
    #[serde(default)]
    pub columns: ColumnNames,
    /// Positional indices (0-based) hidden from the raw-data panel.
    /// The shipped dataset carries prefecture code and reading columns
    /// there that only clutter the table.
    #[serde(default = "default_dropped_columns")]
    pub dropped_display_columns: Vec<usize>,
}

/// Header names of the four columns the pipeline reads. Defaults match
/// the MHLW municipality dataset, which labels them in Japanese.
#[derive(Debug, Deserialize, Clone)]
pub struct ColumnNames {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_longitude_column")]
    pub longitude: String,
    #[serde(default = "default_latitude_column")]
    pub latitude: String,
    #[serde(default = "default_rate_column")]
    pub rate: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            name: default_name_column(),
            longitude: default_longitude_column(),
            latitude: default_latitude_column(),
            rate: default_rate_column(),
        }
    }
}

fn default_name_column() -> String {
    "市区町村".to_string()
}

fn default_longitude_column() -> String {
    "longitude".to_string()
}

fn default_latitude_column() -> String {
    "latitude".to_string()
}

fn default_rate_column() -> String {
    "合計特殊出生率".to_string()
}

fn default_dropped_columns() -> Vec<usize> {
    vec![1, 2, 4]
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub page_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_column_defaults() {
        let toml_src = r#"
            [input]
            data_csv = "data/tfr_municipalities.csv"

            [output]
            page_dir = "output"

            [server]
            port = 8080
        "#;
        let config: AppConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.input.columns.name, "市区町村");
        assert_eq!(config.input.columns.rate, "合計特殊出生率");
        assert_eq!(config.input.dropped_display_columns, vec![1, 2, 4]);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn column_names_can_be_overridden() {
        let toml_src = r#"
            [input]
            data_csv = "in.csv"
            dropped_display_columns = []

            [input.columns]
            name = "municipality"
            rate = "tfr"

            [output]
            page_dir = "out"

            [server]
            port = 3000
        "#;
        let config: AppConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.input.columns.name, "municipality");
        assert_eq!(config.input.columns.rate, "tfr");
        // Unset names still default.
        assert_eq!(config.input.columns.longitude, "longitude");
        assert!(config.input.dropped_display_columns.is_empty());
    }
}
