//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[data]
path = data/ml_predictions.csv

[simulation]
ticker = AAPL
initial_capital = 10000.0

[report]
output_dir = out
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("data/ml_predictions.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("simulation", "ticker"),
            Some("AAPL".to_string())
        );
        assert_eq!(
            adapter.get_string("report", "output_dir"),
            Some("out".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[simulation]\nticker = MSFT\n").unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "ticker"), None);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nstop_loss = -0.04\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "stop_loss", 0.0), -0.04);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[simulation]\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "take_profit", 0.05), 0.05);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ninitial_capital = plenty\n").unwrap();
        assert_eq!(
            adapter.get_double("simulation", "initial_capital", 10_000.0),
            10_000.0
        );
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[simulation]\nticker = TSLA\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "ticker"),
            Some("TSLA".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/predtrader.ini");
        assert!(result.is_err());
    }
}
