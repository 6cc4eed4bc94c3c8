use clap::Parser;
use sentiserve_classifiers::{load_layered, ModelSettings};
use sentiserve_core::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Names an optional settings file for the CLI
pub const CONFIG_ENV: &str = "SENTISERVE_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "sentiserve-predict")]
#[command(author, version, about = "Classify the sentiment of a text file", long_about = None)]
#[command(override_usage = "sentiserve-predict <path_to_text_file>")]
pub struct Cli {
    /// Text file to classify
    pub path: PathBuf,
}

/// Settings document read by the CLI
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub model: ModelSettings,
}

impl CliConfig {
    /// Load from the file named by `SENTISERVE_CONFIG`, then `SENTISERVE__*` overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Load from `path`, which must exist when given
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config: Self = load_layered(path, true)?;
        config.model.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use sentiserve_classifiers::Backend;
    use std::io::Write;

    #[test]
    fn test_single_path_argument() {
        let cli = Cli::try_parse_from(["sentiserve-predict", "review.txt"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("review.txt"));
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = Cli::try_parse_from(["sentiserve-predict"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["sentiserve-predict", "a.txt", "b.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "model:\n  backend: lexicon\n  top_k: 0").unwrap();

        let config = CliConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.model.backend, Backend::Lexicon);
        assert_eq!(config.model.top_k, 0);
    }

    #[test]
    fn test_named_config_file_must_exist() {
        assert!(CliConfig::load_from(Some(Path::new("/nonexistent/cli.yaml"))).is_err());
    }
}
