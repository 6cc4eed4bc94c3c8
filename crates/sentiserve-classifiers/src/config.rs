//! Model settings and layered configuration loading

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sentiserve_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Default model, a DistilBERT fine-tuned on SST-2
pub const DEFAULT_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Prefix for environment overrides, e.g. `SENTISERVE__MODEL__CACHE_DIR`
pub const ENV_PREFIX: &str = "SENTISERVE";

/// Which implementation backs the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// DistilBERT sequence classification with Candle
    #[default]
    Candle,
    /// Offline keyword lexicon
    Lexicon,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candle" => Ok(Self::Candle),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!("unknown backend '{other}' (expected candle or lexicon)")),
        }
    }
}

/// Device specification (for config files)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

/// Settings for the single model a process serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub backend: Backend,

    /// Hugging Face Hub model id
    pub model_id: String,

    /// Hub revision (branch, tag or commit)
    pub revision: String,

    /// Local model directory; skips the hub entirely when set
    pub model_path: Option<PathBuf>,

    /// Hub cache directory; the hub default is used when unset
    pub cache_dir: Option<PathBuf>,

    pub device: DeviceSpec,

    /// Maximum sequence length in tokens
    pub max_length: usize,

    /// Number of records returned per call, best first. `0` returns every label.
    pub top_k: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: "main".to_string(),
            model_path: None,
            cache_dir: None,
            device: DeviceSpec::default(),
            max_length: 512,
            top_k: 1,
        }
    }
}

impl ModelSettings {
    /// Offline settings using the lexicon backend
    pub fn lexicon() -> Self {
        Self {
            backend: Backend::Lexicon,
            ..Default::default()
        }
    }

    /// Cache directory the hub client will use
    pub fn resolved_cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        if let Ok(home) = std::env::var("HF_HOME") {
            return PathBuf::from(home).join("hub");
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cache")
            .join("huggingface")
            .join("hub")
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::Candle
            && self.model_path.is_none()
            && self.model_id.trim().is_empty()
        {
            return Err(Error::config("model_id must not be empty"));
        }
        if self.max_length == 0 {
            return Err(Error::config("max_length must be greater than zero"));
        }
        Ok(())
    }
}

/// Load a settings document from an optional file plus `SENTISERVE__*` environment overrides.
///
/// The file format follows its extension (`.yaml`, `.toml`, `.json`). When
/// `required` is false a missing file is skipped.
pub fn load_layered<T: DeserializeOwned>(path: Option<&Path>, required: bool) -> Result<T> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if required && !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| Error::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Document {
        model: ModelSettings,
    }

    #[test]
    fn test_defaults() {
        let settings = ModelSettings::default();
        assert_eq!(settings.backend, Backend::Candle);
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
        assert_eq!(settings.revision, "main");
        assert_eq!(settings.max_length, 512);
        assert_eq!(settings.top_k, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_model_settings_yaml() {
        let yaml = r#"
backend: lexicon
cache_dir: /app/model_cache
device: cuda
top_k: 0
"#;
        let settings: ModelSettings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.backend, Backend::Lexicon);
        assert_eq!(settings.cache_dir, Some(PathBuf::from("/app/model_cache")));
        assert_eq!(settings.resolved_cache_dir(), PathBuf::from("/app/model_cache"));
        assert_eq!(settings.device, DeviceSpec::Cuda);
        assert_eq!(settings.top_k, 0);
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Lexicon".parse::<Backend>(), Ok(Backend::Lexicon));
        assert_eq!("candle".parse::<Backend>(), Ok(Backend::Candle));
        assert!("onnx".parse::<Backend>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = ModelSettings {
            model_id: "  ".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = ModelSettings {
            max_length: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = ModelSettings {
            model_id: String::new(),
            ..ModelSettings::lexicon()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_layered_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "model:\n  backend: lexicon\n  max_length: 128").unwrap();

        let doc: Document = load_layered(Some(file.path()), true).unwrap();
        assert_eq!(doc.model.backend, Backend::Lexicon);
        assert_eq!(doc.model.max_length, 128);
        assert_eq!(doc.model.revision, "main");
    }

    #[test]
    fn test_load_layered_missing_file() {
        let path = Path::new("/definitely/not/here/sentiserve.yaml");

        let doc: Document = load_layered(Some(path), false).unwrap();
        assert_eq!(doc.model, ModelSettings::default());

        let err = load_layered::<Document>(Some(path), true).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
