//! File transport: read a text file and classify its contents

use sentiserve_classifiers::{service::classify_input, ClassifierLoader};
use sentiserve_core::{Error, InputText, LabelScore, Result};
use std::path::Path;
use tracing::{debug, info};

/// Classify the UTF-8 contents of the file at `path`.
///
/// The file is checked before the model is loaded, so a missing or blank
/// file never triggers a model download.
pub async fn classify_file(loader: &ClassifierLoader, path: &Path) -> Result<Vec<LabelScore>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::file_read(path, source))?;
    let input = InputText::with_message(
        text,
        &format!("file is empty: {}", path.display()),
    )?;
    debug!("Read {} bytes from {}", input.len(), path.display());

    info!("Loading model...");
    let classifier = loader.load_classifier().await?;
    info!("Model loaded successfully");

    classify_input(&classifier, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiserve_classifiers::ModelSettings;
    use std::io::Write;

    #[tokio::test]
    async fn test_classify_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "I love this, it is excellent").unwrap();

        let loader = ClassifierLoader::new(ModelSettings::lexicon());
        let result = classify_file(&loader, file.path()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "POSITIVE");
        assert!(loader.is_loaded());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let loader = ClassifierLoader::new(ModelSettings::lexicon());
        let path = Path::new("/nonexistent/review.txt");

        let err = classify_file(&loader, path).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound(ref p) if p == path));
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn test_blank_file_never_loads_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, " \n\t ").unwrap();

        let loader = ClassifierLoader::new(ModelSettings::lexicon());
        let err = classify_file(&loader, file.path()).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn test_non_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();

        let loader = ClassifierLoader::new(ModelSettings::lexicon());
        let err = classify_file(&loader, file.path()).await.unwrap_err();

        assert!(matches!(err, Error::FileRead { .. }));
        assert!(!loader.is_loaded());
    }
}
