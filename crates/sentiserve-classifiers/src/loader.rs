//! Construct-once classifier loading
//!
//! A [`ClassifierLoader`] is built explicitly by the binary and passed to
//! whoever needs the model. The first successful [`ClassifierLoader::load_classifier`]
//! call materializes the model; every later call returns the same handle.

use crate::classifier::{Classifier, ClassifierHandle};
use crate::config::{Backend, ModelSettings};
use crate::distilbert::DistilBertClassifier;
use crate::lexicon::LexiconClassifier;
use sentiserve_core::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

type BuildFn = dyn Fn() -> Result<Arc<dyn Classifier>> + Send + Sync;

pub struct ClassifierLoader {
    build: Arc<BuildFn>,
    handle: OnceCell<ClassifierHandle>,
}

impl ClassifierLoader {
    /// Loader for the backend selected in `settings`. Performs no I/O.
    pub fn new(settings: ModelSettings) -> Self {
        Self::with_builder(move || build_classifier(&settings))
    }

    /// Loader with a custom construction function
    pub fn with_builder<F>(build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Classifier>> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
            handle: OnceCell::new(),
        }
    }

    /// Return the cached handle, materializing the model on first use.
    ///
    /// Construction runs on the blocking pool. Concurrent first calls wait
    /// on the same construction. Failures are not cached.
    pub async fn load_classifier(&self) -> Result<ClassifierHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let build = Arc::clone(&self.build);
                let start = Instant::now();

                let classifier = tokio::task::spawn_blocking(move || (*build)())
                    .await
                    .map_err(|e| Error::initialization(format!("model loading task failed: {e}")))?
                    .map_err(into_initialization)?;

                tracing::info!(
                    "Classifier '{}' ready in {:.2?}",
                    classifier.name(),
                    start.elapsed()
                );
                Ok::<_, Error>(ClassifierHandle::from_arc(classifier))
            })
            .await?;

        Ok(handle.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.initialized()
    }
}

impl std::fmt::Debug for ClassifierLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierLoader")
            .field("handle", &self.handle.get())
            .finish()
    }
}

/// Build the classifier for `settings`, blocking the current thread
pub fn build_classifier(settings: &ModelSettings) -> Result<Arc<dyn Classifier>> {
    settings.validate()?;

    match settings.backend {
        Backend::Candle => {
            tracing::info!("Loading text classification model '{}'", settings.model_id);
            Ok(Arc::new(DistilBertClassifier::load(settings)?))
        }
        Backend::Lexicon => {
            tracing::info!("Using offline lexicon sentiment classifier");
            Ok(Arc::new(LexiconClassifier::new(settings.top_k)?))
        }
    }
}

fn into_initialization(err: Error) -> Error {
    match err {
        Error::Initialization(_) => err,
        other => Error::initialization(other.to_string()),
    }
}
