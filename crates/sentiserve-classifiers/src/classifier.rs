//! Classifier trait and the shared handle

use sentiserve_core::{Error, InputText, LabelScore, Result};
use std::fmt;
use std::sync::Arc;

/// An opaque text-classification capability.
///
/// Implementations are read-only after construction and must tolerate
/// concurrent calls from several threads.
pub trait Classifier: Send + Sync {
    /// Classify the given text.
    ///
    /// CPU-bound; callers on an async runtime should go through
    /// [`ClassifierHandle::classify`] which moves the call to the blocking pool.
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Shared, read-only reference to a loaded classifier.
///
/// Cloning is cheap and every clone refers to the same model instance.
#[derive(Clone)]
pub struct ClassifierHandle {
    inner: Arc<dyn Classifier>,
}

impl ClassifierHandle {
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self {
            inner: Arc::new(classifier),
        }
    }

    pub fn from_arc(classifier: Arc<dyn Classifier>) -> Self {
        Self { inner: classifier }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// True when both handles point at the same classifier instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::as_ptr(&a.inner) as *const () == Arc::as_ptr(&b.inner) as *const ()
    }

    /// Run the classifier on tokio's blocking pool and wait for the result
    pub async fn classify(&self, text: InputText) -> Result<Vec<LabelScore>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.classify(text.as_str()))
            .await
            .map_err(|e| Error::inference(format!("classification task failed: {e}")))?
    }

    /// Run the classifier on the current thread
    pub fn classify_blocking(&self, text: &InputText) -> Result<Vec<LabelScore>> {
        self.inner.classify(text.as_str())
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("name", &self.inner.name())
            .finish()
    }
}

/// Keep the `top_k` highest-scoring records, best first. `0` keeps all.
pub fn top_k(mut scores: Vec<LabelScore>, k: usize) -> Vec<LabelScore> {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if k > 0 {
        scores.truncate(k);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Classifier for Fixed {
        fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
            Ok(vec![LabelScore::new("POSITIVE", 0.9)])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_top_k_orders_and_truncates() {
        let scores = vec![
            LabelScore::new("NEGATIVE", 0.2),
            LabelScore::new("POSITIVE", 0.8),
        ];

        let best = top_k(scores.clone(), 1);
        assert_eq!(best, vec![LabelScore::new("POSITIVE", 0.8)]);

        let all = top_k(scores, 0);
        assert_eq!(all[0].label, "POSITIVE");
        assert_eq!(all[1].label, "NEGATIVE");
    }

    #[test]
    fn test_handle_identity() {
        let a = ClassifierHandle::new(Fixed);
        let b = a.clone();
        let c = ClassifierHandle::new(Fixed);

        assert!(ClassifierHandle::ptr_eq(&a, &b));
        assert!(!ClassifierHandle::ptr_eq(&a, &c));
        assert_eq!(format!("{a:?}"), "ClassifierHandle { name: \"fixed\" }");
    }

    #[tokio::test]
    async fn test_classify_runs_on_blocking_pool() {
        let handle = ClassifierHandle::new(Fixed);
        let text = InputText::new("anything").unwrap();

        let result = handle.classify(text.clone()).await.unwrap();
        assert_eq!(result, handle.classify_blocking(&text).unwrap());
    }
}
