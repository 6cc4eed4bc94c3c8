//! Sentiserve Classifiers
//!
//! Loading and invoking the one sentiment model a process serves.
//!
//! - [`ClassifierLoader`] constructs the model once and hands out a shared
//!   [`ClassifierHandle`]
//! - [`DistilBertClassifier`] runs a Hugging Face DistilBERT checkpoint on Candle
//! - [`LexiconClassifier`] is an offline keyword fallback
//! - [`service::classify`] is the validation + delegation step both transports share

pub mod classifier;
pub mod config;
pub mod distilbert;
pub mod lexicon;
pub mod loader;
pub mod service;

pub use classifier::{Classifier, ClassifierHandle};
pub use config::{load_layered, Backend, DeviceSpec, ModelSettings, DEFAULT_MODEL_ID};
pub use distilbert::DistilBertClassifier;
pub use lexicon::LexiconClassifier;
pub use loader::{build_classifier, ClassifierLoader};
pub use service::classify;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, ClassifierHandle};
    pub use crate::config::ModelSettings;
    pub use crate::loader::ClassifierLoader;
    pub use crate::service::classify;
}
