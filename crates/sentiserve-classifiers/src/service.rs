//! Transport-independent classification front-end

use crate::classifier::ClassifierHandle;
use sentiserve_core::{Error, InputText, LabelScore, Result};
use std::time::Instant;

/// Validate `text` and classify it with `handle`.
///
/// Blank input fails with [`Error::Validation`] before the model is touched.
/// The model's records are returned unchanged; any model failure is
/// reported as [`Error::Inference`].
pub async fn classify(handle: &ClassifierHandle, text: &str) -> Result<Vec<LabelScore>> {
    let input = InputText::new(text)?;
    classify_input(handle, input).await
}

/// Classify text that has already been validated
pub async fn classify_input(handle: &ClassifierHandle, input: InputText) -> Result<Vec<LabelScore>> {
    let start = Instant::now();
    let chars = input.chars().count();

    let result = handle.classify(input).await.map_err(into_inference)?;

    tracing::debug!(
        classifier = handle.name(),
        chars,
        latency_us = start.elapsed().as_micros() as u64,
        "Classification complete"
    );
    Ok(result)
}

fn into_inference(err: Error) -> Error {
    match err {
        Error::Inference(_) => err,
        other => Error::inference(other.to_string()),
    }
}
