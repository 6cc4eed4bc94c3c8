//! DistilBERT sequence classification with Candle
//!
//! Loads a `DistilBertForSequenceClassification` checkpoint (backbone,
//! `pre_classifier`, `classifier`) from a local directory or the Hugging Face
//! Hub and scores text with a softmax over the head's logits.

use crate::classifier::{top_k, Classifier};
use crate::config::{DeviceSpec, ModelSettings};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use sentiserve_core::{Error, LabelScore, Result};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";
const TOKENIZER_FILES: [&str; 2] = ["tokenizer.json", "vocab.txt"];

pub struct DistilBertClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
    top_k: usize,
}

impl DistilBertClassifier {
    /// Materialize the model described by `settings`.
    ///
    /// Blocking: may download several hundred megabytes on first use.
    pub fn load(settings: &ModelSettings) -> Result<Self> {
        let model_dir = resolve_model_dir(settings)?;
        tracing::info!("Loading DistilBERT classifier from {}", model_dir.display());

        let config_str = std::fs::read_to_string(model_dir.join(CONFIG_FILE)).map_err(
            init_err(&format!("Failed to read {}", model_dir.join(CONFIG_FILE).display())),
        )?;
        let config_json: serde_json::Value =
            serde_json::from_str(&config_str).map_err(init_err("Failed to parse config JSON"))?;
        let distilbert_config: DistilBertConfig =
            serde_json::from_str(&config_str).map_err(init_err("Failed to parse config"))?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;
        let max_positions = config_json
            .get("max_position_embeddings")
            .and_then(|v| v.as_u64())
            .unwrap_or(512) as usize;
        let labels = labels_from_config(&config_json);

        let max_length = settings.max_length.min(max_positions);
        let tokenizer = load_tokenizer(&model_dir, max_length)?;

        let device = create_device(settings.device)?;
        let vb = load_var_builder(&model_dir, &device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(init_err("Failed to load DistilBERT model"))?;
        let pre_classifier = candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier"))
            .map_err(init_err("Failed to load pre_classifier layer"))?;
        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(init_err("Failed to load classification head"))?;

        tracing::info!(
            "Loaded DistilBERT classifier with {} labels: {:?}",
            labels.len(),
            labels
        );

        Ok(Self {
            name: settings
                .model_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| settings.model_id.clone()),
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device,
            labels,
            top_k: settings.top_k,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, text: &str) -> candle_core::Result<Tensor> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(candle_core::Error::msg)?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;

        // DistilBERT masks positions where the mask is 1, the inverse of the tokenizer's mask.
        let inverted_mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let attention_mask = Tensor::new(inverted_mask.as_slice(), &self.device)?.unsqueeze(0)?;

        let hidden_states = self.model.forward(&input_ids, &attention_mask)?;
        let cls_embedding = hidden_states.i((.., 0, ..))?;
        let pooled = self.pre_classifier.forward(&cls_embedding)?.relu()?;
        self.classifier.forward(&pooled)
    }
}

impl Classifier for DistilBertClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let start = Instant::now();

        let logits = self.logits(text).map_err(inference_err("Model forward pass failed"))?;
        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|p| p.squeeze(0))
            .and_then(|p| p.to_dtype(DType::F32))
            .and_then(|p| p.to_vec1())
            .map_err(inference_err("Softmax failed"))?;

        let scores = self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, score)| LabelScore::new(label.clone(), score))
            .collect();

        tracing::debug!("DistilBERT inference took {}µs", start.elapsed().as_micros());
        Ok(top_k(scores, self.top_k))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Local `model_path`, or the snapshot directory of `model_id` in the hub cache
fn resolve_model_dir(settings: &ModelSettings) -> Result<PathBuf> {
    if let Some(path) = &settings.model_path {
        if !path.is_dir() {
            return Err(Error::initialization(format!(
                "Model path does not exist: {}",
                path.display()
            )));
        }
        return Ok(path.clone());
    }

    let cache_dir = settings.resolved_cache_dir();
    tracing::info!(
        "Fetching {} @ {} (cache dir: {})",
        settings.model_id,
        settings.revision,
        cache_dir.display()
    );

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir)
        .with_progress(false)
        .build()
        .map_err(init_err("Failed to initialize HuggingFace API"))?;
    let repo = api.repo(Repo::with_revision(
        settings.model_id.clone(),
        RepoType::Model,
        settings.revision.clone(),
    ));

    let config_path = repo
        .get(CONFIG_FILE)
        .map_err(init_err("Failed to download config.json"))?;
    repo.get(WEIGHTS_FILE)
        .map_err(init_err("Failed to download model.safetensors"))?;

    let found_tokenizer = TOKENIZER_FILES.iter().any(|file| match repo.get(file) {
        Ok(_) => {
            tracing::debug!("Found tokenizer file: {}", file);
            true
        }
        Err(e) => {
            tracing::debug!("Tokenizer file {} unavailable: {}", file, e);
            false
        }
    });
    if !found_tokenizer {
        return Err(Error::initialization(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::initialization("Invalid cache path"))?;
    Ok(model_dir.to_path_buf())
}

fn create_device(device: DeviceSpec) -> Result<Device> {
    match device {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda => Device::new_cuda(0).map_err(init_err("Failed to initialize CUDA")),
        DeviceSpec::Metal => Device::new_metal(0).map_err(init_err("Failed to initialize Metal")),
    }
}

fn load_var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join(WEIGHTS_FILE);
    if !weights_path.exists() {
        return Err(Error::initialization(format!(
            "{} not found in {}",
            WEIGHTS_FILE,
            model_dir.display()
        )));
    }

    // SAFETY: the weights file is only read, and the cache is not rewritten while the process runs.
    unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(init_err("Failed to load weights"))
    }
}

fn load_tokenizer(model_dir: &Path, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = build_tokenizer(model_dir)?;

    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(init_err("Failed to configure truncation"))?;

    Ok(tokenizer)
}

fn build_tokenizer(model_dir: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_dir.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(init_err("Failed to load tokenizer.json"));
    }

    let vocab_path = model_dir.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(init_err("Failed to build WordPiece model"))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
        tokenizer.with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), 102),
            ("[CLS]".to_string(), 101),
        )));

        return Ok(tokenizer);
    }

    Err(Error::initialization(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_dir.display()
    )))
}

/// Labels ordered by class index, from `id2label` when present
fn labels_from_config(config: &serde_json::Value) -> Vec<String> {
    let declared = config
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            let mut pairs: Vec<(usize, String)> = map
                .iter()
                .filter_map(|(id, label)| Some((id.parse().ok()?, label.as_str()?.to_string())))
                .collect();
            pairs.sort_by_key(|(id, _)| *id);
            pairs
        })
        .unwrap_or_default();

    let num_labels = config
        .get("num_labels")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or_else(|| declared.last().map(|(id, _)| id + 1).unwrap_or(2))
        .max(declared.last().map(|(id, _)| id + 1).unwrap_or(0));

    (0..num_labels)
        .map(|idx| {
            declared
                .iter()
                .find(|(id, _)| *id == idx)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| format!("LABEL_{idx}"))
        })
        .collect()
}

fn init_err<E: Display>(context: &str) -> impl FnOnce(E) -> Error + '_ {
    move |e| Error::initialization(format!("{context}: {e}"))
}

fn inference_err<E: Display>(context: &str) -> impl FnOnce(E) -> Error + '_ {
    move |e| Error::inference(format!("{context}: {e}"))
}
