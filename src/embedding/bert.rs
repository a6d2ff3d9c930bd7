use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// BERT encoder with mean pooling, the sentence-transformers recipe for MiniLM models.
pub struct BertSentenceEncoder {
    model: BertModel,
    hidden_size: usize,
}

impl BertSentenceEncoder {
    /// Loads `config.json` + `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        // sentence-transformers exports drop the `bert.` prefix, HF checkpoints keep it.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            model,
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Encodes one unpadded sequence and returns its mean-pooled hidden state.
    pub fn encode(&self, token_ids: &[u32], type_ids: &[u32], device: &Device) -> Result<Vec<f32>> {
        let input_ids = Tensor::new(token_ids, device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, device)?.unsqueeze(0)?;
        let attention_mask = input_ids.ones_like()?;

        // [1, seq_len, hidden]
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        hidden.mean(1)?.squeeze(0)?.to_vec1::<f32>()
    }
}
