//! Literal defaults attached to generated replacements.
//!
//! The timestamp bounds feed `RandomTimestampGenerator` metadata and the model
//! block is attached to every replacement. Both can be overridden from the
//! `masking` section of `shroud.yaml`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_DATE: &str = "2024-06-17T23:49:09.3138384Z";
pub const DEFAULT_MAX_DATE: &str = "2024-06-19T23:49:09.3138393Z";
pub const DEFAULT_MIN_TIME: &str = "2024-06-17T23:49:09.3138365Z";
pub const DEFAULT_MAX_TIME: &str = "2024-06-19T23:49:09.3138374Z";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "yyyy-MM-ddTHH:mm:ss";
pub const DEFAULT_UNIX_TIMESTAMP_FORMAT: &str = "Seconds";

pub const DEFAULT_MODEL_TYPE: &str = "VAE";

/// Defaults applied while compiling masking plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskingDefaults {
    #[serde(default)]
    pub timestamp: TimestampDefaults,

    #[serde(default)]
    pub model: ModelConfig,
}

/// Bounds and formats for random timestamp generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampDefaults {
    #[serde(default = "default_min_date")]
    pub min_date: String,
    #[serde(default = "default_max_date")]
    pub max_date: String,
    #[serde(default = "default_min_time")]
    pub min_time: String,
    #[serde(default = "default_max_time")]
    pub max_time: String,
    #[serde(default = "default_date_time_format")]
    pub date_time_format: String,
    #[serde(default = "default_unix_timestamp_format")]
    pub unix_timestamp_format: String,
}

impl Default for TimestampDefaults {
    fn default() -> Self {
        Self {
            min_date: default_min_date(),
            max_date: default_max_date(),
            min_time: default_min_time(),
            max_time: default_max_time(),
            date_time_format: default_date_time_format(),
            unix_timestamp_format: default_unix_timestamp_format(),
        }
    }
}

/// Neural model configuration block sent with each replacement.
///
/// Serialized in camelCase since it goes on the wire verbatim. All sizes are
/// zero by default; the platform ignores them for non-neural generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    pub model_type: String,
    pub epochs: u32,
    pub batch_size: u32,
    pub early_stopping: bool,
    pub rec_loss_factor: f64,
    pub latent_dim: u32,
    pub max_categorical_dim: u32,
    pub encoder_layer_sizes: Vec<u32>,
    pub decoder_layer_sizes: Vec<u32>,
    pub rnn_encoder_hidden_size: u32,
    pub rnn_decoder_hidden_size: u32,
    pub rnn_decoder_fully_connected_size: u32,
    pub ui_sequence_length: u32,
    pub max_order_dimension: u32,
    pub mask_loss_factor: f64,
    pub order_loss_factor: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            epochs: 0,
            batch_size: 0,
            early_stopping: true,
            rec_loss_factor: 0.0,
            latent_dim: 0,
            max_categorical_dim: 0,
            encoder_layer_sizes: vec![0],
            decoder_layer_sizes: vec![0],
            rnn_encoder_hidden_size: 0,
            rnn_decoder_hidden_size: 0,
            rnn_decoder_fully_connected_size: 0,
            ui_sequence_length: 0,
            max_order_dimension: 0,
            mask_loss_factor: 0.0,
            order_loss_factor: 0.0,
        }
    }
}

fn default_min_date() -> String {
    DEFAULT_MIN_DATE.to_string()
}

fn default_max_date() -> String {
    DEFAULT_MAX_DATE.to_string()
}

fn default_min_time() -> String {
    DEFAULT_MIN_TIME.to_string()
}

fn default_max_time() -> String {
    DEFAULT_MAX_TIME.to_string()
}

fn default_date_time_format() -> String {
    DEFAULT_DATE_TIME_FORMAT.to_string()
}

fn default_unix_timestamp_format() -> String {
    DEFAULT_UNIX_TIMESTAMP_FORMAT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let yaml = r#"
timestamp:
  min_date: "2020-01-01T00:00:00Z"
model:
  epochs: 5
"#;
        let defaults: MaskingDefaults = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defaults.timestamp.min_date, "2020-01-01T00:00:00Z");
        assert_eq!(defaults.timestamp.max_date, DEFAULT_MAX_DATE);
        assert_eq!(defaults.model.epochs, 5);
        assert_eq!(defaults.model.model_type, DEFAULT_MODEL_TYPE);
        assert_eq!(defaults.model.encoder_layer_sizes, vec![0]);
    }
}
