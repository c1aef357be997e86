//! On-disk parameter snapshots.
//!
//! A checkpoint is a flat map from layer name to that layer's weight matrix
//! and bias vector, written as pretty JSON. There is no versioning: restoring
//! into a network whose layer shapes differ is an error.
//!
//! JSON has no literal for non-finite numbers, so those parameters are written
//! as the strings `"NaN"`, `"inf"` and `"-inf"`.

use crate::{nn::Dense, NetError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerParams {
    pub in_dim: usize,
    pub out_dim: usize,
    /// Row-major `[out_dim, in_dim]`.
    #[serde(with = "float_values")]
    pub weight: Vec<f32>,
    #[serde(with = "float_values")]
    pub bias: Vec<f32>,
}

impl LayerParams {
    #[must_use]
    pub fn from_dense(layer: &Dense) -> Self {
        Self {
            in_dim: layer.in_dim,
            out_dim: layer.out_dim,
            weight: layer.w.data.clone(),
            bias: layer.b.data.clone(),
        }
    }

    /// Converts back into a layer, checking it has the same shape as `like`.
    ///
    /// # Errors
    /// Returns [`NetError::IncompatibleCheckpoint`] on any shape disagreement.
    pub fn to_dense_like(&self, name: &str, like: &Dense) -> Result<Dense, NetError> {
        if self.in_dim != like.in_dim || self.out_dim != like.out_dim {
            return Err(NetError::IncompatibleCheckpoint(format!(
                "layer `{name}` is {}x{}, network expects {}x{}",
                self.out_dim, self.in_dim, like.out_dim, like.in_dim
            )));
        }
        if self.weight.len() != self.in_dim * self.out_dim || self.bias.len() != self.out_dim {
            return Err(NetError::IncompatibleCheckpoint(format!(
                "layer `{name}` has {} weights and {} biases for a {}x{} layer",
                self.weight.len(),
                self.bias.len(),
                self.out_dim,
                self.in_dim
            )));
        }
        Ok(Dense::new(self.weight.clone(), self.bias.clone(), self.in_dim, self.out_dim))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub layers: BTreeMap<String, LayerParams>,
}

impl Checkpoint {
    #[must_use]
    pub fn from_layers<'n, 'a>(layers: impl IntoIterator<Item = (&'n str, &'a Dense)>) -> Self {
        Self {
            layers: layers
                .into_iter()
                .map(|(name, layer)| (name.to_owned(), LayerParams::from_dense(layer)))
                .collect(),
        }
    }

    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&LayerParams> {
        self.layers.get(name)
    }

    /// Creates or truncates `path` and writes the checkpoint to it.
    ///
    /// # Errors
    /// Fails on any I/O or serialization error.
    pub fn write(&self, path: &Path) -> Result<(), NetError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// # Errors
    /// Fails if the file is missing or does not parse as a checkpoint.
    pub fn read(path: &Path) -> Result<Self, NetError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

mod float_values {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Named(String),
    }

    impl From<f32> for Repr {
        fn from(v: f32) -> Self {
            if v.is_finite() {
                Repr::Number(v)
            } else if v.is_nan() {
                Repr::Named("NaN".into())
            } else if v > 0.0 {
                Repr::Named("inf".into())
            } else {
                Repr::Named("-inf".into())
            }
        }
    }

    impl Repr {
        fn into_f32(self) -> Result<f32, String> {
            match self {
                Repr::Number(v) => Ok(v),
                Repr::Named(name) => match name.as_str() {
                    "NaN" => Ok(f32::NAN),
                    "inf" => Ok(f32::INFINITY),
                    "-inf" => Ok(f32::NEG_INFINITY),
                    _ => Err(format!("`{name}` is not a parameter value")),
                },
            }
        }
    }

    pub fn serialize<S: Serializer>(values: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&v| Repr::from(v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(|r| r.into_f32().map_err(D::Error::custom))
            .collect()
    }
}
