use crate::checkpoint::Checkpoint;
use crate::{nn::Dense, NetError, Tensor};
use std::fmt;
use std::path::Path;

/// Layer identifiers used in checkpoints, input side first.
pub const LAYER_NAMES: [&str; 3] = ["fcl1", "fcl2", "fcl3"];

/// Externally visible state of a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Parameters may be updated by an external optimizer.
    #[default]
    Trainable,
    /// Parameters are not expected to change.
    Inference,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Trainable => f.write_str("trainable"),
            Mode::Inference => f.write_str("inference"),
        }
    }
}

/// The capability both networks share: three dense layers, a forward pass,
/// a mode flag and checkpoint persistence.
pub trait Module {
    fn layers(&self) -> [&Dense; 3];
    fn layers_mut(&mut self) -> [&mut Dense; 3];
    fn mode(&self) -> Mode;
    fn set_mode(&mut self, mode: Mode);

    /// Runs the network over a batch.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] when the batch width is wrong.
    fn forward(&self, batch: &Tensor) -> Result<Tensor, NetError>;

    fn train(&mut self) {
        self.set_mode(Mode::Trainable);
    }

    fn eval(&mut self) {
        self.set_mode(Mode::Inference);
    }

    /// Weight and bias of every layer, in layer order.
    fn params(&self) -> Vec<&Tensor> {
        self.layers().into_iter().flat_map(Dense::params).collect()
    }

    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers_mut().into_iter().flat_map(Dense::params_mut).collect()
    }

    fn num_params(&self) -> usize {
        self.layers().iter().map(|l| l.num_params()).sum()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint::from_layers(LAYER_NAMES.into_iter().zip(self.layers()))
    }

    /// Replaces every layer from `checkpoint` and switches to inference.
    ///
    /// All layers are validated before any is installed.
    ///
    /// # Errors
    /// Returns [`NetError::IncompatibleCheckpoint`] when a layer is missing,
    /// unexpected, or shaped differently.
    fn restore(&mut self, checkpoint: &Checkpoint) -> Result<(), NetError> {
        if let Some(extra) = checkpoint
            .layers
            .keys()
            .find(|k| !LAYER_NAMES.iter().any(|n| *n == k.as_str()))
        {
            return Err(NetError::IncompatibleCheckpoint(format!("unexpected layer `{extra}`")));
        }
        let current = self.layers();
        let mut replacements = Vec::with_capacity(LAYER_NAMES.len());
        for (name, layer) in LAYER_NAMES.into_iter().zip(current) {
            let params = checkpoint
                .layer(name)
                .ok_or_else(|| NetError::IncompatibleCheckpoint(format!("missing layer `{name}`")))?;
            replacements.push(params.to_dense_like(name, layer)?);
        }
        for (slot, layer) in self.layers_mut().into_iter().zip(replacements) {
            *slot = layer;
        }
        self.eval();
        Ok(())
    }

    /// Writes all parameters to `path`, creating or overwriting the file.
    ///
    /// # Errors
    /// Fails on any I/O or serialization error.
    fn save(&self, path: &Path) -> Result<(), NetError> {
        self.checkpoint().write(path)?;
        tracing::info!(path = %path.display(), params = self.num_params(), "saved network parameters");
        Ok(())
    }

    /// Replaces all parameters from `path` and switches to inference.
    ///
    /// On error the network is left untouched.
    ///
    /// # Errors
    /// Fails if the file is absent, unparsable, or shaped for another network.
    fn load(&mut self, path: &Path) -> Result<(), NetError> {
        let checkpoint = Checkpoint::read(path)?;
        self.restore(&checkpoint)?;
        tracing::info!(path = %path.display(), mode = %self.mode(), "loaded network parameters");
        Ok(())
    }
}
