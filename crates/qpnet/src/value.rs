use crate::config::{NetConfig, HIDDEN_1, HIDDEN_2};
use crate::module::{Mode, Module};
use crate::{nn::Dense, NetError, Tensor, ValueBounds};
use compute::ComputeBackend;
use std::sync::Arc;

/// Q-network: scores an (observation, action) pair with a predicted return.
///
/// Input rows are the observation followed by the action. The final `tanh`
/// bounds the raw output to `[-1, 1]`, which is then stretched onto the
/// configured [`ValueBounds`].
pub struct ValueNetwork {
    num_observations: usize,
    num_actions: usize,
    fcl1: Dense,
    fcl2: Dense,
    fcl3: Dense,
    bounds: ValueBounds,
    mode: Mode,
    backend: Arc<dyn ComputeBackend>,
}

impl ValueNetwork {
    /// Builds a randomly initialised network on the configured device.
    ///
    /// # Errors
    /// Fails on zero dimensions, invalid bounds, or an unavailable device.
    pub fn new(
        num_observations: usize,
        num_actions: usize,
        config: &NetConfig,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, NetError> {
        let backend = config.backend()?;
        Self::with_backend(num_observations, num_actions, config.bounds, backend, rng)
    }

    /// # Errors
    /// Fails on zero dimensions or invalid bounds.
    pub fn with_backend(
        num_observations: usize,
        num_actions: usize,
        bounds: ValueBounds,
        backend: Arc<dyn ComputeBackend>,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, NetError> {
        if num_observations == 0 {
            return Err(NetError::InvalidDimension("num_observations"));
        }
        if num_actions == 0 {
            return Err(NetError::InvalidDimension("num_actions"));
        }
        bounds.validate()?;
        let in_dim = num_observations + num_actions;
        tracing::debug!(
            num_observations,
            num_actions,
            lower = bounds.lower,
            upper = bounds.upper,
            backend = backend.name(),
            "building value network"
        );
        Ok(Self {
            num_observations,
            num_actions,
            fcl1: Dense::random(in_dim, HIDDEN_1, rng),
            fcl2: Dense::random(HIDDEN_1, HIDDEN_2, rng),
            fcl3: Dense::random(HIDDEN_2, 1, rng),
            bounds,
            mode: Mode::default(),
            backend,
        })
    }

    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.num_observations + self.num_actions
    }

    #[must_use]
    pub fn bounds(&self) -> ValueBounds {
        self.bounds
    }

    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        self.bounds.normalize(value)
    }

    #[must_use]
    pub fn denormalize(&self, y: f32) -> f32 {
        self.bounds.denormalize(y)
    }

    /// Scores separate observation and action batches by joining them row-wise.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] when either batch has the wrong width or
    /// the two disagree on row count.
    pub fn evaluate(&self, observations: &Tensor, actions: &Tensor) -> Result<Tensor, NetError> {
        let obs = observations.clone().into_batch();
        let act = actions.clone().into_batch();
        if obs.cols() != self.num_observations {
            return Err(NetError::Shape {
                context: "observation batch",
                expected: vec![obs.rows(), self.num_observations],
                found: obs.shape,
            });
        }
        if act.cols() != self.num_actions {
            return Err(NetError::Shape {
                context: "action batch",
                expected: vec![act.rows(), self.num_actions],
                found: act.shape,
            });
        }
        self.forward(&obs.concat_cols(&act)?)
    }
}

impl Module for ValueNetwork {
    fn layers(&self) -> [&Dense; 3] {
        [&self.fcl1, &self.fcl2, &self.fcl3]
    }

    fn layers_mut(&mut self) -> [&mut Dense; 3] {
        [&mut self.fcl1, &mut self.fcl2, &mut self.fcl3]
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Maps `[batch, obs + act]` rows to `[batch, 1]` predicted returns.
    fn forward(&self, batch: &Tensor) -> Result<Tensor, NetError> {
        let backend = self.backend.as_ref();
        let x = batch.clone().into_batch();
        let x = self.fcl1.forward(&x, backend)?.relu(backend)?;
        let x = self.fcl2.forward(&x, backend)?.relu(backend)?;
        let y = self.fcl3.forward(&x, backend)?.tanh(backend)?;
        Ok(self.bounds.denormalize_tensor(&y))
    }
}
