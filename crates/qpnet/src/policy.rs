use crate::config::{NetConfig, HIDDEN_1, HIDDEN_2};
use crate::module::{Mode, Module};
use crate::{nn::Dense, NetError, Tensor};
use compute::ComputeBackend;
use std::sync::Arc;

/// P-network: maps observations to actions in `[-1, 1]`.
pub struct PolicyNetwork {
    num_observations: usize,
    num_actions: usize,
    fcl1: Dense,
    fcl2: Dense,
    fcl3: Dense,
    mode: Mode,
    backend: Arc<dyn ComputeBackend>,
}

impl PolicyNetwork {
    /// Builds a randomly initialised network on the configured device.
    ///
    /// # Errors
    /// Fails on zero dimensions or an unavailable device.
    pub fn new(
        num_observations: usize,
        num_actions: usize,
        config: &NetConfig,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, NetError> {
        let backend = config.backend()?;
        Self::with_backend(num_observations, num_actions, backend, rng)
    }

    /// # Errors
    /// Fails on zero dimensions.
    pub fn with_backend(
        num_observations: usize,
        num_actions: usize,
        backend: Arc<dyn ComputeBackend>,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, NetError> {
        if num_observations == 0 {
            return Err(NetError::InvalidDimension("num_observations"));
        }
        if num_actions == 0 {
            return Err(NetError::InvalidDimension("num_actions"));
        }
        tracing::debug!(num_observations, num_actions, backend = backend.name(), "building policy network");
        Ok(Self {
            num_observations,
            num_actions,
            fcl1: Dense::random(num_observations, HIDDEN_1, rng),
            fcl2: Dense::random(HIDDEN_1, HIDDEN_2, rng),
            fcl3: Dense::random(HIDDEN_2, num_actions, rng),
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

    /// Picks actions for a batch of observations.
    ///
    /// `sigma` weighs the policy's own action against uniform noise in
    /// `[-1, 1]`: `sigma >= 1` is the policy output unchanged, `sigma <= 0`
    /// is pure noise, anything between is `sigma·policy + (1 - sigma)·noise`.
    /// Noise is only drawn from `rng` when `sigma < 1`.
    ///
    /// # Errors
    /// Fails on a wrongly shaped batch or a NaN `sigma`.
    pub fn select_action(
        &self,
        observations: &Tensor,
        sigma: f32,
        rng: &mut fastrand::Rng,
    ) -> Result<Tensor, NetError> {
        if sigma.is_nan() {
            return Err(NetError::InvalidExplorationWeight);
        }
        let actions = self.forward(observations)?;
        if sigma >= 1.0 {
            return Ok(actions);
        }
        let noise = random_actions(actions.shape.clone(), rng);
        mix_actions(&actions, &noise, sigma)
    }
}

/// Uniform random actions in `[-1, 1)`.
#[must_use]
pub fn random_actions(shape: Vec<usize>, rng: &mut fastrand::Rng) -> Tensor {
    Tensor::uniform(shape, -1.0, 1.0, rng)
}

/// Blends policy actions with noise using the exploration weight `sigma`.
///
/// # Errors
/// Returns [`NetError::Shape`] when `policy` and `noise` differ in shape.
pub fn mix_actions(policy: &Tensor, noise: &Tensor, sigma: f32) -> Result<Tensor, NetError> {
    if sigma >= 1.0 {
        policy.zip_map(noise, |p, _| p)
    } else if sigma <= 0.0 {
        policy.zip_map(noise, |_, r| r)
    } else {
        policy.zip_map(noise, |p, r| sigma * p + (1.0 - sigma) * r)
    }
}

impl Module for PolicyNetwork {
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

    /// Maps `[batch, obs]` rows to `[batch, act]` actions in `[-1, 1]`.
    fn forward(&self, batch: &Tensor) -> Result<Tensor, NetError> {
        let backend = self.backend.as_ref();
        let x = batch.clone().into_batch();
        let x = self.fcl1.forward(&x, backend)?.relu(backend)?;
        let x = self.fcl2.forward(&x, backend)?.relu(backend)?;
        self.fcl3.forward(&x, backend)?.tanh(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_boundaries_pick_one_side() {
        let p = Tensor::from_vec(vec![1, 2], vec![0.5, -0.5]);
        let r = Tensor::from_vec(vec![1, 2], vec![-1.0, 1.0]);
        assert_eq!(mix_actions(&p, &r, 1.0).unwrap(), p);
        assert_eq!(mix_actions(&p, &r, 3.0).unwrap(), p);
        assert_eq!(mix_actions(&p, &r, 0.0).unwrap(), r);
        assert_eq!(mix_actions(&p, &r, -2.0).unwrap(), r);
    }

    #[test]
    fn mix_interpolates_linearly() {
        let p = Tensor::from_vec(vec![1, 2], vec![1.0, 0.0]);
        let r = Tensor::from_vec(vec![1, 2], vec![-1.0, 1.0]);
        let m = mix_actions(&p, &r, 0.25).unwrap();
        assert!((m.data[0] - (0.25 - 0.75)).abs() < 1e-6);
        assert!((m.data[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn mix_rejects_mismatched_noise() {
        let p = Tensor::zeros(vec![1, 2]);
        let r = Tensor::zeros(vec![2, 2]);
        assert!(mix_actions(&p, &r, 0.5).is_err());
    }

    #[test]
    fn nan_sigma_is_rejected() {
        let mut rng = fastrand::Rng::with_seed(1);
        let pi = PolicyNetwork::new(3, 2, &NetConfig::default(), &mut rng).unwrap();
        let obs = Tensor::zeros(vec![1, 3]);
        assert!(matches!(
            pi.select_action(&obs, f32::NAN, &mut rng),
            Err(NetError::InvalidExplorationWeight)
        ));
    }

    #[test]
    fn output_layer_matches_action_count() {
        let pi = PolicyNetwork::new(5, 3, &NetConfig::default(), &mut fastrand::Rng::with_seed(2)).unwrap();
        let [l1, _, l3] = pi.layers();
        assert_eq!(l1.in_dim, 5);
        assert_eq!(l3.out_dim, 3);
        let out = pi.forward(&Tensor::zeros(vec![4, 5])).unwrap();
        assert_eq!(out.shape, vec![4, 3]);
    }
}
