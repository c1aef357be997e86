#![allow(dead_code)]

use qpnet::{NetConfig, PolicyNetwork, Tensor, ValueBounds, ValueNetwork};

pub const NUM_OBS: usize = 4;
pub const NUM_ACT: usize = 2;

pub fn config() -> NetConfig {
    NetConfig::default().with_bounds(ValueBounds::new(-200.0, 400.0).unwrap())
}

pub fn value_net(seed: u64) -> ValueNetwork {
    ValueNetwork::new(NUM_OBS, NUM_ACT, &config(), &mut fastrand::Rng::with_seed(seed)).unwrap()
}

pub fn policy_net(seed: u64) -> PolicyNetwork {
    PolicyNetwork::new(NUM_OBS, NUM_ACT, &config(), &mut fastrand::Rng::with_seed(seed)).unwrap()
}

/// Deterministic batch with values spread over `[-scale, scale]`.
pub fn batch(rows: usize, cols: usize, scale: f32, seed: u64) -> Tensor {
    Tensor::uniform(vec![rows, cols], -scale, scale, &mut fastrand::Rng::with_seed(seed))
}
