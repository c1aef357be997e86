#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! State-action value (Q) and policy (P) networks for actor-critic training.
//!
//! Both networks are three dense layers (`in → 100 → 50 → out`) with ReLU
//! hidden activations and a `tanh` output. The value network additionally
//! rescales its output onto a configured return range. Training, replay and
//! environment interaction live elsewhere; this crate only evaluates,
//! exposes parameters, and persists them.

pub mod bounds;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod module;
pub mod nn;
pub mod policy;
pub mod tensor;
pub mod value;

pub use bounds::ValueBounds;
pub use checkpoint::{Checkpoint, LayerParams};
pub use config::NetConfig;
pub use error::NetError;
pub use module::{Mode, Module};
pub use nn::Dense;
pub use policy::{mix_actions, random_actions, PolicyNetwork};
pub use tensor::Tensor;
pub use value::ValueNetwork;

pub use compute::Device;
