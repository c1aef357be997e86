use crate::{NetError, Tensor};
use compute::ComputeBackend;

/// A fully connected neural network layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    /// The weight matrix, stored `[out_dim, in_dim]`.
    pub w: Tensor,
    /// The bias vector.
    pub b: Tensor,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    ///
    /// # Panics
    /// Panics if the buffer lengths disagree with the dimensions.
    #[must_use]
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights),
            b: Tensor::from_vec(vec![out_d], bias),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    /// Glorot-uniform weights, zero bias.
    #[must_use]
    pub fn random(in_d: usize, out_d: usize, rng: &mut fastrand::Rng) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        let bias = vec![0.0; out_d];
        Self::new(weights, bias, in_d, out_d)
    }

    /// Performs the forward pass `x · wᵀ + b` over a `[batch, in_dim]` input.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] when the row width is not `in_dim`.
    pub fn forward(&self, x: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        if x.shape.len() != 2 || x.cols() != self.in_dim {
            return Err(NetError::Shape {
                context: "dense layer input",
                expected: vec![x.rows(), self.in_dim],
                found: x.shape.clone(),
            });
        }
        let wx = x.matmul_t(&self.w, backend)?;
        wx.add_broadcast(&self.b, backend)
    }

    #[must_use]
    pub fn params(&self) -> [&Tensor; 2] {
        [&self.w, &self.b]
    }

    pub fn params_mut(&mut self) -> [&mut Tensor; 2] {
        [&mut self.w, &mut self.b]
    }

    #[must_use]
    pub fn num_params(&self) -> usize {
        self.w.len() + self.b.len()
    }
}
