use crate::NetError;
use compute::{BufferView, ComputeBackend, ComputeError, Kernel, MatMulConfig};

/// Dense row-major `f32` tensor. Batches are `[rows, cols]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

impl Tensor {
    /// # Panics
    /// Panics when `shape` does not describe `data.len()` elements.
    #[must_use]
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { data, shape }
    }

    /// Builds a `[rows.len(), width]` batch from equally sized rows.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] if the rows have different lengths.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, NetError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(NetError::Shape {
                    context: "batch rows",
                    expected: vec![width],
                    found: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_vec(vec![rows.len(), width], data))
    }

    #[must_use]
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self { data: vec![0.0; len], shape }
    }

    /// Uniform samples in `[low, high)`.
    #[must_use]
    pub fn uniform(shape: Vec<usize>, low: f32, high: f32, rng: &mut fastrand::Rng) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|_| low + rng.f32() * (high - low)).collect();
        Self { data, shape }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of rows of a batch; a rank-1 tensor counts as one row.
    #[must_use]
    pub fn rows(&self) -> usize {
        match self.shape.as_slice() {
            [_] => 1,
            [rows, ..] => *rows,
            [] => 0,
        }
    }

    /// Width of each row.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        let cols = self.cols();
        &self.data[i * cols..(i + 1) * cols]
    }

    /// Views a rank-1 tensor as a single-row batch; other ranks are unchanged.
    #[must_use]
    pub fn into_batch(self) -> Self {
        if self.shape.len() == 1 {
            let cols = self.shape[0];
            Self { data: self.data, shape: vec![1, cols] }
        } else {
            self
        }
    }

    /// Joins two batches column-wise: row `i` becomes `self[i] ++ other[i]`.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] when the row counts differ.
    pub fn concat_cols(&self, other: &Tensor) -> Result<Tensor, NetError> {
        if self.rows() != other.rows() {
            return Err(NetError::Shape {
                context: "column concatenation",
                expected: vec![self.rows(), other.cols()],
                found: vec![other.rows(), other.cols()],
            });
        }
        let cols = self.cols() + other.cols();
        let mut data = Vec::with_capacity(self.rows() * cols);
        for i in 0..self.rows() {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Tensor::from_vec(vec![self.rows(), cols], data))
    }

    #[must_use]
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Element-wise combination of two tensors of identical shape.
    ///
    /// # Errors
    /// Returns [`NetError::Shape`] when the shapes differ.
    pub fn zip_map(&self, other: &Tensor, f: impl Fn(f32, f32) -> f32) -> Result<Tensor, NetError> {
        if self.shape != other.shape {
            return Err(NetError::Shape {
                context: "element-wise operands",
                expected: self.shape.clone(),
                found: other.shape.clone(),
            });
        }
        Ok(Tensor {
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
            shape: self.shape.clone(),
        })
    }

    fn view(&self) -> BufferView {
        BufferView::from_f32(&self.data, self.shape.clone())
    }

    /// Reads the single output buffer of a dispatch back as a tensor.
    fn from_dispatch(shape: Vec<usize>, mut out: Vec<Vec<u8>>) -> Result<Tensor, NetError> {
        let bytes = out
            .pop()
            .ok_or(ComputeError::ShapeMismatch("backend returned no output buffer"))?;
        let data: Vec<f32> = bytes
            .chunks_exact(std::mem::size_of::<f32>())
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        if data.len() != shape.iter().product::<usize>() {
            return Err(NetError::Shape {
                context: "backend output",
                expected: shape,
                found: vec![data.len()],
            });
        }
        Ok(Tensor { data, shape })
    }

    /// `self · wᵀ` where `self` is `[rows, k]` and `w` is stored `[n, k]`.
    ///
    /// # Errors
    /// Propagates the backend's shape checks.
    pub fn matmul_t(&self, w: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        let (m, k, n) = (self.rows(), self.cols(), w.rows());
        let config = MatMulConfig {
            m: dim_u32(m)?,
            k: dim_u32(k)?,
            n: dim_u32(n)?,
            transpose_b: 1,
        };
        let binds = [
            self.view(),
            w.view(),
            BufferView::zeros_f32(vec![m, n]),
            BufferView::from_pod(&config),
        ];
        let out = backend.dispatch(&Kernel::MatMul, &binds, workgroups(m * n))?;
        Self::from_dispatch(vec![m, n], out)
    }

    /// Adds `b` to every row.
    ///
    /// # Errors
    /// Propagates the backend's shape checks.
    pub fn add_broadcast(&self, b: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        let binds = [self.view(), b.view(), BufferView::zeros_f32(self.shape.clone())];
        let out = backend.dispatch(&Kernel::AddBroadcast, &binds, workgroups(self.len()))?;
        Self::from_dispatch(self.shape.clone(), out)
    }

    /// # Errors
    /// Propagates backend failures.
    pub fn relu(&self, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        self.unary(Kernel::Relu, backend)
    }

    /// # Errors
    /// Propagates backend failures.
    pub fn tanh(&self, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        self.unary(Kernel::Tanh, backend)
    }

    fn unary(&self, kernel: Kernel, backend: &dyn ComputeBackend) -> Result<Tensor, NetError> {
        let binds = [
            self.view(),
            BufferView::zeros_f32(self.shape.clone()),
            BufferView::from_f32(&[0.0], vec![1]),
        ];
        let out = backend.dispatch(&kernel, &binds, workgroups(self.len()))?;
        Self::from_dispatch(self.shape.clone(), out)
    }
}

fn dim_u32(d: usize) -> Result<u32, NetError> {
    u32::try_from(d).map_err(|_| NetError::Shape {
        context: "matmul dimension exceeds u32",
        expected: vec![u32::MAX as usize],
        found: vec![d],
    })
}

fn workgroups(len: usize) -> [u32; 3] {
    let groups = u32::try_from(len.div_ceil(256)).unwrap_or(u32::MAX);
    [groups.max(1), 1, 1]
}
