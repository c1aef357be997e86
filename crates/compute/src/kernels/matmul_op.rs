use crate::layout::{STORAGE_IN, STORAGE_IN2, UNIFORM_SC};
use crate::{BufferView, ComputeError, MatMulConfig};

const NOT_F32: &str = "MatMul kernel currently only supports f32 data for matrices A and B";

pub fn handle_matmul(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 4 {
        return Err(ComputeError::ShapeMismatch(
            "MatMul kernel expects 4 buffers",
        ));
    }
    let a_view = &binds[STORAGE_IN as usize];
    let b_view = &binds[STORAGE_IN2 as usize];
    let config_view = &binds[UNIFORM_SC as usize];

    if config_view.data.len() != std::mem::size_of::<MatMulConfig>() {
        return Err(ComputeError::ShapeMismatch(
            "MatMul config buffer has incorrect size",
        ));
    }
    let config: MatMulConfig = bytemuck::pod_read_unaligned(&config_view.data);
    let m = config.m as usize;
    let k = config.k as usize;
    let n = config.n as usize;
    let transpose_b = config.transpose_b != 0;

    let a_data = super::f32_values(a_view, NOT_F32)?;
    let b_data = super::f32_values(b_view, NOT_F32)?;

    if a_data.len() != m * k {
        return Err(ComputeError::ShapeMismatch(
            "Matrix A data length does not match M*K from config",
        ));
    }
    if b_data.len() != k * n {
        return Err(ComputeError::ShapeMismatch(
            "Matrix B data length does not match K*N from config",
        ));
    }
    if a_view.shape != [m, k] {
        return Err(ComputeError::ShapeMismatch(
            "Matrix A shape in BufferView does not match M,K from config",
        ));
    }
    let expected_b = if transpose_b { [n, k] } else { [k, n] };
    if b_view.shape != expected_b {
        return Err(ComputeError::ShapeMismatch(
            "Matrix B shape in BufferView does not match K,N from config",
        ));
    }

    let mut output_data = vec![0.0f32; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for l in 0..k {
                let b = if transpose_b { b_data[j * k + l] } else { b_data[l * n + j] };
                sum += a_data[i * k + l] * b;
            }
            output_data[i * n + j] = sum;
        }
    }

    let out_bytes = bytemuck::cast_slice(&output_data).to_vec();
    Ok(vec![out_bytes])
}
