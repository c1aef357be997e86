use crate::layout::{STORAGE_IN, STORAGE_IN2, STORAGE_OUT};
use crate::{BufferView, ComputeError};

const NOT_F32: &str = "AddBroadcast kernel currently only supports f32";

/// Adds a vector to each row of a matrix.
///
/// Bindings `[a, b, output_placeholder]` expect `a` shaped `[batch, dim]` and
/// `b` shaped `[dim]`. The broadcasted sum is returned in a single buffer.
pub fn handle_add_broadcast(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 3 {
        return Err(ComputeError::ShapeMismatch(
            "AddBroadcast kernel expects 3 buffers (a, b, output_placeholder)",
        ));
    }
    let a_view = &binds[STORAGE_IN as usize];
    let b_view = &binds[STORAGE_IN2 as usize];
    let output_view = &binds[STORAGE_OUT as usize];

    let a_data = super::f32_values(a_view, NOT_F32)?;
    let b_data = super::f32_values(b_view, NOT_F32)?;
    if output_view.element_size_in_bytes != std::mem::size_of::<f32>() {
        return Err(ComputeError::ShapeMismatch(NOT_F32));
    }

    let &[batch, dim] = a_view.shape.as_slice() else {
        return Err(ComputeError::ShapeMismatch(
            "AddBroadcast expects a rank-2 left operand",
        ));
    };
    if b_view.shape != [dim] {
        return Err(ComputeError::ShapeMismatch(
            "AddBroadcast right operand must match the row width",
        ));
    }
    if output_view.shape != a_view.shape {
        return Err(ComputeError::ShapeMismatch(
            "AddBroadcast output placeholder must match the left operand",
        ));
    }

    let mut out_data = vec![0.0f32; batch * dim];
    for (out_row, a_row) in out_data.chunks_exact_mut(dim.max(1)).zip(a_data.chunks_exact(dim.max(1))) {
        for ((o, &a), &b) in out_row.iter_mut().zip(a_row).zip(b_data.iter()) {
            *o = a + b;
        }
    }

    let out_bytes = bytemuck::cast_slice(&out_data).to_vec();
    Ok(vec![out_bytes])
}
