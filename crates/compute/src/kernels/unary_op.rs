use crate::{BufferView, ComputeError};

/// Shared body of the element-wise kernels.
///
/// Bindings are `[input, output_placeholder, config]`; the config buffer is
/// reserved for future scalars and ignored here.
pub(crate) fn map_unary(
    binds: &[BufferView],
    missing: &'static str,
    not_f32: &'static str,
    f: impl Fn(f32) -> f32,
) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 3 {
        return Err(ComputeError::ShapeMismatch(missing));
    }
    let input_values = super::f32_values(&binds[0], not_f32)?;
    if binds[1].element_count() != input_values.len() {
        return Err(ComputeError::ShapeMismatch(
            "Output placeholder does not match input element count",
        ));
    }
    let output_values: Vec<f32> = input_values.iter().map(|&x| f(x)).collect();
    Ok(vec![bytemuck::cast_slice(&output_values).to_vec()])
}
