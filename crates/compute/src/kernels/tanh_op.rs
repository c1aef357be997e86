use super::unary_op::map_unary;
use crate::{BufferView, ComputeError};

pub fn handle_tanh(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    map_unary(
        binds,
        "Tanh kernel expects 3 buffers",
        "Tanh kernel currently only supports f32 data",
        f32::tanh,
    )
}
