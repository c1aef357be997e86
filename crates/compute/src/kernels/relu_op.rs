use super::unary_op::map_unary;
use crate::{BufferView, ComputeError};

pub fn handle_relu(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    map_unary(
        binds,
        "Relu kernel expects 3 buffers",
        "Relu kernel currently only supports f32 data",
        |x| x.max(0.0),
    )
}
