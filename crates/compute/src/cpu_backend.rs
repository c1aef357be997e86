use crate::{kernels, BufferView, ComputeBackend, ComputeError, Kernel};

#[derive(Default, Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    fn dispatch(
        &self,
        shader: &Kernel,
        binds: &[BufferView],
        _workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError> {
        for buffer_view in binds {
            buffer_view.validate()?;
        }
        match shader {
            Kernel::Tanh => kernels::handle_tanh(binds),
            Kernel::Relu => kernels::handle_relu(binds),
            Kernel::AddBroadcast => kernels::handle_add_broadcast(binds),
            Kernel::MatMul => kernels::handle_matmul(binds),
        }
    }

    fn name(&self) -> &'static str {
        "cpu"
    }
}
