use crate::{BufferView, ComputeError, Kernel};

pub trait ComputeBackend: Send + Sync + 'static {
    /// Dispatches a kernel with the given bindings and workgroup configuration.
    ///
    /// # Arguments
    /// * `shader`: The kernel to dispatch.
    /// * `binds`: Input buffers first, then the output placeholder, then any
    ///   config buffer, in the order given by [`crate::layout`].
    /// * `workgroups`: The number of workgroups to dispatch. Ignored by the CPU.
    ///
    /// # Returns
    ///
    /// One `Vec<u8>` per buffer written by the kernel, intended for read-back.
    ///
    /// # Errors
    ///
    /// Returns `ComputeError::ShapeMismatch` if any buffer is inconsistent with
    /// its shape or with the kernel's expectations.
    fn dispatch(
        &self,
        shader: &Kernel,
        binds: &[BufferView],
        workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError>;

    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;
}
