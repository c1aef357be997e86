pub const STORAGE_IN: u32 = 0;
pub const STORAGE_IN2: u32 = 1; // binary ops
pub const STORAGE_OUT: u32 = 2; // output placeholder of binary ops and matmul
pub const UNIFORM_SC: u32 = 3; // matmul dimensions

// Unary kernels bind `[input, output_placeholder, config]` instead.

/// Return expected number of bindings for each kernel.
#[must_use]
pub const fn binding_count(kernel: &crate::Kernel) -> u32 {
    match kernel {
        crate::Kernel::Tanh | crate::Kernel::Relu | crate::Kernel::AddBroadcast => 3,
        crate::Kernel::MatMul => 4,
    }
}
