// Exercises the public backend surface the way the network crate drives it:
// a full dense-layer pass built from individual dispatches.

use compute::{BufferView, ComputeBackend, ComputeError, Device, Kernel, MatMulConfig};

fn read_f32(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(bytemuck::pod_read_unaligned::<f32>).collect()
}

fn dense_pass(backend: &dyn ComputeBackend, x: &[f32], w: &[f32], b: &[f32], batch: usize, in_dim: usize, out_dim: usize) -> Vec<f32> {
    let cfg = MatMulConfig {
        m: u32::try_from(batch).unwrap(),
        k: u32::try_from(in_dim).unwrap(),
        n: u32::try_from(out_dim).unwrap(),
        transpose_b: 1,
    };
    let wx = backend
        .dispatch(
            &Kernel::MatMul,
            &[
                BufferView::from_f32(x, vec![batch, in_dim]),
                BufferView::from_f32(w, vec![out_dim, in_dim]),
                BufferView::zeros_f32(vec![batch, out_dim]),
                BufferView::from_pod(&cfg),
            ],
            [1, 1, 1],
        )
        .unwrap();
    let y = backend
        .dispatch(
            &Kernel::AddBroadcast,
            &[
                BufferView::from_f32(&read_f32(&wx[0]), vec![batch, out_dim]),
                BufferView::from_f32(b, vec![out_dim]),
                BufferView::zeros_f32(vec![batch, out_dim]),
            ],
            [1, 1, 1],
        )
        .unwrap();
    read_f32(&y[0])
}

#[test]
fn dense_pass_matches_manual_computation() {
    let backend = Device::Cpu.backend().unwrap();
    // w is [out=2, in=3]
    let w = [0.5f32, -1.0, 2.0, 1.0, 0.0, -0.5];
    let b = [0.1f32, -0.2];
    let x = [1.0f32, 2.0, 3.0, -1.0, 0.0, 1.0];
    let y = dense_pass(backend.as_ref(), &x, &w, &b, 2, 3, 2);
    let expected = [
        0.5 - 2.0 + 6.0 + 0.1,
        1.0 + 0.0 - 1.5 - 0.2,
        -0.5 + 0.0 + 2.0 + 0.1,
        -1.0 + 0.0 - 0.5 - 0.2,
    ];
    for (got, want) in y.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
    }
}

#[test]
fn activations_chain_after_dense_pass() {
    let backend = Device::Cpu.backend().unwrap();
    let pre = [-2.0f32, -0.5, 0.0, 0.5, 2.0];
    let relu = backend
        .dispatch(
            &Kernel::Relu,
            &[
                BufferView::from_f32(&pre, vec![1, 5]),
                BufferView::zeros_f32(vec![1, 5]),
                BufferView::from_f32(&[0.0], vec![1]),
            ],
            [1, 1, 1],
        )
        .unwrap();
    let relu = read_f32(&relu[0]);
    assert_eq!(relu, vec![0.0, 0.0, 0.0, 0.5, 2.0]);

    let tanh = backend
        .dispatch(
            &Kernel::Tanh,
            &[
                BufferView::from_f32(&relu, vec![1, 5]),
                BufferView::zeros_f32(vec![1, 5]),
                BufferView::from_f32(&[0.0], vec![1]),
            ],
            [1, 1, 1],
        )
        .unwrap();
    let tanh = read_f32(&tanh[0]);
    assert!(tanh.iter().all(|v| (-1.0..=1.0).contains(v)));
    assert!((tanh[4] - 2.0f32.tanh()).abs() < 1e-6);
}

#[test]
fn device_parses_from_config_text() {
    let device: Device = serde_json::from_str("\"cpu\"").unwrap();
    assert_eq!(device, Device::Cpu);
    let device: Device = serde_json::from_str("\"accelerator\"").unwrap();
    assert_eq!(device.backend().err(), Some(ComputeError::BackendUnavailable));
    assert!(serde_json::from_str::<Device>("\"tpu\"").is_err());
}
