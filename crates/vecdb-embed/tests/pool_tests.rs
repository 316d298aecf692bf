use candle_core::{Device, Tensor};
use vecdb_embed::masked_mean_l2;

fn assert_close(got: &[f32], want: &[f32]) {
    assert_eq!(got.len(), want.len());
    for (a, b) in got.iter().zip(want) {
        assert!((a - b).abs() < 1e-5, "got {got:?}, want {want:?}");
    }
}

#[test]
fn padded_batch_pools_each_row_over_its_own_tokens() {
    let dev = Device::Cpu;
    // Row 0 keeps two tokens, row 1 only its first; padding carries large values
    // that would skew the mean if it leaked in.
    let hidden = Tensor::from_slice(&[
        3.0f32, 0.0, 0.0,   1.0, 4.0, 0.0,   9.0, 9.0, 9.0,
        0.0, 3.0, 4.0,      8.0, 8.0, 8.0,   8.0, 8.0, 8.0,
    ], (2, 3, 3), &dev).unwrap();
    // u32, as the tokenizer produces it.
    let mask = Tensor::from_slice(&[1u32, 1, 0, 1, 0, 0], (2, 3), &dev).unwrap();

    let rows: Vec<Vec<f32>> = masked_mean_l2(&hidden, &mask).unwrap().to_vec2().unwrap();
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert_close(&rows[0], &[half, half, 0.0]);
    assert_close(&rows[1], &[0.0, 0.6, 0.8]);
}

#[test]
fn masked_mean_l2_rejects_bad_rank() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[1.0f32, 2.0], (1, 2), &dev).unwrap();
    let mask = Tensor::from_slice(&[1.0f32], (1, 1), &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
