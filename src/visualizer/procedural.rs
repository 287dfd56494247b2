/// Synthesise a plausible bar height for bin `index` at `time_ms`.
///
/// Two phase-shifted waves give the movement, `jitter` (in `[0, 1)`) adds
/// energy. The result lies in `[2, height]`.
pub fn bar_height(index: usize, time_ms: f64, height: f32, jitter: f32) -> f32 {
    let t = time_ms / 150.0;
    let i = index as f64;
    let wave1 = (t + i / 3.0).sin();
    let wave2 = (t * 2.0 + i).cos();
    let noise = ((wave1 + wave2) / 2.0) as f32;

    let amplitude = noise.abs() * height * 0.8;
    let energy = jitter.clamp(0.0, 1.0) * height * 0.2;

    (amplitude + energy).clamp(2.0_f32.min(height), height)
}
