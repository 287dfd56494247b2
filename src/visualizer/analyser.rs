//! Frequency analysis in the style of a browser analyser node.
//!
//! Per call: Blackman window over the newest `fft_size` samples, forward FFT,
//! magnitude / N, exponential smoothing against the previous call, then
//! `[min_db, max_db]` mapped linearly onto `[0, 1]`.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::VisualizerSettings;

pub struct FrequencyAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl FrequencyAnalyser {
    pub fn new(settings: &VisualizerSettings) -> Self {
        let n = settings.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(n);

        // Blackman window (alpha = 0.16).
        let a0 = 0.42;
        let a1 = 0.5;
        let a2 = 0.08;
        let window = (0..n)
            .map(|i| {
                let x = i as f32 / n as f32;
                a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
            })
            .collect();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); n],
            smoothed: vec![0.0; n / 2],
            smoothing: settings.smoothing,
            min_db: settings.min_db,
            max_db: settings.max_db,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Analyse `samples` (exactly `fft_size` of them) into `out`
    /// (`bin_count` values in `[0, 1]`).
    pub fn frequency_data(&mut self, samples: &[f32], out: &mut [f32]) {
        let n = self.fft_size();
        for ((slot, &s), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(s * w, 0.0);
        }
        for slot in self.scratch.iter_mut().skip(samples.len()) {
            *slot = Complex::new(0.0, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let range = self.max_db - self.min_db;
        for (k, (prev, dst)) in self.smoothed.iter_mut().zip(out.iter_mut()).enumerate() {
            let magnitude = self.scratch[k].norm() / n as f32;
            *prev = self.smoothing * *prev + (1.0 - self.smoothing) * magnitude;

            *dst = if *prev > 0.0 {
                let db = 20.0 * prev.log10();
                ((db - self.min_db) / range).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }
}
