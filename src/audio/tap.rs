//! A read-only copy of the output signal for the visualizer.
//!
//! `TapSource` sits between the decoder and the sink and mirrors every frame
//! (mixed down to mono) into a bounded ring shared with a `SampleTap`. Nothing
//! is copied until the tap has been resumed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{ChannelCount, Sample, SampleRate, Source};

const FLUSH_EVERY: usize = 256;

struct Shared {
    running: AtomicBool,
    /// Bumped on every push; lets readers spot a stalled signal.
    generation: AtomicU64,
    ring: Mutex<VecDeque<f32>>,
    capacity: usize,
}

/// Handle to the mono sample history of the output.
#[derive(Clone)]
pub struct SampleTap {
    shared: Arc<Shared>,
}

impl SampleTap {
    /// A suspended tap that keeps at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                ring: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity: capacity.max(1),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }

    /// Start capturing. Idempotent.
    pub fn resume(&self) {
        self.shared.running.store(true, Ordering::Relaxed);
    }

    pub(crate) fn push(&self, samples: &[f32]) {
        let Ok(mut ring) = self.shared.ring.lock() else {
            return;
        };
        ring.extend(samples.iter().copied());
        let excess = ring.len().saturating_sub(self.shared.capacity);
        ring.drain(..excess);
        self.shared.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Forget the captured history, e.g. when a new source is loaded.
    pub(crate) fn clear(&self) {
        if let Ok(mut ring) = self.shared.ring.lock() {
            ring.clear();
        }
    }

    /// Number of pushes so far. Unchanged between two reads means no new audio.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Relaxed)
    }

    /// Copy the most recent `count` samples into `out`, zero-padded at the
    /// front when fewer have been captured.
    pub fn latest(&self, count: usize, out: &mut Vec<f32>) {
        out.clear();
        out.resize(count, 0.0);
        let Ok(ring) = self.shared.ring.lock() else {
            return;
        };
        let available = ring.len().min(count);
        let src = ring.range(ring.len() - available..);
        for (dst, &s) in out[count - available..].iter_mut().zip(src) {
            *dst = s;
        }
    }
}

/// Pass-through source that mirrors its output into an optional tap.
pub(crate) struct TapSource<S> {
    inner: S,
    tap: Option<SampleTap>,
    frame_sum: f32,
    frame_pos: ChannelCount,
    batch: Vec<f32>,
}

impl<S: Source> TapSource<S> {
    pub(crate) fn new(inner: S, tap: Option<SampleTap>) -> Self {
        Self {
            inner,
            tap,
            frame_sum: 0.0,
            frame_pos: 0,
            batch: Vec::with_capacity(FLUSH_EVERY),
        }
    }

    fn flush(&mut self) {
        if let Some(tap) = &self.tap {
            if !self.batch.is_empty() {
                tap.push(&self.batch);
            }
        }
        self.batch.clear();
    }

    fn record(&mut self, sample: Sample) {
        let running = self.tap.as_ref().is_some_and(SampleTap::is_running);
        if !running {
            return;
        }

        let channels = self.inner.channels().max(1);
        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos >= channels {
            self.batch.push(self.frame_sum / f32::from(channels));
            self.frame_sum = 0.0;
            self.frame_pos = 0;
            if self.batch.len() >= FLUSH_EVERY {
                self.flush();
            }
        }
    }
}

impl<S: Source> Iterator for TapSource<S> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        match self.inner.next() {
            Some(sample) => {
                self.record(sample);
                Some(sample)
            }
            None => {
                self.flush();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: Source> Source for TapSource<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        self.batch.clear();
        self.inner.try_seek(pos)
    }
}
