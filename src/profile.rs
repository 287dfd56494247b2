//! Per-track "sonic profile": stable pseudo-metrics derived from the track id.
//!
//! These are decorative. The same id always yields the same numbers.

const KEYS: [&str; 8] = ["C Maj", "Am", "G Maj", "Em", "D Maj", "Bm", "F Maj", "Dm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SonicProfile {
    pub bpm: u32,
    pub energy: u32,
    pub danceability: u32,
    pub key: &'static str,
}

/// 32-bit rolling string hash (`h * 31 + c`, wrapping), absolute value.
fn seed(id: &str) -> u32 {
    let hash = id.encode_utf16().fold(0_i32, |h, c| {
        i32::from(c).wrapping_add(h.wrapping_shl(5).wrapping_sub(h))
    });
    hash.unsigned_abs()
}

impl SonicProfile {
    pub fn for_track_id(id: &str) -> Self {
        let seed = seed(id);
        Self {
            bpm: 80 + seed % 60,
            energy: 40 + seed % 60,
            danceability: 30 + seed % 70,
            key: KEYS[(seed % KEYS.len() as u32) as usize],
        }
    }
}
