mod angle;

pub use angle::*;

/// Game tics per second
pub const TICRATE: i32 = 35;

/// Seconds to tics, rounded to nearest like `FLT2TIC`
#[inline]
pub fn flt2tic(seconds: f32) -> i32 {
    (seconds * TICRATE as f32).round() as i32
}

/// Tics to seconds
#[inline]
pub fn tic2flt(tics: i32) -> f32 {
    tics as f32 / TICRATE as f32
}

pub const RNDTABLE: [i32; 256] = [
    0, 8, 109, 220, 222, 241, 149, 107, 75, 248, 254, 140, 16, 66, 74, 21, 211, 47, 80, 242, 154,
    27, 205, 128, 161, 89, 77, 36, 95, 110, 85, 48, 212, 140, 211, 249, 22, 79, 200, 50, 28, 188,
    52, 140, 202, 120, 68, 145, 62, 70, 184, 190, 91, 197, 152, 224, 149, 104, 25, 178, 252, 182,
    202, 182, 141, 197, 4, 81, 181, 242, 145, 42, 39, 227, 156, 198, 225, 193, 219, 93, 122, 175,
    249, 0, 175, 143, 70, 239, 46, 246, 163, 53, 163, 109, 168, 135, 2, 235, 25, 92, 20, 145, 138,
    77, 69, 166, 78, 176, 173, 212, 166, 113, 94, 161, 41, 50, 239, 49, 111, 164, 70, 60, 2, 37,
    171, 75, 136, 156, 11, 56, 42, 146, 138, 229, 73, 146, 77, 61, 98, 196, 135, 106, 63, 197, 195,
    86, 96, 203, 113, 101, 170, 247, 181, 113, 80, 250, 108, 7, 255, 237, 129, 226, 79, 107, 112,
    166, 103, 241, 24, 223, 239, 120, 198, 58, 60, 82, 128, 3, 184, 66, 143, 224, 145, 224, 81,
    206, 163, 45, 63, 90, 168, 114, 59, 33, 159, 95, 28, 139, 123, 98, 125, 196, 15, 70, 194, 253,
    54, 14, 109, 226, 71, 17, 161, 93, 186, 87, 244, 138, 20, 52, 123, 251, 26, 36, 17, 46, 52,
    231, 232, 76, 31, 221, 84, 37, 216, 165, 212, 106, 197, 242, 98, 43, 39, 175, 254, 145, 190,
    84, 118, 222, 187, 136, 120, 163, 236, 249,
];

/// The Doom random table walker. Each map owns one so that playback is
/// deterministic for a given starting index.
#[derive(Debug, Default, Clone)]
pub struct Random {
    index: usize,
}

impl Random {
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Next value in `0..=255`
    #[inline]
    pub fn p_random(&mut self) -> i32 {
        self.index = (self.index + 1) & 0xFF;
        RNDTABLE[self.index]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.index = 0;
    }

    /// Random value in `min..=max`. Swapped bounds are accepted.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        let span = hi as i64 - lo as i64 + 1;
        // One table read per byte until the span is covered, at most 40 bits
        let mut r = 0i64;
        let mut bits = 0;
        while bits < 40 && (1i64 << bits) < span {
            r = (r << 8) | self.p_random() as i64;
            bits += 8;
        }
        (lo as i64 + r % span) as i32
    }

    /// `value` varied by up to `percent` percent in either direction
    pub fn percent_float(&mut self, value: f32, percent: f32) -> f32 {
        let i = (2.0 * self.p_random() as f32 / 255.0 - 1.0) * percent / 100.0;
        value * (1.0 + i)
    }
}
