use xxhash_rust::xxh3::xxh3_64_with_seed;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Stable 64-bit hash of an integer id, used to pick lock stripes.
pub(crate) fn stable_hash_u64(v: u64) -> u64 {
    xxh3_64_with_seed(&v.to_le_bytes(), XXH3_SEED)
}

/// Relative-or-absolute closeness test for spline coordinates.
///
/// Infinite values compare equal only to the same infinity.
pub fn is_close(a: f64, b: f64, tol: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let diff = (a - b).abs();
    diff <= tol || diff <= tol * a.abs().max(b.abs())
}

/// `floor(numer / denom)` as an iteration index, saturating at the `i32` range.
pub(crate) fn floor_iteration(numer: f64, denom: f64) -> i32 {
    let q = (numer / denom).floor();
    if q.is_nan() {
        0
    } else {
        q.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
