//! Small time-series statistics used by analysis callers.

/// Trailing running mean over `n` entries.
///
/// Only past values enter each window; the first `n - 1` outputs average the
/// partial window available so far. Returns an empty vector for empty input;
/// `n = 0` is treated as `n = 1`.
pub fn running_mean(data: &[f64], n: usize) -> Vec<f64> {
    let n = n.max(1);
    let mut out = Vec::with_capacity(data.len());
    let mut sum = 0.0;
    for i in 0..data.len() {
        sum += data[i];
        if i >= n {
            sum -= data[i - n];
        }
        let window = (i + 1).min(n);
        out.push(sum / window as f64);
    }
    out
}
