//! Signal primitives for matched filtering
//!
//! ## Step Kernel
//!
//! For an input of length N the kernel is N ones followed by N negative ones.
//! "Valid" convolution of the N samples with the 2N kernel yields N + 1
//! outputs:
//!
//! ```text
//! response[k] = sum(x[k..N]) - sum(x[0..k])      k = 0..=N
//! ```
//!
//! On a mean-centered series the total is zero, so the response is
//! `-2 * prefix_sum(k)` and peaks where a rising step starts. `step_response`
//! evaluates that closed form with running sums in O(N); `convolve_valid` is
//! the general O(N * M) definition and gives the same numbers up to rounding.

use alloc::vec;
use alloc::vec::Vec;

use crate::stats;

/// Subtract the arithmetic mean from every value
///
/// A flat series centers to exact zeros rather than to rounding residue,
/// so its step response is identically zero.
pub fn center(values: &[f64]) -> Vec<f64> {
    let Some(mean) = stats::mean(values) else {
        return Vec::new();
    };
    if values.iter().all(|&v| v == values[0]) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v - mean).collect()
}

/// N ones followed by N negative ones
pub fn step_kernel(n: usize) -> Vec<f64> {
    let mut kernel = vec![1.0; n];
    kernel.resize(2 * n, -1.0);
    kernel
}

/// Discrete linear convolution keeping only fully overlapping positions
///
/// Output length is `max(len) - min(len) + 1`. Either argument may be the
/// longer one; an empty argument yields an empty output.
pub fn convolve_valid(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let (long, short) = if signal.len() >= kernel.len() {
        (signal, kernel)
    } else {
        (kernel, signal)
    };
    if short.is_empty() {
        return Vec::new();
    }

    let m = short.len();
    (0..=long.len() - m)
        .map(|k| {
            short
                .iter()
                .enumerate()
                .map(|(j, s)| s * long[k + m - 1 - j])
                .sum()
        })
        .collect()
}

/// Response of `x` to its own-length step kernel, via running sums
///
/// Equal to `convolve_valid(x, &step_kernel(x.len()))`.
pub fn step_response(x: &[f64]) -> Vec<f64> {
    let total: f64 = x.iter().sum();
    let mut prefix = 0.0;
    let mut response = Vec::with_capacity(x.len() + 1);

    for k in 0..=x.len() {
        response.push((total - prefix) - prefix);
        if let Some(v) = x.get(k) {
            prefix += v;
        }
    }
    response
}

/// Index of the largest value; ties resolve to the first occurrence
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
