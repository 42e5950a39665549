//! Rolling volatility helpers.

/// Rolling sample standard deviation over a fixed window.
///
/// Uses the sample estimator (n - 1 denominator). Yields one value per full
/// window, so the output has `data.len() - window + 1` entries; windows
/// during warm-up are discarded. Empty when the data is shorter than the
/// window.
pub fn rolling_std(data: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || data.len() < window {
        return vec![];
    }

    let n = window as f64;
    data.windows(window)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / n;
            let variance = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        })
        .collect()
}

/// Arithmetic mean; 0.0 for an empty slice.
pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}
