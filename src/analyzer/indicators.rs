use crate::model::{IndicatorSeries, PricePoint};

/// Simple moving average aligned with `prices`.
/// Entry `i` is the mean of the `window` prices ending at `i`, `None` while fewer are available.
pub fn compute_sma(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; prices.len()];
    if window == 0 || prices.len() < window {
        return result;
    }
    for (offset, slice) in prices.windows(window).enumerate() {
        result[offset + window - 1] = Some(slice.iter().sum::<f64>() / window as f64);
    }
    result
}

/// RSI with plain rolling means of gains and losses over `period` deltas.
///
/// The first delta exists at index 1, so the first defined value is at index `period`.
/// A window without losses yields 100.
pub fn compute_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return result;
    }

    let (ups, downs): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    // ups[j] is the delta ending at price index j + 1
    for end in (period - 1)..ups.len() {
        let start = end + 1 - period;
        let mean_up = ups[start..=end].iter().sum::<f64>() / period as f64;
        let mean_down = downs[start..=end].iter().sum::<f64>() / period as f64;
        let rsi = if mean_down == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + mean_up / mean_down)
        };
        result[end + 1] = Some(rsi);
    }
    result
}

pub fn compute_indicators(series: &[PricePoint], sma_window: usize, rsi_period: usize) -> IndicatorSeries {
    let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
    IndicatorSeries {
        sma: compute_sma(&prices, sma_window),
        rsi: compute_rsi(&prices, rsi_period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window_three() {
        let sma = compute_sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_short_series_is_undefined() {
        assert_eq!(compute_sma(&[1.0, 2.0], 20), vec![None, None]);
        assert!(compute_sma(&[], 3).is_empty());
    }

    #[test]
    fn test_rsi_insufficient_history() {
        let prices: Vec<f64> = (1..=13).map(|v| v as f64).collect();
        assert!(compute_rsi(&prices, 14).iter().all(|v| v.is_none()));

        // 14 prices give only 13 deltas
        let prices: Vec<f64> = (1..=14).map(|v| v as f64).collect();
        assert!(compute_rsi(&prices, 14).iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_without_losses_is_100() {
        let prices: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let rsi = compute_rsi(&prices, 14);
        assert!(rsi[..14].iter().all(|v| v.is_none()));
        assert!(rsi[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_mixed_moves() {
        // deltas: +2, -1, +2, -1 -> mean up 1.0, mean down 0.5, rs 2
        let rsi = compute_rsi(&[10.0, 12.0, 11.0, 13.0, 12.0], 4);
        assert_eq!(rsi[..4], [None, None, None, None]);
        let last = rsi[4].unwrap();
        assert!((last - 66.666_666).abs() < 1e-4);
    }

    #[test]
    fn test_rsi_stays_in_bounds() {
        let prices = [5.0, 4.0, 6.0, 3.0, 7.0, 2.0, 8.0, 8.0, 1.0];
        for value in compute_rsi(&prices, 3).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
