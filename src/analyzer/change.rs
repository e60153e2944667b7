use crate::model::{AnalysisError, Evaluation};

/// Percent change of `current` against `reference` and whether it crosses `threshold_percent`.
/// The threshold is inclusive.
pub fn evaluate(current: f64, reference: f64, threshold_percent: f64) -> Result<Evaluation, AnalysisError> {
    if !(reference.is_finite() && reference > 0.0) {
        return Err(AnalysisError::InvalidReference(reference));
    }
    let change_percent = (current - reference) / reference * 100.0;
    Ok(Evaluation {
        change_percent,
        should_notify: change_percent.abs() >= threshold_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_sign() {
        let up = evaluate(110.0, 100.0, 3.0).unwrap();
        assert!((up.change_percent - 10.0).abs() < 1e-9);
        let down = evaluate(90.0, 100.0, 3.0).unwrap();
        assert!((down.change_percent + 10.0).abs() < 1e-9);
        assert!(up.should_notify && down.should_notify);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let eval = evaluate(103.0, 100.0, 3.0).unwrap();
        assert!((eval.change_percent - 3.0).abs() < 1e-9);
        // 103/100 is not exact in binary; use an exactly representable case too
        let exact = evaluate(150.0, 100.0, 50.0).unwrap();
        assert_eq!(exact.change_percent, 50.0);
        assert!(exact.should_notify);
        let exact_down = evaluate(50.0, 100.0, 50.0).unwrap();
        assert!(exact_down.should_notify);
    }

    #[test]
    fn test_below_threshold() {
        let eval = evaluate(30500.0, 30000.0, 3.0).unwrap();
        assert!((eval.change_percent - 1.6667).abs() < 1e-3);
        assert!(!eval.should_notify);
    }

    #[test]
    fn test_invalid_reference() {
        assert_eq!(evaluate(10.0, 0.0, 3.0), Err(AnalysisError::InvalidReference(0.0)));
        assert!(evaluate(10.0, -5.0, 3.0).is_err());
        assert!(evaluate(10.0, f64::NAN, 3.0).is_err());
    }
}
