use crate::model::PricePoint;
use chrono::{DateTime, Utc};

/// Returns the point closest in time to `target`; the earlier one wins a tie.
pub fn find_closest(series: &[PricePoint], target: DateTime<Utc>) -> Option<PricePoint> {
    let mut best: Option<(i64, PricePoint)> = None;
    for point in series {
        let distance = (point.timestamp - target).num_milliseconds().abs();
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, *point)),
        }
    }
    best.map(|(_, point)| point)
}
