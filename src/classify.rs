use crate::types::Rgb;

/// Ordered rate buckets: a rate belongs to the first bucket whose upper
/// bound it is below. Rates at or above the last bound take TOP_COLOR.
/// The legend is generated from this same table.
pub const BUCKETS: [(f64, Rgb); 5] = [
    (1.0, Rgb(255, 0, 0)),
    (1.25, Rgb(0, 0, 128)),
    (1.50, Rgb(0, 0, 255)),
    (1.75, Rgb(0, 102, 204)),
    (2.0, Rgb(0, 204, 255)),
];

pub const TOP_COLOR: Rgb = Rgb(0, 255, 255);

/// Total over all reals: every rate lands in exactly one bucket.
pub fn classify(rate: f64) -> Rgb {
    for (upper, color) in BUCKETS {
        if rate < upper {
            return color;
        }
    }
    TOP_COLOR
}

/// Legend rows, one per bucket, labelled like "1.00 - 1.24".
pub fn legend_entries() -> Vec<(String, Rgb)> {
    let mut entries = Vec::with_capacity(BUCKETS.len() + 1);
    let mut lower: Option<f64> = None;
    for (upper, color) in BUCKETS {
        let label = match lower {
            None => format!("< {:.2}", upper),
            Some(lo) => format!("{:.2} - {:.2}", lo, upper - 0.01),
        };
        entries.push((label, color));
        lower = Some(upper);
    }
    entries.push((format!(">= {:.2}", BUCKETS[BUCKETS.len() - 1].0), TOP_COLOR));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_lower_bounds_are_inclusive() {
        assert_eq!(classify(1.0), Rgb(0, 0, 128));
        assert_eq!(classify(2.0), Rgb(0, 255, 255));
    }

    #[test]
    fn values_just_under_a_bound_stay_in_the_lower_bucket() {
        assert_eq!(classify(0.999999), Rgb(255, 0, 0));
        assert_eq!(classify(1.999999), Rgb(0, 204, 255));
    }

    #[test]
    fn one_color_per_bucket_interval() {
        assert_eq!(classify(0.5), Rgb(255, 0, 0));
        assert_eq!(classify(1.1), Rgb(0, 0, 128));
        assert_eq!(classify(1.3), Rgb(0, 0, 255));
        assert_eq!(classify(1.6), Rgb(0, 102, 204));
        assert_eq!(classify(1.9), Rgb(0, 204, 255));
        assert_eq!(classify(2.5), Rgb(0, 255, 255));
    }

    #[test]
    fn extremes_are_still_classified() {
        assert_eq!(classify(-10.0), Rgb(255, 0, 0));
        assert_eq!(classify(f64::MAX), Rgb(0, 255, 255));
    }

    #[test]
    fn buckets_are_strictly_ordered() {
        for pair in BUCKETS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn legend_matches_bucket_table() {
        let entries = legend_entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0], ("< 1.00".to_string(), Rgb(255, 0, 0)));
        assert_eq!(entries[1], ("1.00 - 1.24".to_string(), Rgb(0, 0, 128)));
        assert_eq!(entries[2], ("1.25 - 1.49".to_string(), Rgb(0, 0, 255)));
        assert_eq!(entries[3], ("1.50 - 1.74".to_string(), Rgb(0, 102, 204)));
        assert_eq!(entries[4], ("1.75 - 1.99".to_string(), Rgb(0, 204, 255)));
        assert_eq!(entries[5], (">= 2.00".to_string(), Rgb(0, 255, 255)));
    }
}
