//! Wind speed conversions to knots.

pub const KMH_TO_KNOTS: f64 = 0.539957;
pub const MS_TO_KNOTS: f64 = 1.94384;

pub fn kmh_to_knots(kmh: f64) -> f64 {
    kmh * KMH_TO_KNOTS
}

pub fn ms_to_knots(ms: f64) -> f64 {
    ms * MS_TO_KNOTS
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metres_per_second() {
        assert!((ms_to_knots(10.0) - 19.4384).abs() < 1e-3);
    }

    #[test]
    fn kilometres_per_hour() {
        assert!((kmh_to_knots(10.0) - 5.39957).abs() < 1e-3);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
