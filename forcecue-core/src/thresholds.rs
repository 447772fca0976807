//! Force thresholds in newtons. Only the visual gradient uses these; alerts
//! come from the recorded labels.

pub const WARNING: f64 = 0.05;
pub const MEDIUM: f64 = 0.06;
pub const HIGH: f64 = 0.07;
pub const CRITICAL: f64 = 0.08;

/// Headroom above the critical line on the bar scale.
pub const SCALE_HEADROOM: f64 = 0.02;

/// Scale ceiling for the bar: the critical line plus headroom, or the force
/// itself when it exceeds that.
pub fn scale_max(force: f64) -> f64 {
    (CRITICAL + SCALE_HEADROOM).max(force)
}

/// Scale ticks from top to bottom.
pub const SCALE_TICKS: [f64; 5] = [CRITICAL, HIGH, MEDIUM, WARNING, 0.0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_max_keeps_headroom() {
        assert!((scale_max(0.01) - 0.10).abs() < 1e-12);
        assert_eq!(scale_max(0.25), 0.25);
    }
}
