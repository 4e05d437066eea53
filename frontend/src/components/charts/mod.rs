pub mod merchant_bars;
pub mod monthly_spending;

use plotters::style::RGBColor;

pub const PRIMARY: RGBColor = RGBColor(107, 70, 193);
pub const TEAL: RGBColor = RGBColor(13, 148, 136);
pub const PINK: RGBColor = RGBColor(247, 107, 138);
pub const AXIS: RGBColor = RGBColor(230, 230, 230);
pub const GRID: RGBColor = RGBColor(245, 245, 245);

/// Headroom above the tallest bar so it does not touch the frame
pub fn y_axis_max(max_value: f64) -> f64 {
    if max_value <= 0.0 || !max_value.is_finite() {
        1.0
    } else {
        max_value * 1.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_axis_max() {
        assert_eq!(y_axis_max(0.0), 1.0);
        assert_eq!(y_axis_max(f64::NAN), 1.0);
        assert!((y_axis_max(100.0) - 110.0).abs() < 1e-9);
    }
}
