/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```ignore
/// let cell_size = 600;
/// assert_interval!(cell_size, 2, 512);
/// ```
/// This will panic with the message "Invalid value for \`cell_size\`. Must be in the interval \[2, 512\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Mean of the trailing `window` values, or `0.0` if there are none
pub fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_mean_functional() {
        assert_eq!(trailing_mean(&[], 10), 0.0, "empty input");
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0], 10), 2.0, "window larger than input");
        assert_eq!(trailing_mean(&[100.0, 2.0, 4.0], 2), 3.0, "only trailing values counted");
    }
}
