//! Axis sampling.

/// `steps` linearly spaced samples from `min` to `max`, both inclusive.
///
/// `sample[i] = min + i·(max − min)/(steps − 1)`. A single step yields just
/// `min`; zero steps yield an empty axis.
///
/// # Examples
/// ```
/// use greeksurf::surface::axis::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(0.01, 2.0, 1), vec![0.01]);
/// ```
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            (0..steps).map(|i| min + i as f64 * step).collect()
        }
    }
}

/// True if every sample is larger than the one before it.
pub(crate) fn is_strictly_increasing(axis: &[f64]) -> bool {
    axis.windows(2).all(|w| w[1] > w[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn endpoints_are_included() {
        let axis = linspace(50.0, 150.0, 40);
        assert_eq!(axis.len(), 40);
        assert_eq!(axis[0], 50.0);
        assert_abs_diff_eq!(axis[39], 150.0, epsilon = 1e-12);
        assert!(is_strictly_increasing(&axis));
    }

    #[test]
    fn spacing_is_uniform() {
        let axis = linspace(0.01, 1.0, 12);
        let step = axis[1] - axis[0];
        for w in axis.windows(2) {
            assert_abs_diff_eq!(w[1] - w[0], step, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_counts() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(is_strictly_increasing(&[3.0]));
        assert!(!is_strictly_increasing(&[1.0, 1.0]));
    }
}
