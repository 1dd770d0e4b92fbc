//! Derivation of cell-edge ("bounds") arrays from cell-center coordinates.

use ndarray::Array1;
use num_traits::Float;

/// Derive cell edges from uniformly spaced cell centers.
///
/// Returns `None` for empty or single-element input, where no spacing can be
/// sampled. Otherwise returns `n + 1` edges with
/// `edge[i] = centers[0] + (i - 0.5) * step`, where `step` is the spacing of
/// the first two centers.
///
/// Only the first interval is sampled: non-uniform input yields an edge set
/// consistent with that interval alone. This is an accepted approximation for
/// the regular model grids this crate targets.
pub fn guess_bounds<T: Float>(centers: &[T]) -> Option<Array1<T>> {
    if centers.len() < 2 {
        return None;
    }
    let step = centers[1] - centers[0];
    let half = T::from(0.5)?;
    let mut edge = centers[0] - step * half;
    let mut edges = Vec::with_capacity(centers.len() + 1);
    for _ in 0..=centers.len() {
        edges.push(edge);
        edge = edge + step;
    }
    Some(Array1::from_vec(edges))
}

/// Derive cell edges from a staggered (velocity-grid) coordinate axis.
///
/// On a staggered grid the velocity points sit on the edges of the tracer
/// cells, so the edge array is the staggered centers plus one extrapolated
/// final edge `2*s[n-1] - s[n-2]`. Returns `None` when fewer than two
/// staggered points are available.
pub fn staggered_bounds<T: Float>(staggered: &[T]) -> Option<Array1<T>> {
    let n = staggered.len();
    if n < 2 {
        return None;
    }
    let two = T::from(2.0)?;
    let last = two * staggered[n - 1] - staggered[n - 2];
    Some(Array1::from_iter(
        staggered.iter().copied().chain(std::iter::once(last)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_bounds_uniform() {
        let centers: Vec<f64> = (0..36).map(|i| i as f64 * 10.0).collect();
        let bounds = guess_bounds(&centers).unwrap();
        assert_eq!(bounds.len(), 37);
        assert!((bounds[0] - (-5.0)).abs() < 1e-12);
        assert!((bounds[36] - 355.0).abs() < 1e-12);
        // Monotonic in the same direction as the input.
        for w in bounds.as_slice().unwrap().windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_guess_bounds_descending() {
        let centers = [90.0_f64, 80.0, 70.0];
        let bounds = guess_bounds(&centers).unwrap();
        assert_eq!(bounds.len(), 4);
        assert!((bounds[0] - 95.0).abs() < 1e-12);
        for w in bounds.as_slice().unwrap().windows(2) {
            assert!(w[1] < w[0]);
        }
    }

    #[test]
    fn test_guess_bounds_degenerate() {
        assert!(guess_bounds::<f64>(&[]).is_none());
        assert!(guess_bounds(&[42.0_f64]).is_none());
    }

    #[test]
    fn test_staggered_bounds_extrapolates_last_edge() {
        let staggered = [0.0_f64, 1.25, 2.5, 3.75];
        let bounds = staggered_bounds(&staggered).unwrap();
        assert_eq!(bounds.len(), 5);
        assert!((bounds[4] - 5.0).abs() < 1e-12);
        assert_eq!(&bounds.as_slice().unwrap()[..4], &staggered);
    }

    #[test]
    fn test_staggered_bounds_degenerate() {
        assert!(staggered_bounds(&[1.0_f64]).is_none());
    }
}
