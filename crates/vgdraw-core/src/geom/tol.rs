//! Comparison tolerances.

use serde::{Deserialize, Serialize};

/// Absolute threshold below which a computed scalar is treated as zero.
pub const ZERO_EPSILON: f64 = 1e-10;

/// Check if a scalar is zero within [`ZERO_EPSILON`].
pub fn is_zero(value: f64) -> bool {
    value.abs() < ZERO_EPSILON
}

/// Check if two scalars are equal within [`ZERO_EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    is_zero(a - b)
}

/// Pair of epsilons deciding when geometry is "close enough".
///
/// `point` is the largest distance at which two points are considered
/// coincident. `vector` is the largest sine/cosine ratio at which two
/// directions are considered parallel. A zero value means exact comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Point coincidence distance.
    pub point: f64,
    /// Direction closeness ratio.
    pub vector: f64,
}

impl Tolerance {
    /// Default point coincidence distance.
    pub const DEFAULT_POINT: f64 = 1e-7;
    /// Default direction closeness ratio.
    pub const DEFAULT_VECTOR: f64 = 1e-4;

    /// Exact comparison.
    pub const EXACT: Tolerance = Tolerance {
        point: 0.0,
        vector: 0.0,
    };

    /// Create a tolerance. Negative inputs are taken by magnitude.
    pub fn new(point: f64, vector: f64) -> Self {
        Self {
            point: point.abs(),
            vector: vector.abs(),
        }
    }

    /// Create a tolerance with the given point distance and the default vector ratio.
    pub fn with_point(point: f64) -> Self {
        Self::new(point, Self::DEFAULT_VECTOR)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            point: Self::DEFAULT_POINT,
            vector: Self::DEFAULT_VECTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_takes_magnitude() {
        let tol = Tolerance::new(-0.5, -0.1);
        assert_eq!(tol.point, 0.5);
        assert_eq!(tol.vector, 0.1);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(1e-12));
        assert!(!is_zero(1e-6));
        assert!(approx_eq(0.1 + 0.2, 0.3));
    }
}
