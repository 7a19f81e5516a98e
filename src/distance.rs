use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Possible distance metrics that can be used in K-means when measuring how far
/// each data point is from each centroid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric {
    /// The square root of the sum of squared coordinate differences. The default.
    Euclidean,
    /// The sum of squared coordinate differences. Produces the same assignments as
    /// Euclidean while skipping the square root, as long as squared differences stay below
    /// the largest representable float.
    SquaredEuclidean,
    /// The sum of absolute coordinate differences.
    Manhattan,
    /// The largest absolute coordinate difference.
    Chebyshev,
}

/// A distance function over pairs of equal length points.
///
/// Implemented for [`DistanceMetric`] and for any closure of the form
/// `Fn(&[T], &[T]) -> T`, so callers can supply their own metric. The clusterer does
/// not check that a custom function is a true metric, but convergence reasoning
/// assumes it is non-negative, symmetric and zero only for equal points.
pub trait Distance<T> {
    fn distance(&self, a: &[T], b: &[T]) -> T;

    /// Whether the function is monotone in per-coordinate differences, which is
    /// what a k-d tree needs to prune its search space. Defaults to false.
    fn supports_spatial_index(&self) -> bool {
        false
    }
}

impl<T: Float> Distance<T> for DistanceMetric {
    fn distance(&self, a: &[T], b: &[T]) -> T {
        match *self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::SquaredEuclidean => squared_euclidean_distance(a, b),
            Self::Manhattan => manhattan_distance(a, b),
            Self::Chebyshev => chebyshev_distance(a, b),
        }
    }

    fn supports_spatial_index(&self) -> bool {
        true
    }
}

impl<T, F> Distance<T> for F
where
    F: Fn(&[T], &[T]) -> T,
{
    fn distance(&self, a: &[T], b: &[T]) -> T {
        self(a, b)
    }
}

/// Scales the differences by the largest one before squaring, as `hypot` does, so the
/// result is finite whenever every coordinate difference is.
pub(crate) fn euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    let scale = chebyshev_distance(a, b);
    if scale == T::zero() || !scale.is_finite() {
        return scale;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x - *y) / scale)
        .map(|ratio| ratio * ratio)
        .fold(T::zero(), std::ops::Add::add)
        .sqrt()
        * scale
}

pub(crate) fn squared_euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x - *y) * (*x - *y))
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn manhattan_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x - *y).abs())
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn chebyshev_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x - *y).abs())
        .fold(T::zero(), T::max)
}
