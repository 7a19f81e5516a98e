use crate::distance::Distance;
use crate::nearest_centroid::BruteForce;
use crate::validation::{validate_centroids, validate_points};
use crate::ConfigurationError;
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a clustering run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Reassigning the points to the final centroids left every assignment unchanged.
    Converged,
    /// The iteration budget ran out before the assignments stabilised.
    Exhausted,
}

/// A snapshot of one iteration, kept when history recording is turned on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IterationRecord<T> {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Centroids produced by this iteration's update step.
    pub centroids: Vec<Vec<T>>,
    /// Assignment of every point to its nearest centroid in `centroids`.
    pub assignment: Vec<usize>,
    /// Sum of squared distances from each point to its assigned centroid.
    pub distortion: T,
}

/// The outcome of a K-means run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeansResult<T> {
    /// For each data point, the index of the centroid it belongs to.
    pub assignment: Vec<usize>,
    /// The final centroids, indexed the same way as the initial centroids.
    pub centroids: Vec<Vec<T>>,
    /// The number of update steps performed.
    pub n_iter: usize,
    /// Whether the run converged or ran out of iterations.
    pub termination: Termination,
    /// Sum of squared distances from each point to its assigned centroid.
    pub distortion: T,
    /// The number of points assigned to each centroid. May contain zeros.
    pub cluster_sizes: Vec<usize>,
    /// Per iteration snapshots. Empty unless history recording was turned on.
    pub history: Vec<IterationRecord<T>>,
}

impl<T: Float> KMeansResult<T> {
    /// True if the run ended with `Termination::Converged`.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Assigns new points to their nearest final centroid. Ties go to the lowest
    /// centroid index.
    ///
    /// # Parameters
    /// * `points` - the points to label, with the same dimensionality as the clustered data
    /// * `distance` - the distance function, normally the one used for clustering
    ///
    /// # Returns
    /// * the index of the nearest centroid for each point, or an error if a point has the
    ///   wrong dimensionality or a non-finite coordinate
    pub fn predict<D: Distance<T>>(&self, points: &[Vec<T>], distance: &D)
        -> Result<Vec<usize>, ConfigurationError> {
        let n_dims = self.centroids.first().map_or(0, Vec::len);
        validate_centroids(&self.centroids, n_dims)?;
        validate_points(points, n_dims)?;
        Ok(BruteForce::assign(points, &self.centroids, distance))
    }
}

pub(crate) fn count_cluster_sizes(assignment: &[usize], n_clusters: usize) -> Vec<usize> {
    let mut sizes = vec![0; n_clusters];
    assignment.iter().for_each(|&cluster_id| sizes[cluster_id] += 1);
    sizes
}
