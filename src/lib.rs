//! K-means clustering in Rust. Generic over floating point numeric types.
//!
//! K-means partitions a set of points into K clusters. Starting from K initial centroids
//! it alternates two steps (Lloyd's algorithm):
//!  1. Assignment: every point is assigned to its nearest centroid. A point that is equally
//!     distant from several centroids goes to the one with the lowest index, so runs are
//!     fully reproducible;
//!  2. Update: every centroid moves to the elementwise mean of its assigned points. A
//!     centroid with no assigned points stays exactly where it was.
//!
//! Clustering stops when reassigning the points to the updated centroids changes nothing
//! (converged), or when the iteration budget runs out (exhausted).
//!
//! Initial centroids are either given explicitly or chosen by a seeded strategy, so there
//! is no hidden random state. The distance function defaults to Euclidean and can be
//! replaced by any closure over pairs of points.
//!
//! # Examples
//! ```
//!use kmeans::{KMeans, KMeansHyperParams};
//!
//!let data: Vec<Vec<f64>> = vec![
//!    vec![0.0, 0.0],
//!    vec![0.0, 1.0],
//!    vec![10.0, 0.0],
//!    vec![10.0, 1.0],
//!];
//!let initial_centroids = vec![vec![0.0, 0.0], vec![10.0, 0.0]];
//!let hyper_params = KMeansHyperParams::builder()
//!    .n_clusters(2)
//!    .max_iter(10)
//!    .build();
//!let clusterer = KMeans::with_initial_centroids(&data, initial_centroids, hyper_params)
//!    .unwrap();
//!let result = clusterer.run();
//!assert!(result.converged());
//!assert_eq!(result.assignment, vec![0, 0, 1, 1]);
//!assert_eq!(result.centroids, vec![vec![0.0, 0.5], vec![10.0, 0.5]]);
//! ```
//!
//! # References
//! * [Lloyd, S. Least squares quantization in PCM.](https://ieeexplore.ieee.org/document/1056489)
//! * [Arthur, D.; Vassilvitskii, S. k-means++: The Advantages of Careful Seeding.](https://theory.stanford.edu/~sergei/papers/kMeansPP-soda.pdf)

use num_traits::Float;
use tracing::{debug, info, warn};
use crate::centroids::update_centroids;
use crate::nearest_centroid::NearestCentroid;
use crate::result::count_cluster_sizes;
use crate::validation::{validate_assignment, validate_centroids, DataValidator};

pub use crate::distance::{Distance, DistanceMetric};
pub use crate::error::ConfigurationError;
pub use crate::hyper_parameters::{HyperParamBuilder, KMeansHyperParams};
pub use crate::initialisation::Initialisation;
pub use crate::nearest_centroid::NnAlgorithm;
pub use crate::result::{IterationRecord, KMeansResult, Termination};

mod centroids;
mod distance;
mod error;
mod hyper_parameters;
mod initialisation;
mod nearest_centroid;
pub mod restarts;
mod result;
mod validation;

/// The K-means clustering algorithm in Rust. Generic over floating point numeric types and
/// over the distance function, which defaults to one of the built in [`DistanceMetric`]s.
///
/// All configuration is checked on construction. A constructed clusterer cannot fail: `run`
/// always returns a result.
#[derive(Debug, Clone)]
pub struct KMeans<'a, T, D = DistanceMetric> {
    data: &'a [Vec<T>],
    hyper_params: KMeansHyperParams,
    initial_centroids: Vec<Vec<T>>,
    distance: D,
}

impl<'a, T: Float> KMeans<'a, T> {
    /// Creates an instance of the K-means clustering model using a custom hyper parameter
    /// configuration. The initial centroids are chosen by the configured initialisation
    /// strategy.
    ///
    /// # Parameters
    /// * `data` - a reference to the data to cluster, a collection of vectors of floating points
    ///            numbers. The vectors must all be of the same, non-zero dimensionality and
    ///            contain only finite values.
    /// * `hyper_params` - the hyper parameter configuration.
    ///
    /// # Returns
    /// * The K-means model instance, or an error if the data or configuration is invalid:
    ///   an empty dataset, mismatched or zero dimensions, non-finite coordinates, fewer than
    ///   one or more clusters than data points, or an iteration budget of zero.
    ///
    /// # Examples
    /// ```
    ///use kmeans::{DistanceMetric, Initialisation, KMeans, KMeansHyperParams};
    ///
    ///let data: Vec<Vec<f32>> = vec![
    ///    vec![1.3, 1.1],
    ///    vec![1.3, 1.2],
    ///    vec![1.0, 1.1],
    ///    vec![3.7, 4.0],
    ///    vec![3.9, 3.9],
    ///];
    ///let hyper_params = KMeansHyperParams::builder()
    ///    .n_clusters(2)
    ///    .dist_metric(DistanceMetric::Manhattan)
    ///    .init(Initialisation::PlusPlus { seed: 42 })
    ///    .build();
    ///let clusterer = KMeans::new(&data, hyper_params).unwrap();
    /// ```
    pub fn new(data: &'a [Vec<T>], hyper_params: KMeansHyperParams)
        -> Result<Self, ConfigurationError> {
        DataValidator::new(data, &hyper_params).validate_input_data()?;
        let distance = hyper_params.dist_metric;
        let initial_centroids =
            hyper_params.init.init_centroids(data, hyper_params.n_clusters, &distance);
        Ok(KMeans { data, hyper_params, initial_centroids, distance })
    }

    /// Creates an instance of the K-means clustering model with `n_clusters` clusters and
    /// default values for every other hyper parameter.
    ///
    /// # Examples
    /// ```
    ///use kmeans::KMeans;
    ///
    ///let data: Vec<Vec<f64>> = vec![vec![1.0], vec![1.1], vec![5.0], vec![5.2]];
    ///let result = KMeans::default_hyper_params(&data, 2).unwrap().run();
    ///assert_eq!(result.assignment, vec![0, 0, 1, 1]);
    /// ```
    pub fn default_hyper_params(data: &'a [Vec<T>], n_clusters: usize)
        -> Result<Self, ConfigurationError> {
        KMeans::new(data, KMeansHyperParams::with_n_clusters(n_clusters))
    }

    /// Creates an instance of the K-means clustering model starting from caller supplied
    /// centroids. The configured initialisation strategy is ignored.
    ///
    /// # Parameters
    /// * `data` - a reference to the data to cluster.
    /// * `initial_centroids` - exactly `n_clusters` points with the same dimensionality as
    ///                         the data.
    /// * `hyper_params` - the hyper parameter configuration.
    ///
    /// # Returns
    /// * The K-means model instance, or an error if the data, the configuration or the
    ///   initial centroids are invalid.
    pub fn with_initial_centroids(
        data: &'a [Vec<T>],
        initial_centroids: Vec<Vec<T>>,
        hyper_params: KMeansHyperParams,
    ) -> Result<Self, ConfigurationError> {
        let validator = DataValidator::new(data, &hyper_params);
        validator.validate_input_data()?;
        validator.validate_initial_centroids(&initial_centroids)?;
        let distance = hyper_params.dist_metric;
        Ok(KMeans { data, hyper_params, initial_centroids, distance })
    }
}

impl<'a, T: Float, D: Distance<T>> KMeans<'a, T, D> {
    /// Replaces the distance function used for the assignment step. The initial centroids
    /// have already been chosen and are kept as they are.
    ///
    /// # Examples
    /// ```
    ///use kmeans::KMeans;
    ///
    ///let data: Vec<Vec<f64>> = vec![vec![0.0, 9.0], vec![0.2, -9.0], vec![5.0, 0.0]];
    ///// Only the first coordinate matters
    ///let first_coordinate = |a: &[f64], b: &[f64]| (a[0] - b[0]).abs();
    ///let clusterer = KMeans::default_hyper_params(&data, 2)
    ///    .unwrap()
    ///    .with_distance(first_coordinate);
    ///assert_eq!(clusterer.run().assignment, vec![0, 0, 1]);
    /// ```
    pub fn with_distance<E: Distance<T>>(self, distance: E) -> KMeans<'a, T, E> {
        KMeans {
            data: self.data,
            hyper_params: self.hyper_params,
            initial_centroids: self.initial_centroids,
            distance,
        }
    }

    /// The hyper parameters the clusterer was constructed with.
    pub fn hyper_params(&self) -> &KMeansHyperParams {
        &self.hyper_params
    }

    /// The centroids every call to `run` starts from.
    pub fn initial_centroids(&self) -> &[Vec<T>] {
        &self.initial_centroids
    }

    /// Performs clustering on the data passed to the constructor, starting from the initial
    /// centroids. Every call starts afresh and returns the same result.
    ///
    /// # Returns
    /// * The final assignment of points to centroids, the final centroids, the number of
    ///   iterations performed and whether the assignments converged within the iteration
    ///   budget. If they did not, the last computed centroids are returned together with
    ///   the assignment of the points to them.
    pub fn run(&self) -> KMeansResult<T> {
        let n_clusters = self.hyper_params.n_clusters;
        let max_iter = self.hyper_params.max_iter;
        let nearest = NearestCentroid::new(
            self.data, &self.distance, &self.hyper_params.nn_algo, n_clusters);

        let mut centroids = self.initial_centroids.clone();
        let mut assignment = nearest.assign(&centroids);
        let mut distortion = self.total_distortion(&assignment, &centroids);
        let mut history = Vec::new();
        let mut termination = Termination::Exhausted;
        let mut n_iter = 0;

        while n_iter < max_iter {
            n_iter += 1;
            let update = update_centroids(self.data, &assignment, &centroids);
            let n_empty = update.n_empty();
            if n_empty > 0 {
                warn!(iteration = n_iter, n_empty, "Empty clusters left at previous location");
            }
            centroids = update.centroids;

            let next_assignment = nearest.assign(&centroids);
            let n_reassigned = assignment.iter()
                .zip(&next_assignment)
                .filter(|(prev, next)| prev != next)
                .count();
            assignment = next_assignment;
            distortion = self.total_distortion(&assignment, &centroids);
            debug!(
                iteration = n_iter,
                n_reassigned,
                distortion = distortion.to_f64(),
                "Completed K-means iteration"
            );

            if self.hyper_params.record_history {
                history.push(IterationRecord {
                    iteration: n_iter,
                    centroids: centroids.clone(),
                    assignment: assignment.clone(),
                    distortion,
                });
            }
            if n_reassigned == 0 {
                termination = Termination::Converged;
                break;
            }
        }

        match termination {
            Termination::Converged => info!(n_iter, "K-means converged"),
            Termination::Exhausted => info!(n_iter, "K-means reached the iteration limit"),
        }
        KMeansResult {
            cluster_sizes: count_cluster_sizes(&assignment, n_clusters),
            assignment,
            centroids,
            n_iter,
            termination,
            distortion,
            history,
        }
    }

    /// Runs a single assignment step of the clusterer's data against `centroids`.
    ///
    /// # Parameters
    /// * `centroids` - at least one point, each with the dimensionality of the data and only
    ///                 finite values
    ///
    /// # Returns
    /// * for each data point, the index of its nearest centroid, with ties going to the
    ///   lowest index, or an error if the centroids are invalid
    pub fn assign(&self, centroids: &[Vec<T>]) -> Result<Vec<usize>, ConfigurationError> {
        validate_centroids(centroids, self.n_dims())?;
        let nearest = NearestCentroid::new(
            self.data, &self.distance, &self.hyper_params.nn_algo, centroids.len());
        Ok(nearest.assign(centroids))
    }

    /// The sum of squared distances from each data point to the centroid it is assigned to.
    ///
    /// # Parameters
    /// * `assignment` - one label per data point, each less than the number of centroids
    /// * `centroids` - at least one point, each with the dimensionality of the data and only
    ///                 finite values
    ///
    /// # Returns
    /// * the distortion, or an error if the assignment or the centroids are invalid
    pub fn distortion(&self, assignment: &[usize], centroids: &[Vec<T>])
        -> Result<T, ConfigurationError> {
        validate_centroids(centroids, self.n_dims())?;
        validate_assignment(assignment, self.data.len(), centroids.len())?;
        Ok(self.total_distortion(assignment, centroids))
    }

    fn total_distortion(&self, assignment: &[usize], centroids: &[Vec<T>]) -> T {
        self.data.iter()
            .zip(assignment)
            .map(|(datapoint, &cluster_id)| {
                let dist = self.distance.distance(datapoint, &centroids[cluster_id]);
                dist * dist
            })
            .fold(T::zero(), std::ops::Add::add)
    }

    fn n_dims(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_points() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ]
    }

    #[test]
    fn run() {
        let data = four_points();
        let hp = KMeansHyperParams::builder().n_clusters(2).max_iter(10).build();
        let clusterer = KMeans::with_initial_centroids(
            &data, vec![vec![0.0, 0.0], vec![10.0, 0.0]], hp).unwrap();
        let result = clusterer.run();
        assert!(result.converged());
        assert!(result.n_iter <= 2);
        assert_eq!(vec![0, 0, 1, 1], result.assignment);
        assert_eq!(vec![vec![0.0, 0.5], vec![10.0, 0.5]], result.centroids);
        assert_eq!(vec![2, 2], result.cluster_sizes);
        assert_eq!(1.0, result.distortion);
    }

    #[test]
    fn exhausted_after_max_iter() {
        // Needs more than one update to settle
        let data = vec![vec![0.0], vec![2.0], vec![3.0], vec![10.0]];
        let hp = KMeansHyperParams::builder().n_clusters(2).max_iter(1).build();
        let clusterer = KMeans::with_initial_centroids(
            &data, vec![vec![0.0], vec![2.5]], hp).unwrap();
        let result = clusterer.run();
        assert_eq!(Termination::Exhausted, result.termination);
        assert!(!result.converged());
        assert_eq!(1, result.n_iter);
        assert_eq!(vec![vec![0.0], vec![5.0]], result.centroids);
        assert_eq!(vec![0, 0, 1, 1], result.assignment);
    }

    #[test]
    fn runs_are_not_stateful() {
        let data = four_points();
        let clusterer = KMeans::default_hyper_params(&data, 2).unwrap();
        assert_eq!(clusterer.run(), clusterer.run());
        assert_eq!(&data[..2], clusterer.initial_centroids());
    }

    #[test]
    fn history_is_recorded() {
        let data = vec![vec![0.0], vec![2.0], vec![3.0], vec![10.0]];
        let hp = KMeansHyperParams::builder()
            .n_clusters(2)
            .record_history(true)
            .build();
        let clusterer = KMeans::with_initial_centroids(
            &data, vec![vec![0.0], vec![2.5]], hp).unwrap();
        let result = clusterer.run();
        assert_eq!(result.n_iter, result.history.len());
        let last = result.history.last().unwrap();
        assert_eq!(result.centroids, last.centroids);
        assert_eq!(result.assignment, last.assignment);
        assert_eq!(result.distortion, last.distortion);
    }

    #[test]
    fn k_greater_than_m() {
        let data = four_points();
        let result = KMeans::default_hyper_params(&data, 5);
        assert!(matches!(result, Err(ConfigurationError::InvalidClusterCount(..))));
    }

    #[test]
    fn k_of_zero() {
        let data = four_points();
        let result = KMeans::default_hyper_params(&data, 0);
        assert!(matches!(result, Err(ConfigurationError::InvalidClusterCount(..))));
    }

    #[test]
    fn empty_data() {
        let data: Vec<Vec<f32>> = Vec::new();
        let result = KMeans::default_hyper_params(&data, 1);
        assert!(matches!(result, Err(ConfigurationError::EmptyDataset)));
    }

    #[test]
    fn mismatched_centroid_dimensions() {
        let data = four_points();
        let hp = KMeansHyperParams::builder().n_clusters(2).build();
        let result = KMeans::with_initial_centroids(
            &data, vec![vec![0.0, 0.0], vec![10.0]], hp);
        assert!(matches!(result, Err(ConfigurationError::WrongDimension(..))));
    }

    #[test]
    fn assign_checks_centroids() {
        let data = four_points();
        for nn_algo in [NnAlgorithm::BruteForce, NnAlgorithm::KdTree] {
            let hp = KMeansHyperParams::builder().n_clusters(2).nn_algorithm(nn_algo).build();
            let clusterer = KMeans::new(&data, hp).unwrap();
            assert!(matches!(
                clusterer.assign(&[]),
                Err(ConfigurationError::InvalidClusterCount(..))
            ));
            assert!(matches!(
                clusterer.assign(&[vec![0.0], vec![10.0]]),
                Err(ConfigurationError::WrongDimension(..))
            ));
            assert!(matches!(
                clusterer.assign(&[vec![0.0, 0.0, 0.0]]),
                Err(ConfigurationError::WrongDimension(..))
            ));
            assert_eq!(
                Ok(vec![0, 0, 1, 1]),
                clusterer.assign(&[vec![0.0, 0.0], vec![10.0, 0.0]])
            );
        }
    }

    #[test]
    fn distortion_checks_labels() {
        let data = four_points();
        let clusterer = KMeans::default_hyper_params(&data, 2).unwrap();
        let centroids = vec![vec![0.0, 0.5], vec![10.0, 0.5]];
        assert_eq!(Ok(1.0), clusterer.distortion(&[0, 0, 1, 1], &centroids));
        assert!(matches!(
            clusterer.distortion(&[0, 0, 1, 2], &centroids),
            Err(ConfigurationError::InvalidAssignment(..))
        ));
        assert!(matches!(
            clusterer.distortion(&[0, 0, 1], &centroids),
            Err(ConfigurationError::InvalidAssignment(..))
        ));
        assert!(matches!(
            clusterer.distortion(&[0, 0, 0, 0], &[vec![0.0]]),
            Err(ConfigurationError::WrongDimension(..))
        ));
    }

    #[test]
    fn far_apart_points_are_separated() {
        let data = vec![vec![0.0], vec![1e200], vec![2e200]];
        let clusterer = KMeans::default_hyper_params(&data, 2).unwrap();
        let result = clusterer.run();
        assert!(result.converged());
        assert_eq!(vec![0, 1, 1], result.assignment);
        assert_eq!(vec![0.0], result.centroids[0]);
        assert!((result.centroids[1][0] / 1.5e200 - 1.0).abs() < 1e-12);
    }
}
