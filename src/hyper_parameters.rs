use crate::distance::DistanceMetric;
use crate::initialisation::Initialisation;
use crate::nearest_centroid::NnAlgorithm;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Defaults for parameters
const N_CLUSTERS_DEFAULT: usize = 8;
const MAX_ITER_DEFAULT: usize = 300;
const DISTANCE_METRIC_DEFAULT: DistanceMetric = DistanceMetric::Euclidean;
const INITIALISATION_DEFAULT: Initialisation = Initialisation::FirstK;
const NN_ALGORITHM_DEFAULT: NnAlgorithm = NnAlgorithm::Auto;
const RECORD_HISTORY_DEFAULT: bool = false;

/// A wrapper around the various hyper parameters used in K-means clustering.
/// Use `KMeans::default_hyper_params()` if the only thing you want to choose is the
/// number of clusters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeansHyperParams {
    pub(crate) n_clusters: usize,
    pub(crate) max_iter: usize,
    pub(crate) dist_metric: DistanceMetric,
    pub(crate) init: Initialisation,
    pub(crate) nn_algo: NnAlgorithm,
    pub(crate) record_history: bool,
}

/// Builder object to set custom hyper parameters.
#[derive(Debug, Clone, Default)]
pub struct HyperParamBuilder {
    n_clusters: Option<usize>,
    max_iter: Option<usize>,
    dist_metric: Option<DistanceMetric>,
    init: Option<Initialisation>,
    nn_algo: Option<NnAlgorithm>,
    record_history: Option<bool>,
}

impl KMeansHyperParams {
    pub(crate) fn with_n_clusters(n_clusters: usize) -> Self {
        Self::builder().n_clusters(n_clusters).build()
    }

    /// Enters the builder pattern, allowing custom hyper parameters to be set using
    /// various setter methods.
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn builder() -> HyperParamBuilder {
        HyperParamBuilder::default()
    }

    /// The number of clusters, K.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// The iteration budget, N.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn dist_metric(&self) -> DistanceMetric {
        self.dist_metric
    }

    pub fn init(&self) -> &Initialisation {
        &self.init
    }

    pub fn nn_algorithm(&self) -> &NnAlgorithm {
        &self.nn_algo
    }

    pub fn record_history(&self) -> bool {
        self.record_history
    }

    pub(crate) fn reseeded(&self, seed: u64) -> Self {
        Self {
            init: self.init.reseeded(seed),
            ..self.clone()
        }
    }
}

impl HyperParamBuilder {
    /// Sets the number of clusters, K. Must be at least 1 and no more than the number of
    /// data points. Defaults to 8.
    ///
    /// # Parameters
    /// * n_clusters - the number of clusters
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn n_clusters(mut self, n_clusters: usize) -> HyperParamBuilder {
        self.n_clusters = Some(n_clusters);
        self
    }

    /// Sets the maximum number of iterations. Each iteration is one centroid update
    /// followed by the assignment step that checks for convergence. If clustering has not
    /// converged after this many iterations, the last computed result is returned and
    /// flagged as exhausted. Must be at least 1. Defaults to 300.
    ///
    /// # Parameters
    /// * max_iter - the iteration budget
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn max_iter(mut self, max_iter: usize) -> HyperParamBuilder {
        self.max_iter = Some(max_iter);
        self
    }

    /// Sets the distance metric used to find each point's nearest centroid. Defaults to
    /// Euclidean. To use a metric that isn't one of the `DistanceMetric` options, pass a
    /// closure to `KMeans::with_distance` instead.
    ///
    /// # Parameters
    /// * dist_metric - the distance metric
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn dist_metric(mut self, dist_metric: DistanceMetric) -> HyperParamBuilder {
        self.dist_metric = Some(dist_metric);
        self
    }

    /// Sets how the initial centroids are chosen. Randomised strategies take an explicit
    /// seed so that runs are reproducible. Defaults to the first K data points.
    ///
    /// # Parameters
    /// * init - the initialisation strategy
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn init(mut self, init: Initialisation) -> HyperParamBuilder {
        self.init = Some(init);
        self
    }

    /// Sets the algorithm used to find the nearest centroid to each point.
    /// The primary reason for changing this parameter is performance. A brute force scan
    /// is fastest for a handful of clusters, a k-d tree over the centroids pays off once
    /// there are many. Defaults to Auto, which picks based on the number of clusters and
    /// whether the distance metric can be used with a k-d tree.
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn nn_algorithm(mut self, nn_algorithm: NnAlgorithm) -> HyperParamBuilder {
        self.nn_algo = Some(nn_algorithm);
        self
    }

    /// Sets whether to keep the assignment, centroids and distortion of every iteration
    /// in the clustering result. Defaults to false.
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn record_history(mut self, record_history: bool) -> HyperParamBuilder {
        self.record_history = Some(record_history);
        self
    }

    /// Finishes the building of the hyper parameter configuration. A call to this method is
    /// required to exit the builder pattern and complete the construction of the hyper
    /// parameters. Values are validated against the data when the clusterer is constructed.
    ///
    /// # Returns
    /// * The completed K-means hyper parameter configuration.
    pub fn build(self) -> KMeansHyperParams {
        KMeansHyperParams {
            n_clusters: self.n_clusters.unwrap_or(N_CLUSTERS_DEFAULT),
            max_iter: self.max_iter.unwrap_or(MAX_ITER_DEFAULT),
            dist_metric: self.dist_metric.unwrap_or(DISTANCE_METRIC_DEFAULT),
            init: self.init.unwrap_or(INITIALISATION_DEFAULT),
            nn_algo: self.nn_algo.unwrap_or(NN_ALGORITHM_DEFAULT),
            record_history: self.record_history.unwrap_or(RECORD_HISTORY_DEFAULT),
        }
    }
}
