use thiserror::Error;

/// Possible errors that arise from invalid K-means configuration or input data.
/// Construction detects all of them for the clustered data, so a successfully
/// constructed clusterer cannot fail while running. `assign`, `distortion` and `predict`
/// check the centroids, labels and points they are given in the same terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("The dataset provided is empty")]
    EmptyDataset,
    #[error("Input vectors have zero dimensions")]
    ZeroDimensions,
    #[error("Input vectors have mismatched dimensions: {0}")]
    WrongDimension(String),
    #[error("Non finite coordinate: {0}")]
    NonFiniteCoordinate(String),
    #[error("Invalid number of clusters: {0}")]
    InvalidClusterCount(String),
    #[error("The maximum number of iterations must be at least 1")]
    InvalidMaxIterations,
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),
    #[error("At least one seed is required to run restarts")]
    NoRestartSeeds,
}
