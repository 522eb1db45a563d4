use thiserror::Error;

use skim_core::CoreError;
use skim_matrix::MatrixError;
use skim_network::NetworkError;
use skim_transit::TransitError;

#[derive(Debug, Error)]
pub enum SkimError {
    #[error("skim configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("road search from zone {zone} failed: {source}")]
    Network {
        zone:   String,
        #[source]
        source: NetworkError,
    },

    #[error("transit error: {0}")]
    Transit(#[from] TransitError),

    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SkimResult<T> = Result<T, SkimError>;
