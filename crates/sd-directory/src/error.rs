use sd_core::CoreError;
use sd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("street directory is already initialized")]
    AlreadyInitialized,

    #[error("signal table is sealed; no further signals can be registered")]
    SignalTableSealed,

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
