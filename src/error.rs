use std::path::PathBuf;

/// Everything that can go wrong while building, filling, merging or storing
/// a histogram.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Binning(#[from] binning::Error),

    #[error("expected {expected} values (one per dimension), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("a histogram needs at least one dimension")]
    NoDimensions,

    #[error("total number of bins overflows usize: shape {0:?}")]
    TooManyBins(Vec<usize>),

    #[error("incompatible binning: {0}")]
    IncompatibleBinning(String),

    #[error("{what} has {got} elements, expected {expected}")]
    ShapeMismatch { what: String, expected: usize, got: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("HDF5 group `{0}` already exists")]
    GroupExists(String),

    #[error("text cannot be stored as an HDF5 string: {0:?}")]
    InvalidText(String),

    #[error(transparent)]
    Hdf5(#[from] ::hdf5::Error),

    #[error("`{path}` holds {values} values, which is not a whole number of events")]
    TruncatedEvent { path: PathBuf, values: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
