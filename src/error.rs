use thiserror::Error;

/// Errors that can occur while building or querying a Fourier approximation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FourierError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("degenerate path: total length is zero")]
    DegeneratePath,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("png encode error: {0}")]
    PngEncode(#[from] png::EncodingError),
}
