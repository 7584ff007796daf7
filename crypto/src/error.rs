use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("hash is not valid hexadecimal")]
    InvalidHex,

    #[error("hash must be {expected} bytes, found {found} bytes")]
    InvalidLength { expected: usize, found: usize },
}
