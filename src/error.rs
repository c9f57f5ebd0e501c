//! Crate-level error type and `Result` alias.
//! Each pipeline stage keeps its own error enum; this type unifies them
//! for the public API and the CLI. Every variant is fatal for the run:
//! a partially assembled archival product is worse than none.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sidecar error: {0}")]
    Sidecar(#[from] crate::io::SidecarError),

    #[error("raster decode error: {0}")]
    Decode(#[from] crate::io::DecodeError),

    #[error("grid error: {0}")]
    Grid(#[from] crate::io::GridError),

    #[error("footprint error: {0}")]
    Footprint(#[from] crate::core::footprint::FootprintError),

    #[error("metadata resolution error: {0}")]
    Resolve(#[from] crate::core::resolve::ResolveError),

    #[error("assembly error: {0}")]
    Assemble(#[from] crate::core::assemble::AssembleError),

    #[error("container write error: {0}")]
    Container(#[from] crate::io::writers::ContainerError),
}
