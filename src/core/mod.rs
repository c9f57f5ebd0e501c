//! Core pipeline logic: metadata resolution, footprint construction, and
//! product assembly.
pub mod assemble;
pub mod footprint;
pub mod resolve;
