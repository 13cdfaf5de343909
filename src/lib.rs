//! Harmonic mixing and set flow engine for DJ set planning.
//!
//! - `mixing::harmonic`: Camelot wheel key relationships
//! - `mixing::bpm`: tempo transition classification
//! - `mixing::scoring`: next-track compatibility ranking
//! - `mixing::curve`: energy curve of an ordered set
//! - `mixing::ordering`: greedy set reordering
//!
//! Everything under `mixing` is pure and works on borrowed `Track` slices.

pub mod config;
pub mod error;
pub mod mixing;
pub mod models;
pub mod source;

pub use error::KeyParseError;
pub use models::Track;
