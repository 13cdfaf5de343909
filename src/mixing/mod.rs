pub mod bpm;
pub mod curve;
pub mod harmonic;
pub mod ordering;
pub mod scoring;


pub use bpm::*;
pub use curve::*;
pub use harmonic::*;
pub use ordering::*;
pub use scoring::*;
