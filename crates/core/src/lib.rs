//! # medvis Core
//!
//! Core types and traits for the medvis analysis library.
//!
//! This crate provides:
//! - `Volume<T>`: Generic 3-D voxel grid (scalar fields, label volumes, masks)
//! - `Affine`: Opaque voxel-to-world metadata forwarded with a volume
//! - `Signal` / `Recording`: Sampled physiological channels
//! - Algorithm traits for consistent API

pub mod error;
pub mod signal;
pub mod volume;

pub use error::{Error, Result};
pub use signal::{Recording, Signal};
pub use volume::{Affine, LabelVolume, Mask, Orientation, Shape, Volume, VoxelElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::signal::{Recording, Signal};
    pub use crate::volume::{Affine, LabelVolume, Mask, Orientation, Volume, VoxelElement};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in medvis.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
