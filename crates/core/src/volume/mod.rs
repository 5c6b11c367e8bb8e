//! Volume data structures and operations

mod affine;
mod element;
mod grid;
mod neighborhood;
mod orientation;

pub use affine::Affine;
pub use element::VoxelElement;
pub use grid::{Shape, Volume};
pub use neighborhood::{step, Neighborhood, Offset, FACE_OFFSETS};
pub use orientation::Orientation;

/// Integer region labels; 0 is background, labels >= 1 identify regions
pub type LabelVolume = Volume<i32>;

/// Binary foreground mask
pub type Mask = Volume<bool>;
