//! Binary mathematical morphology on 3-D masks
//!
//! - **Erosion**: minimum filter (shrinks objects)
//! - **Dilation**: maximum filter (grows objects)
//! - **Opening**: erosion then dilation (removes small objects)
//! - **Closing**: dilation then erosion (fills small holes)
//!
//! Masks come from [`threshold_mask`] or from a label volume's
//! `foreground()`.

mod closing;
mod dilate;
mod element;
mod erode;
mod mask;
mod opening;
mod operation;

pub use closing::{closing, Closing, ClosingParams};
pub use dilate::{dilate, Dilate, DilateParams};
pub use element::StructuringElement;
pub use erode::{erode, Erode, ErodeParams};
pub use mask::threshold_mask;
pub use opening::{opening, Opening, OpeningParams};
pub use operation::MorphologyOp;
