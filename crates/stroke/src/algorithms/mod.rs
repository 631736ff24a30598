//! The individual stages of the stroke pipeline. Each one works on the
//! shared [`Mask`](crate::mask::Mask) and borrows its scratch space from the
//! caller, so none of them allocate.

pub mod preprocessing;
pub mod spur;
pub mod fill;
pub mod trace;
pub mod simplification;
pub mod overlay;

pub use preprocessing::*;
pub use spur::*;
pub use fill::*;
pub use trace::*;
pub use simplification::*;
pub use overlay::*;
