pub mod highlight;
pub mod layer;
pub mod pipeline;
pub mod region2d;
pub mod symbology;

pub use layer::*;
