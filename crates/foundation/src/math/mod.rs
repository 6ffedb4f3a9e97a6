pub mod containment;
pub mod mercator;
pub mod precision;
pub mod spherical;
pub mod vec;

pub use containment::*;
pub use mercator::*;
pub use precision::*;
pub use spherical::*;
pub use vec::*;
