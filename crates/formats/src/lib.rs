pub mod atlas_ingest;
pub mod geojson;
pub mod manifest;

pub use atlas_ingest::*;
pub use geojson::*;
pub use manifest::*;
