//! Level-of-detail bucketing: an N×N grid of cells over the network extent,
//! each with a distance range and the content filed into it.

mod bucket_grid;

pub use bucket_grid::{BucketCell, BucketGrid, LodRange};
