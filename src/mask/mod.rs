//! Alpha mask input and preprocessing.
//!
//! - **Alpha**: the caller's opacity grid and its constructors
//! - **Downsample**: block coarsening into a boolean grid
//! - **Regions**: 4-connected labeling of opaque cells

pub mod alpha;
pub mod downsample;
pub mod regions;

pub use alpha::AlphaMask;
pub use downsample::{downsample, BinaryGrid, DownsamplePolicy};
pub use regions::{label_regions, Region, RegionMap};
