// Normalizer module: capacity labels/ranks and device line classification.

pub mod capacity;
pub mod device;

pub use capacity::{capacity_rank, format_capacity, is_valid_capacity, UNKNOWN_CAPACITY_RANK};
pub use device::DeviceLine;
