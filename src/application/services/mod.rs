//! Application services

pub mod transform;

pub use transform::{BatchLine, TransformService, TreeStats};
