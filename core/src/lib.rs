pub mod geometry;
pub mod topo;
pub mod units;
pub mod annotation;
