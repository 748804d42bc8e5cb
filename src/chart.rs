pub mod geometry;
pub mod wheel;
