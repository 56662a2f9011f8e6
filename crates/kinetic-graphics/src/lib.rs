//! Geometric primitives: Point, Size, Transform

mod geometry;

pub use geometry::{Point, Size, Transform};
