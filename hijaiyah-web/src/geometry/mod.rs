//! Geometry module - points, sizes and the landmark-to-view mapping
//!
//! Re-exports only. All logic in submodules.

mod mapper;
mod point;

pub use mapper::{map_normalized_to_view, map_view_to_normalized, CoordinateMapper};
pub use point::{
    angle_degrees, clamp_to_view, distance, is_point_in_view, Point2D, Rect, Rotation, Size2D,
};
