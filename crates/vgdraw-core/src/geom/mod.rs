//! 2D geometry kernel.
//!
//! Pure, stateless functions over `kurbo` points, vectors and boxes. All
//! tolerance-aware predicates take an explicit [`Tolerance`]; nothing here
//! reads global state.

mod area;
mod clip;
mod lnrel;
mod tol;
mod vector;

pub use area::{AreaPosition, Convexity, Orientation, convexity, is_convex, pt_in_area};
pub use clip::clip_line;
pub use lnrel::{
    LineCross, cross_line_abc, cross_line_beeline, cross2_beeline, cross2_line, is_between_line,
    is_between_line2, is_between_line3, is_colinear, is_colinear2, is_intersect, is_intersect_prop,
    is_left, is_left_on, is_left_on2, is_left2, is_project_between_line, pt_to_beeline,
    pt_to_beeline2, pt_to_line,
};
pub use tol::{Tolerance, ZERO_EPSILON, approx_eq, is_zero};
pub use vector::{
    VectorExt, box_around, box_contains, box_is_empty, boxes_overlap, extent_of, lerp,
    points_equal,
};
