//! Time grids for piecewise integration against ISDA curves.
//!
//! - [`integration_points`]: Sorted, deduplicated knots of both curves between two times
//! - [`truncate_set_inclusive`]: Clip a grid to a sub-interval, keeping both bounds

mod integration;

pub use integration::{
    integration_points, integration_points_from_sets, truncate_set_exclusive,
    truncate_set_inclusive, POINT_TOLERANCE,
};
