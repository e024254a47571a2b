//! Work-in-progress matrix per manufacturing order (and optionally per line).

pub mod dto;
pub mod matrix;

pub use dto::*;
pub use matrix::{build_wip_matrix, distinct_mos};
