//! Column model of the configurable data grid.
//!
//! `GridLayout` turns an unordered list of `GridColumn`s into the header,
//! body and footer cell plan the frontend renders. Everything here is pure
//! so it is shared by the WASM build and native tests.

pub mod column;
pub mod layout;

pub use column::{ColumnDef, GridColumn, GridRow, SummaryFn, WipSummary, WipTarget};
pub use layout::{BodyCell, FooterCell, GridLayout, HeaderCell, LayoutMeasure, SUBTOTAL_LABEL};
