//! Tab management
//!
//! - `page`: TabPage wrapper that shows or hides a tab's content
//! - `registry`: tab.key → View mapping
//! - `tab_labels`: titles of the tabs and sidebar entries

pub mod page;
pub mod registry;
pub mod tab_labels;

pub use page::TabPage;
pub use tab_labels::tab_label_for_key;
