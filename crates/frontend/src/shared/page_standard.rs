//! Page category constants for tab pages.
//!
//! Every page rendered inside a tab declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"p100_ambit_wip--list"`)
//!   - `data-page-category` with one of the constants below

/// Query / list page with a filter panel.
pub const PAGE_CAT_LIST: &str = "list";

/// System administration page.
pub const PAGE_CAT_SYSTEM: &str = "system";

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids() {
        assert!(is_valid_page_id("p100_ambit_wip--list"));
        assert!(is_valid_page_id("sys_users--list"));
        assert!(!is_valid_page_id("sys_users"));
        assert!(!is_valid_page_id("--list"));
    }
}
