//! Query-string state shared by the shell (`active`) and the pages
//! (`pageNumber`, `pageSize`, `username`, ...).
//!
//! Writers merge their keys into the current search string with
//! `history.replaceState`, so neither side drops the other's parameters.

use std::collections::BTreeMap;
use web_sys::window;

pub type Params = BTreeMap<String, String>;

pub fn parse_search(search: &str) -> Params {
    serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default()
}

/// `current` with `updates` applied; an empty value removes the key.
pub fn merged_search(current: &str, updates: &[(&str, String)]) -> String {
    let mut params = parse_search(current);
    for (key, value) in updates {
        if value.is_empty() {
            params.remove(*key);
        } else {
            params.insert(key.to_string(), value.clone());
        }
    }
    if params.is_empty() {
        return String::new();
    }
    format!("?{}", serde_qs::to_string(&params).unwrap_or_default())
}

pub fn current_search() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

pub fn read_params() -> Params {
    parse_search(&current_search())
}

pub fn write_params(updates: &[(&str, String)]) {
    let current = current_search();
    let new_search = merged_search(&current, updates);
    if new_search == current {
        return;
    }
    let Some(w) = window() else { return };
    let path = w.location().pathname().unwrap_or_default();
    if let Ok(history) = w.history() {
        if let Err(e) = history.replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&format!("{}{}", path, new_search)),
        ) {
            log::warn!("history.replaceState failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_foreign_keys() {
        let merged = merged_search(
            "?active=sys_users&pageSize=30",
            &[("pageNumber", "2".to_string()), ("pageSize", "50".to_string())],
        );
        let params = parse_search(&merged);
        assert_eq!(params.get("active").map(String::as_str), Some("sys_users"));
        assert_eq!(params.get("pageNumber").map(String::as_str), Some("2"));
        assert_eq!(params.get("pageSize").map(String::as_str), Some("50"));
    }

    #[test]
    fn test_empty_value_removes_key() {
        let merged = merged_search("?username=a01&active=x", &[("username", String::new())]);
        assert_eq!(merged, "?active=x");
        assert_eq!(merged_search("?username=a01", &[("username", String::new())]), "");
    }
}
