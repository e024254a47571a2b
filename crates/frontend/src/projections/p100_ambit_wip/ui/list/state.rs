use contracts::projections::p100_ambit_wip::{WipFilters, WipMatrix};
use leptos::prelude::*;

const STORAGE_KEY: &str = "p100_ambit_wip_filters_v1";

#[derive(Clone, Debug)]
pub struct AmbitWipState {
    pub filters: WipFilters,
    pub matrix: WipMatrix,
    /// Set once a query chain finished, even with no data
    pub is_loaded: bool,
}

impl Default for AmbitWipState {
    fn default() -> Self {
        Self {
            filters: load_persisted().unwrap_or_default(),
            matrix: WipMatrix::empty(),
            is_loaded: false,
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn load_persisted() -> Option<WipFilters> {
    let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    serde_json::from_str::<WipFilters>(&raw).ok()
}

/// Remembers the last submitted filters for the next visit.
pub fn persist_filters(filters: &WipFilters) {
    let Some(storage) = storage() else { return };
    let Ok(raw) = serde_json::to_string(filters) else {
        return;
    };
    if let Err(e) = storage.set_item(STORAGE_KEY, &raw) {
        log::warn!("failed to persist WIP filters: {:?}", e);
    }
}

pub fn create_state() -> RwSignal<AmbitWipState> {
    RwSignal::new(AmbitWipState::default())
}
