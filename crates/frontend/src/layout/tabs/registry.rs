//! Tab content registry: the single place mapping tab.key → View.

use super::tab_labels::{KEY_AMBIT_WIP, KEY_USERS};
use crate::projections::p100_ambit_wip::ui::list::AmbitWipList;
use crate::system::users::ui::list::UsersListPage;
use leptos::prelude::*;

pub fn render_tab_content(key: &str) -> AnyView {
    match key {
        KEY_AMBIT_WIP => view! { <AmbitWipList /> }.into_any(),
        KEY_USERS => view! { <UsersListPage /> }.into_any(),
        _ => {
            log::warn!("Unknown tab type: {}", key);
            view! { <div class="placeholder">"Not implemented yet"</div> }.into_any()
        }
    }
}
