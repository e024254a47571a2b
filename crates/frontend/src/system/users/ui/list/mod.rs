mod state;

use contracts::system::users::{ImportKind, UserRecord};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;
use wasm_bindgen::JsCast;

use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::notifications::use_notifications;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::users::api;
use crate::system::users::ui::details::UserFormModal;
use state::{create_state, query_to_url};

const TABLE_ID: &str = "sys-users-table";
const EMPTY_TEXT: &str = "No users found. Try changing your filter or add a new user.";
const PASSWORD_MASK: &str = "••••••••";

/// Which form is open: a new record or an existing one.
#[derive(Clone, Debug)]
enum Editing {
    New,
    Existing(UserRecord),
}

#[component]
fn MaskedCell(value: Option<String>, visible: Signal<bool>) -> impl IntoView {
    let value = value.unwrap_or_default();
    view! {
        <td class="table__cell table__cell--mono">
            {move || {
                if value.is_empty() {
                    String::new()
                } else if visible.get() {
                    value.clone()
                } else {
                    PASSWORD_MASK.to_string()
                }
            }}
        </td>
    }
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    let state = create_state();
    let notifications = use_notifications();
    let (loading, set_loading) = signal(false);
    let editing: RwSignal<Option<Editing>> = RwSignal::new(None);
    let revealed: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());
    let search = RwSignal::new(state.with_untracked(|s| s.query.username.clone()));

    let load_data = move || {
        let query = state.with_untracked(|s| s.query.clone());
        query_to_url(&query);
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_users(&query).await {
                Ok(page) => state.update(|s| {
                    s.total_count = page.total_count as usize;
                    s.items = page.items;
                    s.is_loaded = true;
                }),
                Err(e) => notifications.error(e),
            }
            set_loading.set(false);
        });
    };

    load_data();

    let apply_search = move || {
        state.update(|s| {
            s.query.username = search.get_untracked().trim().to_string();
            s.query.page_number = 0;
        });
        load_data();
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.query.page_number = page as u64);
        load_data();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.query.page_size = size as u64;
            s.query.page_number = 0;
        });
        load_data();
    };

    let delete_user = move |emp_no: String| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Delete user {}?", emp_no))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&emp_no).await {
                Ok(()) => {
                    notifications.success(format!("User {} deleted", emp_no));
                    load_data();
                }
                Err(e) => notifications.error(e),
            }
        });
    };

    let import = move |kind: ImportKind, ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Clear the input so the same file can be picked again.
        input.set_value("");
        spawn_local(async move {
            match api::import_file(kind, file).await {
                Ok(result) => {
                    if result.errors.is_empty() {
                        notifications.success(format!("{}: {}", kind.title(), result.summary()));
                    } else {
                        notifications.warning(format!(
                            "{}: {}. {}",
                            kind.title(),
                            result.summary(),
                            result.errors.join("; ")
                        ));
                    }
                    load_data();
                }
                Err(e) => notifications.error(e),
            }
        });
    };

    let import_button = move |kind: ImportKind| {
        let input_id = format!("sys-users-import-{}", kind.path_segment());
        let input_id_for_click = input_id.clone();
        view! {
            <input
                type="file"
                accept=".csv,text/csv"
                style="display: none;"
                id=input_id
                on:change=move |ev| import(kind, ev)
            />
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| {
                    if let Some(el) = web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id(&input_id_for_click))
                        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
                    {
                        el.click();
                    }
                }
            >
                {icon("upload")}
                {format!(" {}", kind.title())}
            </Button>
        }
    };

    let toggle_reveal = move |emp_no: String| {
        revealed.update(|set| {
            if !set.remove(&emp_no) {
                set.insert(emp_no);
            }
        });
    };

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Users"</h1>
                    <Badge>{move || state.with(|s| s.total_count).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| editing.set(Some(Editing::New))
                    >
                        {icon("plus")}
                        " Add User"
                    </Button>
                    {import_button(ImportKind::User)}
                    {import_button(ImportKind::Owner)}
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Search"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.with(|s| s.query.page_number as usize))
                                total_pages=Signal::derive(move || state.with(|s| s.total_pages()))
                                total_count=Signal::derive(move || state.with(|s| s.total_count))
                                page_size=Signal::derive(move || state.with(|s| s.page_size()))
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search placeholder="Emp No or name..." />
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_search()
                                disabled=Signal::derive(move || loading.get())
                            >
                                {icon("search")}
                                " Search"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| {
                                    search.set(String::new());
                                    apply_search();
                                }
                            >
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <Show
                    when=move || state.with(|s| !s.is_loaded || !s.items.is_empty())
                    fallback=|| view! { <div class="table__empty">{EMPTY_TEXT}</div> }
                >
                    <div class="table-wrapper">
                        <table id=TABLE_ID class="table__data" style="width: 100%;">
                            <thead>
                                <tr>
                                    <th class="table__header-cell">"Emp No"</th>
                                    <th class="table__header-cell">"Emp Name"</th>
                                    <th class="table__header-cell">"Rank"</th>
                                    <th class="table__header-cell">"Class"</th>
                                    <th class="table__header-cell">"Dept"</th>
                                    <th class="table__header-cell">"Station"</th>
                                    <th class="table__header-cell">"Emp Pass"</th>
                                    <th class="table__header-cell">"Emp BC"</th>
                                    <th class="table__header-cell">"Owner"</th>
                                    <th class="table__header-cell">"Quit Date"</th>
                                    <th class="table__header-cell">"Roles"</th>
                                    <th class="table__header-cell"></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || state.with(|s| s.items.clone())
                                    key=|u| u.emp_no.clone()
                                    children=move |user: UserRecord| {
                                        let emp_no = user.emp_no.clone();
                                        let emp_no_for_check = emp_no.clone();
                                        let emp_no_for_reveal = emp_no.clone();
                                        let emp_no_for_delete = emp_no.clone();
                                        let visible = Signal::derive(move || {
                                            revealed.with(|set| set.contains(&emp_no_for_check))
                                        });
                                        let user_for_edit = user.clone();
                                        view! {
                                            <tr class="table__row">
                                                <td class="table__cell"><b>{emp_no}</b></td>
                                                <td class="table__cell">{user.emp_name.clone()}</td>
                                                <td class="table__cell">{user.emp_rank.clone().unwrap_or_default()}</td>
                                                <td class="table__cell">{user.class_name.clone().unwrap_or_default()}</td>
                                                <td class="table__cell">{user.dept_name.clone().unwrap_or_default()}</td>
                                                <td class="table__cell">{user.station_name.clone().unwrap_or_default()}</td>
                                                <MaskedCell value=user.emp_pass.clone() visible=visible />
                                                <MaskedCell value=user.emp_bc.clone() visible=visible />
                                                <td class="table__cell">{user.owner.clone().unwrap_or_default()}</td>
                                                <td class="table__cell">{user.quit_date.clone().unwrap_or_default()}</td>
                                                <td class="table__cell">{user.roles.join(", ")}</td>
                                                <td class="table__cell table__cell--actions">
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| toggle_reveal(emp_no_for_reveal.clone())
                                                        attr:title="Show / hide passwords"
                                                    >
                                                        {move || if visible.get() { icon("eye-off") } else { icon("eye") }}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing.set(Some(Editing::Existing(user_for_edit.clone())))
                                                        attr:title="Edit"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| delete_user(emp_no_for_delete.clone())
                                                        attr:title="Delete"
                                                    >
                                                        {icon("trash")}
                                                    </Button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </Show>

                {move || editing.get().map(|mode| {
                    let user = match mode {
                        Editing::New => None,
                        Editing::Existing(user) => Some(user),
                    };
                    view! {
                        <UserFormModal
                            user=user
                            on_close=Callback::new(move |_| editing.set(None))
                            on_saved=Callback::new(move |_| {
                                editing.set(None);
                                load_data();
                            })
                        />
                    }
                })}
            </div>
        </PageFrame>
    }
}
