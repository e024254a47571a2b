mod state;

use contracts::projections::p100_ambit_wip::{
    MoStatus, WipDetailRequest, WipFilters, WipMatrix, ALL,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::projections::p100_ambit_wip::api;
use crate::projections::p100_ambit_wip::query::{run_wip_query, QueryOutcome};
use crate::projections::p100_ambit_wip::ui::detail::WipDetailModal;
use crate::shared::components::wip_grid::DataGrid;
use crate::shared::icons::icon;
use crate::shared::notifications::use_notifications;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use state::{create_state, persist_filters};

const TABLE_ID: &str = "p100-ambit-wip-table";

/// Loads one distinct-value list into `target`, reporting failures.
fn load_lookup<F>(target: RwSignal<Vec<String>>, fetch: F)
where
    F: std::future::Future<Output = Result<Vec<String>, String>> + 'static,
{
    let notifications = use_notifications();
    spawn_local(async move {
        match fetch.await {
            Ok(values) => target.set(values),
            Err(e) => notifications.error(e),
        }
    });
}

#[component]
fn LookupSelect(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(into)] options: Signal<Vec<String>>,
) -> impl IntoView {
    view! {
        <div class="filter-panel__field">
            <Label>{label}</Label>
            <Select value=value>
                <option value=ALL>{ALL}</option>
                {move || options.get().into_iter().map(|v| {
                    view! { <option value=v.clone()>{v.clone()}</option> }
                }).collect_view()}
            </Select>
        </div>
    }
}

#[component]
pub fn AmbitWipList() -> impl IntoView {
    let state = create_state();
    let notifications = use_notifications();
    let (loading, set_loading) = signal(false);
    let detail_request: RwSignal<Option<WipDetailRequest>> = RwSignal::new(None);

    let initial = state.with_untracked(|s| s.filters.clone());
    let mo_type = RwSignal::new(initial.mo_type.clone());
    let model_name = RwSignal::new(initial.model_name.clone());
    let mo_number = RwSignal::new(initial.mo_number.clone());
    let section_name = RwSignal::new(initial.section_name.clone());
    let lines = RwSignal::new(initial.lines.clone());
    let status = RwSignal::new(initial.status.code().to_string());
    let is_show_line = RwSignal::new(initial.is_show_line);
    let is_show_transfer_qty = RwSignal::new(initial.is_show_transfer_qty);

    let mo_types = RwSignal::new(Vec::<String>::new());
    let model_names = RwSignal::new(Vec::<String>::new());
    let mo_numbers = RwSignal::new(Vec::<String>::new());
    let all_lines = RwSignal::new(Vec::<String>::new());
    let sections = RwSignal::new(Vec::<String>::new());

    load_lookup(mo_types, api::fetch_mo_types());
    load_lookup(model_names, api::fetch_model_names());
    load_lookup(all_lines, api::fetch_lines());
    load_lookup(sections, api::fetch_sections());

    // MO numbers depend on the chosen model; the stored choice survives only
    // the first load.
    let first_model_load = StoredValue::new(true);
    Effect::new(move |_| {
        let model = model_name.get();
        if !first_model_load.get_value() {
            mo_number.set(ALL.to_string());
        }
        first_model_load.set_value(false);
        spawn_local(async move {
            match api::fetch_online_mos(&model).await {
                Ok(values) => mo_numbers.set(values),
                Err(e) => notifications.error(e),
            }
        });
    });

    let current_filters = move || WipFilters {
        mo_type: mo_type.get_untracked(),
        model_name: model_name.get_untracked(),
        mo_number: mo_number.get_untracked(),
        section_name: section_name.get_untracked(),
        lines: lines.get_untracked(),
        is_show_line: is_show_line.get_untracked(),
        is_show_transfer_qty: is_show_transfer_qty.get_untracked(),
        status: MoStatus::from_code(&status.get_untracked()).unwrap_or_default(),
    };

    let refresh = move || {
        let filters = current_filters();
        if let Err(message) = filters.validate() {
            notifications.warning(message);
            return;
        }
        persist_filters(&filters);
        set_loading.set(true);
        spawn_local(async move {
            match run_wip_query(&filters).await {
                Ok(QueryOutcome::Data(matrix)) => {
                    log::debug!("p100: {} rows", matrix.rows.len());
                    state.update(|s| {
                        s.matrix = matrix;
                        s.filters = filters;
                        s.is_loaded = true;
                    });
                }
                Ok(QueryOutcome::NoData) => {
                    state.update(|s| {
                        s.matrix = WipMatrix::empty();
                        s.filters = filters;
                        s.is_loaded = true;
                    });
                    notifications.warning("No data found for the selected filters");
                }
                Err(e) => notifications.error(e),
            }
            set_loading.set(false);
        });
    };

    let toggle_line = move |line: String| {
        lines.update(|selected| {
            if let Some(pos) = selected.iter().position(|l| l == &line) {
                selected.remove(pos);
            } else {
                selected.push(line);
            }
        });
    };

    let rows = Signal::derive(move || state.with(|s| s.matrix.rows.clone()));
    let columns = Signal::derive(move || state.with(|s| s.matrix.columns.clone()));
    let summaries = Signal::derive(move || state.with(|s| s.matrix.summaries.clone()));

    view! {
        <PageFrame page_id="p100_ambit_wip--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Ambit WIP"</h1>
                    <Badge>{move || state.with(|s| s.matrix.rows.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| refresh()
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
                            <span class="filter-panel__title">"Filters"</span>
                        </div>
                    </div>
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End style="flex-wrap: wrap;">
                            <LookupSelect label="MO Type" value=mo_type options=mo_types />
                            <LookupSelect label="Model Name" value=model_name options=model_names />
                            <LookupSelect label="MO" value=mo_number options=mo_numbers />
                            <LookupSelect label="Section" value=section_name options=sections />
                            <div class="filter-panel__field">
                                <Label>"MO Status"</Label>
                                <Select value=status>
                                    {MoStatus::all().into_iter().map(|s| view! {
                                        <option value=s.code()>{s.title()}</option>
                                    }).collect_view()}
                                </Select>
                            </div>
                            <Checkbox checked=is_show_line label="Show Line" />
                            <Checkbox checked=is_show_transfer_qty label="Show Transfer MO Qty" />
                        </Flex>
                        <div class="filter-panel__chips">
                            <span class="filter-panel__chips-label">"Lines:"</span>
                            {move || all_lines.get().into_iter().map(|line| {
                                let line_for_check = line.clone();
                                let line_for_click = line.clone();
                                view! {
                                    <button
                                        class="chip"
                                        class:chip--selected=move || lines.with(|l| l.contains(&line_for_check))
                                        on:click=move |_| toggle_line(line_for_click.clone())
                                    >
                                        {line}
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                    </div>
                </div>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="page__loading">"Loading..."</div> }
                >
                    <DataGrid
                        table_id=TABLE_ID
                        rows=rows
                        columns=columns
                        summaries=summaries
                        on_wip_click=Callback::new(move |target| {
                            // counts came from the last submitted filters, not the bar
                            let request = state.with_untracked(|s| {
                                WipDetailRequest::for_cell(target, &s.filters)
                            });
                            detail_request.set(Some(request));
                        })
                    />
                </Show>

                {move || detail_request.get().map(|request| view! {
                    <WipDetailModal
                        request=request
                        on_close=Callback::new(move |_| detail_request.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}
