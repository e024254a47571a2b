use contracts::projections::p100_ambit_wip::{WipDetailRequest, WipUnit};
use contracts::shared::grid::WipTarget;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::projections::p100_ambit_wip::api;
use crate::shared::modal_frame::ModalFrame;

fn detail_title(target: &WipTarget) -> String {
    match &target.line_name {
        Some(line) => format!("{} / {} / {}", target.mo_number, line, target.wip_group),
        None => format!("{} / {}", target.mo_number, target.wip_group),
    }
}

/// Units currently sitting in one WIP group of an MO (and line).
#[component]
pub fn WipDetailModal(request: WipDetailRequest, on_close: Callback<()>) -> impl IntoView {
    let title = detail_title(&request.target);
    let units: RwSignal<Vec<WipUnit>> = RwSignal::new(Vec::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);

    spawn_local(async move {
        match api::query_wip_detail(&request).await {
            Ok(data) => units.set(data),
            Err(e) => set_error.set(Some(e)),
        }
        set_loading.set(false);
    });

    view! {
        <ModalFrame title=title on_close=on_close modal_class="modal--wide">
            <div class="modal-body">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="page__loading">"Loading..."</div> }
                >
                    <div class="detail__summary">
                        {move || format!("{} units", units.with(|u| u.len()))}
                    </div>
                    <table class="data-grid__table">
                        <thead>
                            <tr>
                                <th class="data-grid__th">"Serial Number"</th>
                                <th class="data-grid__th">"Line"</th>
                                <th class="data-grid__th">"Station"</th>
                                <th class="data-grid__th">"In Station Time"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || units.get()
                                key=|u| u.serial_number.clone()
                                children=|u: WipUnit| view! {
                                    <tr class="data-grid__row">
                                        <td class="data-grid__td">{u.serial_number}</td>
                                        <td class="data-grid__td">{u.line_name}</td>
                                        <td class="data-grid__td">{u.station_name}</td>
                                        <td class="data-grid__td">{u.in_station_time}</td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_title() {
        let mut target = WipTarget {
            mo_number: "MO-24001".to_string(),
            line_name: Some("SMT-L1".to_string()),
            wip_group: "SMT".to_string(),
        };
        assert_eq!(detail_title(&target), "MO-24001 / SMT-L1 / SMT");
        target.line_name = None;
        assert_eq!(detail_title(&target), "MO-24001 / SMT");
    }
}
