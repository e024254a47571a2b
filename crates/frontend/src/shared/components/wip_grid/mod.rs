//! Data grid for row/column matrices built on `contracts::shared::grid`.
//!
//! Fixed columns are pinned with `position: sticky`; their left offsets are
//! measured from the rendered header after layout and re-measured whenever
//! the fixed column count, the WIP column count or the row count changes.

mod measure;

use contracts::shared::grid::{
    BodyCell, FooterCell, GridColumn, GridLayout, GridRow, HeaderCell, WipSummary, WipTarget,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub use measure::DomMeasure;

pub const NO_DATA_TEXT: &str = "No Data";

fn sticky_style(offsets: &[f64], index: usize) -> String {
    let left = offsets.get(index).copied().unwrap_or(0.0);
    format!("position: sticky; left: {}px; z-index: 2;", left)
}

#[component]
pub fn DataGrid<R>(
    /// DOM id of the `<table>`, also scopes the sticky measurement
    table_id: &'static str,
    #[prop(into)] rows: Signal<Vec<R>>,
    #[prop(into)] columns: Signal<Vec<GridColumn<R>>>,
    #[prop(into)] summaries: Signal<Vec<WipSummary>>,
    /// Fired by a non-zero WIP cell
    on_wip_click: Callback<WipTarget>,
) -> impl IntoView
where
    R: GridRow + Clone + Send + Sync + 'static,
{
    let layout = Signal::derive(move || GridLayout::new(&columns.get()));
    let offsets = RwSignal::new(Vec::<f64>::new());

    Effect::new(move |_| {
        let shape = layout.with(|l| (l.fixed.len(), l.wips.len()));
        let row_count = rows.with(|r| r.len());
        log::debug!(
            "{}: re-measuring sticky columns {:?}, {} rows",
            table_id,
            shape,
            row_count
        );
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            let measured = layout
                .with_untracked(|l| l.sticky_offsets(&DomMeasure { table_id }));
            offsets.set(measured);
        });
    });

    let header = move || {
        layout
            .get()
            .header_rows()
            .into_iter()
            .map(|cells| {
                let cells = cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, cell): (usize, HeaderCell)| {
                        let style = cell
                            .sticky
                            .then(|| offsets.with(|o| sticky_style(o, i)))
                            .unwrap_or_default();
                        view! {
                            <th
                                class="data-grid__th"
                                class:data-grid__th--sticky=cell.sticky
                                rowspan=cell.row_span
                                colspan=cell.col_span
                                data-sticky=cell.sticky.to_string()
                                style=style
                            >
                                {cell.title}
                            </th>
                        }
                    })
                    .collect_view();
                view! { <tr>{cells}</tr> }
            })
            .collect_view()
    };

    let body = move || {
        let layout = layout.get();
        let current_offsets = offsets.get();
        rows.get()
            .iter()
            .map(|row| {
                let cells = layout
                    .body_cells(row)
                    .into_iter()
                    .enumerate()
                    .map(|(i, cell)| match cell {
                        BodyCell::Sticky(text) => view! {
                            <td class="data-grid__td data-grid__td--sticky" style=sticky_style(&current_offsets, i)>
                                {text}
                            </td>
                        }
                        .into_any(),
                        BodyCell::Text(text) => view! {
                            <td class="data-grid__td data-grid__td--num">{text}</td>
                        }
                        .into_any(),
                        BodyCell::WipCount { count, target: Some(target) } => view! {
                            <td class="data-grid__td data-grid__td--num">
                                <button
                                    class="data-grid__wip-link"
                                    on:click=move |_| on_wip_click.run(target.clone())
                                >
                                    {count.to_string()}
                                </button>
                            </td>
                        }
                        .into_any(),
                        BodyCell::WipCount { count, target: None } => view! {
                            <td class="data-grid__td data-grid__td--num">{count.to_string()}</td>
                        }
                        .into_any(),
                    })
                    .collect_view();
                view! { <tr class="data-grid__row">{cells}</tr> }
            })
            .collect_view()
    };

    let footer = move || {
        let layout = layout.get();
        let current_offsets = offsets.get();
        let cells = rows.with(|r| summaries.with(|s| layout.footer_cells(r, s)));
        let cells = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                FooterCell::Sticky(text) => view! {
                    <td class="data-grid__td data-grid__td--sticky" style=sticky_style(&current_offsets, i)>
                        {text}
                    </td>
                }
                .into_any(),
                FooterCell::Text(text) => view! {
                    <td class="data-grid__td data-grid__td--num">{text}</td>
                }
                .into_any(),
            })
            .collect_view();
        view! { <tr class="data-grid__footer">{cells}</tr> }
    };

    view! {
        <Show
            when=move || rows.with(|r| !r.is_empty())
            fallback=|| view! { <div class="data-grid__empty">{NO_DATA_TEXT}</div> }
        >
            <div class="data-grid table-wrapper">
                <table id=table_id class="data-grid__table">
                    <thead>{header}</thead>
                    <tbody>{body}</tbody>
                    <tfoot>{footer}</tfoot>
                </table>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_style_uses_measured_offset() {
        let offsets = vec![0.0, 96.5, 180.0];
        assert_eq!(
            sticky_style(&offsets, 1),
            "position: sticky; left: 96.5px; z-index: 2;"
        );
        assert_eq!(
            sticky_style(&offsets, 7),
            "position: sticky; left: 0px; z-index: 2;"
        );
    }
}
