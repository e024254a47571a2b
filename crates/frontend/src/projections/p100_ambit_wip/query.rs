//! Sequential fetch chain behind the Refresh button.
//!
//! Every call is awaited before the next one starts; the first failure
//! aborts the chain and its message is returned unchanged.

use contracts::projections::p100_ambit_wip::{
    build_wip_matrix, distinct_mos, MoQtyRequest, MoRow, WipCountsRequest, WipDatasets,
    WipFilters, WipMatrix,
};

use super::api;

#[derive(Debug)]
pub enum QueryOutcome {
    Data(WipMatrix),
    /// No MOs or no WIP groups matched the filters
    NoData,
}

/// Bodies of the per-MO requests that follow `query-mos`.
fn follow_up_requests(filters: &WipFilters, rows: &[MoRow]) -> (MoQtyRequest, WipCountsRequest) {
    let mos = distinct_mos(rows);
    let qty = MoQtyRequest {
        mos: mos.clone(),
        is_show_line: filters.is_show_line,
    };
    let counts = WipCountsRequest {
        mos,
        lines: filters.lines.clone(),
        is_show_line: filters.is_show_line,
    };
    (qty, counts)
}

pub async fn run_wip_query(filters: &WipFilters) -> Result<QueryOutcome, String> {
    filters.validate()?;
    let query = filters.to_query();

    let rows = api::query_mos(&query).await?;
    log::debug!("query-mos: {} rows", rows.len());
    if rows.is_empty() {
        return Ok(QueryOutcome::NoData);
    }

    let wip_groups = api::query_wips(&query).await?;
    log::debug!("query-wips: {} groups", wip_groups.len());
    if wip_groups.is_empty() {
        return Ok(QueryOutcome::NoData);
    }

    let (qty_request, counts_request) = follow_up_requests(filters, &rows);

    let not_input = api::query_not_input_qty(&qty_request).await?;
    let transfer = if filters.is_show_transfer_qty {
        Some(api::query_transfer_qty(&qty_request).await?)
    } else {
        None
    };
    let link = api::query_link_qty(&qty_request).await?;
    let not_link = api::query_not_link_qty(&qty_request).await?;
    let wip_counts = api::query_wip_counts(&counts_request).await?;
    log::debug!("query-wips-by-mos: {} counts", wip_counts.len());

    let datasets = WipDatasets {
        rows,
        wip_groups,
        not_input,
        transfer,
        link,
        not_link,
        wip_counts,
    };

    let matrix = build_wip_matrix(
        &datasets,
        filters.is_show_line,
        filters.is_show_transfer_qty,
    );
    if matrix.is_empty() {
        return Ok(QueryOutcome::NoData);
    }
    Ok(QueryOutcome::Data(matrix))
}
