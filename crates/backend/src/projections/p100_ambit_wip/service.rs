use anyhow::Result;
use contracts::projections::p100_ambit_wip::{
    LinkQty, MoQtyRequest, MoRow, NotInputQty, NotLinkQty, TransferMoQty, WipCount,
    WipCountsRequest, WipDetailRequest, WipGroupDef, WipQuery, WipUnit, ALL,
};
use sea_orm::ConnectionTrait;

use super::repository::{self, QtyRow, UnitQty};
use crate::shared::error::ApiError;

fn ensure_narrowed(query: &WipQuery) -> Result<()> {
    if query.model_name == ALL && query.mo_number == ALL {
        return Err(ApiError::BadRequest("Model Name and MO cannot both be ALL".to_string()).into());
    }
    Ok(())
}

pub async fn query_mos<C: ConnectionTrait>(conn: &C, query: &WipQuery) -> Result<Vec<MoRow>> {
    ensure_narrowed(query)?;
    let rows = repository::query_mos(conn, query).await?;
    tracing::debug!(
        "query-mos model={} mo={} lines={} -> {} rows",
        query.model_name,
        query.mo_number,
        query.lines.len(),
        rows.len()
    );
    Ok(rows)
}

pub async fn query_wips<C: ConnectionTrait>(
    conn: &C,
    query: &WipQuery,
) -> Result<Vec<WipGroupDef>> {
    repository::query_wip_groups(conn, query).await
}

async fn qty<C: ConnectionTrait>(
    conn: &C,
    request: &MoQtyRequest,
    kind: UnitQty,
) -> Result<Vec<QtyRow>> {
    let rows = repository::unit_qty(conn, request, kind).await?;
    tracing::debug!("{:?} qty for {} MOs -> {} rows", kind, request.mos.len(), rows.len());
    Ok(rows)
}

pub async fn not_input_qty<C: ConnectionTrait>(
    conn: &C,
    request: &MoQtyRequest,
) -> Result<Vec<NotInputQty>> {
    Ok(qty(conn, request, UnitQty::NotInput)
        .await?
        .into_iter()
        .map(|r| NotInputQty {
            mo_number: r.mo_number,
            line_name: r.line_name,
            notinput_qty: r.qty,
        })
        .collect())
}

pub async fn link_qty<C: ConnectionTrait>(conn: &C, request: &MoQtyRequest) -> Result<Vec<LinkQty>> {
    Ok(qty(conn, request, UnitQty::Link)
        .await?
        .into_iter()
        .map(|r| LinkQty {
            mo_number: r.mo_number,
            line_name: r.line_name,
            link_qty: r.qty,
        })
        .collect())
}

pub async fn not_link_qty<C: ConnectionTrait>(
    conn: &C,
    request: &MoQtyRequest,
) -> Result<Vec<NotLinkQty>> {
    Ok(qty(conn, request, UnitQty::NotLink)
        .await?
        .into_iter()
        .map(|r| NotLinkQty {
            mo_number: r.mo_number,
            line_name: r.line_name,
            notlink_qty: r.qty,
        })
        .collect())
}

pub async fn transfer_qty<C: ConnectionTrait>(
    conn: &C,
    request: &MoQtyRequest,
) -> Result<Vec<TransferMoQty>> {
    Ok(qty(conn, request, UnitQty::Transfer)
        .await?
        .into_iter()
        .map(|r| TransferMoQty {
            mo_number: r.mo_number,
            line_name: r.line_name,
            transfer_mo_qty: r.qty,
        })
        .collect())
}

pub async fn wip_counts<C: ConnectionTrait>(
    conn: &C,
    request: &WipCountsRequest,
) -> Result<Vec<WipCount>> {
    repository::wip_counts(conn, request).await
}

pub async fn wip_detail<C: ConnectionTrait>(
    conn: &C,
    request: &WipDetailRequest,
) -> Result<Vec<WipUnit>> {
    let target = &request.target;
    if target.mo_number.trim().is_empty() || target.wip_group.trim().is_empty() {
        return Err(ApiError::BadRequest("mo_number and wip_group are required".to_string()).into());
    }
    repository::wip_units(conn, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::{db::memory_connection, seed::seed_demo};
    use contracts::projections::p100_ambit_wip::{
        build_wip_matrix, distinct_mos, MoStatus, WipDatasets, WipFilters,
    };
    use contracts::shared::grid::WipTarget;
    use sea_orm::DatabaseConnection;

    async fn seeded() -> DatabaseConnection {
        let conn = memory_connection().await.unwrap();
        seed_demo(&conn).await.unwrap();
        conn
    }

    fn query(model: &str, is_show_line: bool) -> WipQuery {
        WipFilters {
            model_name: model.into(),
            is_show_line,
            ..WipFilters::default()
        }
        .to_query()
    }

    #[tokio::test]
    async fn test_lookups() {
        let conn = seeded().await;
        assert_eq!(
            repository::distinct_models(&conn).await.unwrap(),
            vec!["AX-100".to_string(), "BX-200".to_string()]
        );
        assert_eq!(
            repository::distinct_mo_types(&conn).await.unwrap(),
            vec!["NORMAL".to_string(), "REWORK".to_string()]
        );
        assert_eq!(repository::distinct_lines(&conn).await.unwrap().len(), 3);
        assert_eq!(
            repository::distinct_sections(&conn).await.unwrap(),
            vec!["ASSY".to_string(), "PACKING".to_string(), "SMT".to_string()]
        );

        // MO-23950 is closed
        let online = repository::online_mos_by_model(&conn, "BX-200").await.unwrap();
        assert_eq!(online, vec!["MO-24003".to_string()]);
        let all = repository::online_mos_by_model(&conn, ALL).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_query_mos_rejects_unbounded_query() {
        let conn = seeded().await;
        let err = query_mos(&conn, &WipFilters::default().to_query())
            .await
            .unwrap_err();
        assert!(matches!(
            ApiError::from(err),
            ApiError::BadRequest(message) if message.contains("cannot both be ALL")
        ));
    }

    #[tokio::test]
    async fn test_query_mos_granularity_and_filters() {
        let conn = seeded().await;

        let per_mo = query_mos(&conn, &query("AX-100", false)).await.unwrap();
        assert_eq!(per_mo.len(), 2);
        assert!(per_mo.iter().all(|r| r.line_name.is_none()));
        assert_eq!(per_mo[0].target_qty, 500);

        let per_line = query_mos(&conn, &query("AX-100", true)).await.unwrap();
        assert_eq!(per_line.len(), 3);
        assert_eq!(per_line[0].line_name.as_deref(), Some("SMT-L1"));
        assert_eq!(per_line[0].target_qty, 300);

        let mut on_l2 = query("AX-100", true);
        on_l2.lines = vec!["SMT-L2".into()];
        let rows = query_mos(&conn, &on_l2).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mo_number, "MO-24001");

        let mut closed = query("BX-200", false);
        closed.status = MoStatus::Close;
        let rows = query_mos(&conn, &closed).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mo_number, "MO-23950");
    }

    #[tokio::test]
    async fn test_wip_groups_by_section() {
        let conn = seeded().await;
        let all = query_wips(&conn, &query("AX-100", false)).await.unwrap();
        let names: Vec<&str> = all.iter().map(|g| g.wip_group.as_str()).collect();
        assert_eq!(names, vec!["SMT", "AOI", "DIP", "ASSY", "PACK"]);

        let mut smt = query("AX-100", false);
        smt.section_name = "SMT".into();
        assert_eq!(query_wips(&conn, &smt).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_quantities_partition_units() {
        let conn = seeded().await;
        let request = MoQtyRequest {
            mos: vec!["MO-24001".into()],
            is_show_line: false,
        };

        let not_input = not_input_qty(&conn, &request).await.unwrap();
        let link = link_qty(&conn, &request).await.unwrap();
        let not_link = not_link_qty(&conn, &request).await.unwrap();
        let counts = wip_counts(
            &conn,
            &WipCountsRequest {
                mos: request.mos.clone(),
                lines: vec![],
                is_show_line: false,
            },
        )
        .await
        .unwrap();

        // two lines: 2 + 3 never-input serials
        assert_eq!(not_input[0].notinput_qty, 5);
        let input: i64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(link[0].link_qty + not_link[0].notlink_qty, input);

        let transfer = transfer_qty(&conn, &request).await.unwrap();
        assert_eq!(transfer[0].transfer_mo_qty, 2);
    }

    #[tokio::test]
    async fn test_line_mode_quantities_carry_line() {
        let conn = seeded().await;
        let request = MoQtyRequest {
            mos: vec!["MO-24001".into()],
            is_show_line: true,
        };
        let not_input = not_input_qty(&conn, &request).await.unwrap();
        let lines: Vec<(Option<&str>, i64)> = not_input
            .iter()
            .map(|q| (q.line_name.as_deref(), q.notinput_qty))
            .collect();
        assert_eq!(lines, vec![(Some("SMT-L1"), 2), (Some("SMT-L2"), 3)]);
    }

    #[tokio::test]
    async fn test_empty_mos_short_circuit() {
        let conn = seeded().await;
        let request = MoQtyRequest {
            mos: vec![],
            is_show_line: true,
        };
        assert!(link_qty(&conn, &request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detail_matches_cell_count() {
        let conn = seeded().await;
        let counts = wip_counts(
            &conn,
            &WipCountsRequest {
                mos: vec!["MO-24001".into()],
                lines: vec!["SMT-L2".into()],
                is_show_line: true,
            },
        )
        .await
        .unwrap();
        let cell = &counts[0];
        assert_eq!(cell.line_name.as_deref(), Some("SMT-L2"));

        let units = wip_detail(
            &conn,
            &WipDetailRequest {
                target: WipTarget {
                    mo_number: cell.mo_number.clone(),
                    line_name: cell.line_name.clone(),
                    wip_group: cell.wip_group.clone(),
                },
                lines: vec!["SMT-L2".into()],
            },
        )
        .await
        .unwrap();
        assert_eq!(units.len() as i64, cell.count);
        assert!(units.iter().all(|u| u.line_name == "SMT-L2"));
    }

    #[tokio::test]
    async fn test_order_mode_detail_honours_line_filter() {
        let conn = seeded().await;
        let lines = vec!["SMT-L1".to_string()];
        let counts = wip_counts(
            &conn,
            &WipCountsRequest {
                mos: vec!["MO-24001".into()],
                lines: lines.clone(),
                is_show_line: false,
            },
        )
        .await
        .unwrap();
        assert!(!counts.is_empty());

        for cell in &counts {
            assert_eq!(cell.line_name, None);
            let target = WipTarget {
                mo_number: cell.mo_number.clone(),
                line_name: None,
                wip_group: cell.wip_group.clone(),
            };
            let filtered = wip_detail(
                &conn,
                &WipDetailRequest {
                    target: target.clone(),
                    lines: lines.clone(),
                },
            )
            .await
            .unwrap();
            assert_eq!(filtered.len() as i64, cell.count, "group {}", cell.wip_group);
            assert!(filtered.iter().all(|u| u.line_name == "SMT-L1"));

            let unfiltered = wip_detail(&conn, &WipDetailRequest { target, lines: vec![] })
                .await
                .unwrap();
            assert!(unfiltered.len() >= filtered.len());
        }
    }

    #[tokio::test]
    async fn test_end_to_end_matrix() {
        let conn = seeded().await;
        let wip_query = query("AX-100", true);

        let rows = query_mos(&conn, &wip_query).await.unwrap();
        let groups = query_wips(&conn, &wip_query).await.unwrap();
        let mos = distinct_mos(&rows);
        let request = MoQtyRequest {
            mos: mos.clone(),
            is_show_line: true,
        };
        let datasets = WipDatasets {
            not_input: not_input_qty(&conn, &request).await.unwrap(),
            transfer: Some(transfer_qty(&conn, &request).await.unwrap()),
            link: link_qty(&conn, &request).await.unwrap(),
            not_link: not_link_qty(&conn, &request).await.unwrap(),
            wip_counts: wip_counts(
                &conn,
                &WipCountsRequest {
                    mos,
                    lines: vec![],
                    is_show_line: true,
                },
            )
            .await
            .unwrap(),
            rows,
            wip_groups: groups,
        };

        let matrix = build_wip_matrix(&datasets, true, true);
        assert_eq!(matrix.rows.len(), 3);
        for row in &matrix.rows {
            assert_eq!(row.wips.len(), 5);
            assert_eq!(row.total, row.link_qty + row.notlink_qty);
        }
        let grand: i64 = matrix.summaries.iter().map(|s| s.total).sum();
        let totals: i64 = matrix.rows.iter().map(|r| r.total).sum();
        assert_eq!(grand, totals);
    }
}
