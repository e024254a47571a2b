//! Joins the independently fetched WIP datasets into one display matrix.

use super::dto::{MoRow, WipCell, WipDatasets, WipGroupDef, WipMatrix, WipMatrixRow};
use crate::shared::grid::{ColumnDef, GridColumn, WipSummary};

/// Index of the "WIP" group column; its sub-columns start here too.
pub const WIP_START_INDEX: i32 = 5;

/// Order numbers in first-seen order without duplicates.
pub fn distinct_mos(rows: &[MoRow]) -> Vec<String> {
    let mut mos: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        if !mos.iter().any(|m| m == &row.mo_number) {
            mos.push(row.mo_number.clone());
        }
    }
    mos
}

fn same_key(
    row: &MoRow,
    mo_number: &str,
    line_name: &Option<String>,
    is_show_line: bool,
) -> bool {
    row.mo_number == mo_number && (!is_show_line || &row.line_name == line_name)
}

fn sorted_groups(groups: &[WipGroupDef]) -> Vec<WipGroupDef> {
    let mut sorted = groups.to_vec();
    // sort_by_key is stable: equal step sequences keep server order
    sorted.sort_by_key(|g| g.step_sequence);
    sorted
}

fn sum_totals(rows: &[WipMatrixRow]) -> i64 {
    rows.iter().map(|r| r.total).sum()
}

fn build_row(
    base: &MoRow,
    groups: &[WipGroupDef],
    datasets: &WipDatasets,
    is_show_line: bool,
    is_show_transfer_qty: bool,
) -> WipMatrixRow {
    let notinput_qty = datasets
        .not_input
        .iter()
        .find(|q| same_key(base, &q.mo_number, &q.line_name, is_show_line))
        .map(|q| q.notinput_qty)
        .unwrap_or(0);
    let link_qty = datasets
        .link
        .iter()
        .find(|q| same_key(base, &q.mo_number, &q.line_name, is_show_line))
        .map(|q| q.link_qty)
        .unwrap_or(0);
    let notlink_qty = datasets
        .not_link
        .iter()
        .find(|q| same_key(base, &q.mo_number, &q.line_name, is_show_line))
        .map(|q| q.notlink_qty)
        .unwrap_or(0);
    let transfer_mo_qty = if is_show_transfer_qty {
        let found = datasets.transfer.as_ref().and_then(|list| {
            list.iter()
                .find(|q| same_key(base, &q.mo_number, &q.line_name, is_show_line))
                .map(|q| q.transfer_mo_qty)
        });
        Some(found.unwrap_or(0))
    } else {
        None
    };

    let wips: Vec<WipCell> = groups
        .iter()
        .map(|group| {
            let count = datasets
                .wip_counts
                .iter()
                .find(|c| {
                    c.wip_group == group.wip_group
                        && same_key(base, &c.mo_number, &c.line_name, is_show_line)
                })
                .map(|c| c.count)
                .unwrap_or(0);
            WipCell {
                wip_group: group.wip_group.clone(),
                step_sequence: group.step_sequence,
                count,
            }
        })
        .collect();
    let total = wips.iter().map(|w| w.count).sum();

    WipMatrixRow {
        mo_number: base.mo_number.clone(),
        model_name: base.model_name.clone(),
        line_name: if is_show_line {
            base.line_name.clone()
        } else {
            None
        },
        target_qty: base.target_qty,
        device_config: base.device_config.clone(),
        wips,
        total,
        transfer_mo_qty,
        notinput_qty,
        link_qty,
        notlink_qty,
    }
}

fn build_columns(
    groups: &[WipGroupDef],
    is_show_line: bool,
    is_show_transfer_qty: bool,
) -> Vec<GridColumn<WipMatrixRow>> {
    let mut columns = vec![
        GridColumn::fixed("mo_number", "MO", 0),
        GridColumn::fixed("model_name", "Model Name", 1),
    ];
    if is_show_line {
        columns.push(GridColumn::fixed("line_name", "Line", 2));
    }
    columns.push(GridColumn::fixed("target_qty", "Target Qty", 3));
    columns.push(GridColumn::fixed("device_config", "Device Config", 4));

    let wips: Vec<ColumnDef> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| ColumnDef::new(&g.wip_group, &g.wip_group, WIP_START_INDEX + i as i32))
        .collect();
    let start = WIP_START_INDEX + wips.len() as i32;
    columns.push(GridColumn::WipGroup {
        def: ColumnDef::new("wips", "WIP", WIP_START_INDEX),
        wips,
    });

    columns.push(GridColumn::with_summary("total", "Total", start, sum_totals));
    if is_show_transfer_qty {
        columns.push(GridColumn::plain("transfer_mo_qty", "Transfer MO Qty", start + 1));
    }
    columns.push(GridColumn::plain("notinput_qty", "Not Input Qty", start + 2));
    columns.push(GridColumn::plain("link_qty", "Link Qty", start + 3));
    columns.push(GridColumn::plain("notlink_qty", "Not Link Qty", start + 4));
    columns
}

/// Builds rows, columns and WIP summaries from one query's datasets.
///
/// Empty base rows or an empty WIP group list yield [`WipMatrix::empty`].
pub fn build_wip_matrix(
    datasets: &WipDatasets,
    is_show_line: bool,
    is_show_transfer_qty: bool,
) -> WipMatrix {
    if datasets.rows.is_empty() || datasets.wip_groups.is_empty() {
        return WipMatrix::empty();
    }

    let groups = sorted_groups(&datasets.wip_groups);
    let rows: Vec<WipMatrixRow> = datasets
        .rows
        .iter()
        .map(|base| build_row(base, &groups, datasets, is_show_line, is_show_transfer_qty))
        .collect();

    let summaries = groups
        .iter()
        .enumerate()
        .map(|(i, g)| WipSummary {
            wip_group: g.wip_group.clone(),
            total: rows.iter().map(|r| r.wips[i].count).sum(),
        })
        .collect();

    WipMatrix {
        rows,
        columns: build_columns(&groups, is_show_line, is_show_transfer_qty),
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p100_ambit_wip::dto::{
        LinkQty, NotInputQty, NotLinkQty, TransferMoQty, WipCount,
    };
    use crate::shared::grid::{FooterCell, GridLayout};

    fn mo(mo_number: &str, line: Option<&str>) -> MoRow {
        MoRow {
            mo_number: mo_number.into(),
            model_name: "X".into(),
            line_name: line.map(String::from),
            target_qty: 100,
            device_config: String::new(),
        }
    }

    fn group(name: &str, seq: i32) -> WipGroupDef {
        WipGroupDef {
            wip_group: name.into(),
            step_sequence: seq,
        }
    }

    fn count(mo_number: &str, line: Option<&str>, wip_group: &str, count: i64) -> WipCount {
        WipCount {
            mo_number: mo_number.into(),
            line_name: line.map(String::from),
            wip_group: wip_group.into(),
            count,
        }
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", None)],
            wip_groups: vec![group("SMT", 1), group("ASSY", 2)],
            wip_counts: vec![count("MO1", None, "SMT", 5)],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, false, false);

        assert_eq!(matrix.rows.len(), 1);
        let row = &matrix.rows[0];
        let wips: Vec<(&str, i64)> = row
            .wips
            .iter()
            .map(|w| (w.wip_group.as_str(), w.count))
            .collect();
        assert_eq!(wips, vec![("SMT", 5), ("ASSY", 0)]);
        assert_eq!(row.total, 5);
        assert_eq!(row.notinput_qty, 0);
        assert_eq!(row.transfer_mo_qty, None);
    }

    #[test]
    fn test_empty_inputs_yield_empty_matrix() {
        let no_rows = WipDatasets {
            wip_groups: vec![group("SMT", 1)],
            ..Default::default()
        };
        let no_groups = WipDatasets {
            rows: vec![mo("MO1", None)],
            ..Default::default()
        };

        for datasets in [no_rows, no_groups] {
            let matrix = build_wip_matrix(&datasets, true, true);
            assert!(matrix.rows.is_empty());
            assert!(matrix.columns.is_empty());
            assert!(matrix.summaries.is_empty());
        }
    }

    #[test]
    fn test_groups_follow_step_sequence() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", None)],
            wip_groups: vec![group("PACK", 3), group("SMT", 1), group("DIP", 1)],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, false, false);
        let order: Vec<&str> = matrix.rows[0]
            .wips
            .iter()
            .map(|w| w.wip_group.as_str())
            .collect();
        assert_eq!(order, vec!["SMT", "DIP", "PACK"]);
    }

    #[test]
    fn test_line_mode_matches_on_line() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", Some("L1")), mo("MO1", Some("L2"))],
            wip_groups: vec![group("SMT", 1)],
            not_input: vec![NotInputQty {
                mo_number: "MO1".into(),
                line_name: Some("L2".into()),
                notinput_qty: 7,
            }],
            wip_counts: vec![
                count("MO1", Some("L1"), "SMT", 3),
                count("MO1", Some("L2"), "SMT", 4),
            ],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, true, false);
        assert_eq!(matrix.rows[0].total, 3);
        assert_eq!(matrix.rows[0].notinput_qty, 0);
        assert_eq!(matrix.rows[1].total, 4);
        assert_eq!(matrix.rows[1].notinput_qty, 7);
        assert_eq!(matrix.summaries[0].total, 7);
    }

    #[test]
    fn test_order_mode_ignores_line() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", None)],
            wip_groups: vec![group("SMT", 1)],
            link: vec![LinkQty {
                mo_number: "MO1".into(),
                line_name: Some("L9".into()),
                link_qty: 2,
            }],
            not_link: vec![NotLinkQty {
                mo_number: "MO1".into(),
                line_name: None,
                notlink_qty: 6,
            }],
            wip_counts: vec![count("MO1", Some("L9"), "SMT", 8)],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, false, false);
        let row = &matrix.rows[0];
        assert_eq!(row.link_qty, 2);
        assert_eq!(row.notlink_qty, 6);
        assert_eq!(row.total, 8);
    }

    #[test]
    fn test_transfer_only_when_requested() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", None), mo("MO2", None)],
            wip_groups: vec![group("SMT", 1)],
            transfer: Some(vec![TransferMoQty {
                mo_number: "MO2".into(),
                line_name: None,
                transfer_mo_qty: 4,
            }]),
            ..Default::default()
        };

        let with = build_wip_matrix(&datasets, false, true);
        assert_eq!(with.rows[0].transfer_mo_qty, Some(0));
        assert_eq!(with.rows[1].transfer_mo_qty, Some(4));
        assert!(with.columns.iter().any(|c| c.field() == "transfer_mo_qty"));

        let without = build_wip_matrix(&datasets, false, false);
        assert_eq!(without.rows[1].transfer_mo_qty, None);
        assert!(!without.columns.iter().any(|c| c.field() == "transfer_mo_qty"));
    }

    #[test]
    fn test_column_indices() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", Some("L1"))],
            wip_groups: vec![group("SMT", 1), group("ASSY", 2)],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, true, true);
        let indexed: Vec<(&str, i32)> = matrix
            .columns
            .iter()
            .map(|c| (c.field(), c.index()))
            .collect();
        assert_eq!(
            indexed,
            vec![
                ("mo_number", 0),
                ("model_name", 1),
                ("line_name", 2),
                ("target_qty", 3),
                ("device_config", 4),
                ("wips", 5),
                ("total", 7),
                ("transfer_mo_qty", 8),
                ("notinput_qty", 9),
                ("link_qty", 10),
                ("notlink_qty", 11),
            ]
        );

        let layout = GridLayout::new(&matrix.columns);
        let indices = layout.ordered_indices();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(layout.fixed.len(), 5);
        assert_eq!(layout.wips.len(), 2);
    }

    #[test]
    fn test_line_column_hidden_in_order_mode() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", Some("L1"))],
            wip_groups: vec![group("SMT", 1)],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, false, false);
        assert!(!matrix.columns.iter().any(|c| c.field() == "line_name"));
        assert_eq!(matrix.rows[0].line_name, None);
    }

    #[test]
    fn test_summaries_and_footer() {
        let datasets = WipDatasets {
            rows: vec![mo("MO1", None), mo("MO2", None)],
            wip_groups: vec![group("SMT", 1), group("ASSY", 2)],
            wip_counts: vec![
                count("MO1", None, "SMT", 5),
                count("MO2", None, "SMT", 1),
                count("MO2", None, "ASSY", 2),
            ],
            ..Default::default()
        };

        let matrix = build_wip_matrix(&datasets, false, false);
        assert_eq!(
            matrix.summaries,
            vec![
                WipSummary {
                    wip_group: "SMT".into(),
                    total: 6
                },
                WipSummary {
                    wip_group: "ASSY".into(),
                    total: 2
                },
            ]
        );

        let layout = GridLayout::new(&matrix.columns);
        let footer = layout.footer_cells(&matrix.rows, &matrix.summaries);
        // 4 fixed, 2 wips, total, 3 trailing quantity columns
        assert_eq!(footer.len(), 10);
        assert_eq!(footer[4], FooterCell::Text("6".into()));
        assert_eq!(footer[5], FooterCell::Text("2".into()));
        assert_eq!(footer[6], FooterCell::Text("8".into()));
        assert_eq!(footer[7], FooterCell::Text(String::new()));
    }

    #[test]
    fn test_distinct_mos_keeps_first_seen_order() {
        let rows = vec![
            mo("MO2", Some("L1")),
            mo("MO1", Some("L1")),
            mo("MO2", Some("L2")),
        ];
        assert_eq!(distinct_mos(&rows), vec!["MO2".to_string(), "MO1".to_string()]);
    }
}
