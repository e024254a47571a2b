use std::collections::HashMap;

use super::column::{ColumnDef, GridColumn, GridRow, WipSummary, WipTarget};

/// Label of the first fixed footer cell.
pub const SUBTOTAL_LABEL: &str = "Subtotal";

/// Source of rendered header widths for the pinned columns.
///
/// The browser implementation measures `th[data-sticky="true"]` cells after
/// layout; anything else (tests, server-side rendering) can supply constants.
pub trait LayoutMeasure {
    fn fixed_header_widths(&self) -> Vec<f64>;
}

impl LayoutMeasure for Vec<f64> {
    fn fixed_header_widths(&self) -> Vec<f64> {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub title: String,
    pub row_span: u32,
    pub col_span: u32,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyCell {
    Sticky(String),
    Text(String),
    /// `target` is set only for non-zero counts, which render as drill-down controls
    WipCount {
        count: i64,
        target: Option<WipTarget>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FooterCell {
    Sticky(String),
    Text(String),
}

/// Column arrangement derived from an unordered column list.
///
/// Fixed columns come first, then the scrolling ones; each part is sorted by
/// `index` with a stable sort, so equal indices keep their input order.
pub struct GridLayout<R> {
    pub fixed: Vec<ColumnDef>,
    pub scrolling: Vec<GridColumn<R>>,
    pub wips: Vec<ColumnDef>,
}

impl<R> Clone for GridLayout<R> {
    fn clone(&self) -> Self {
        Self {
            fixed: self.fixed.clone(),
            scrolling: self.scrolling.clone(),
            wips: self.wips.clone(),
        }
    }
}

fn sorted_defs(defs: &[ColumnDef]) -> Vec<ColumnDef> {
    let mut sorted = defs.to_vec();
    sorted.sort_by_key(|d| d.index);
    sorted
}

impl<R: GridRow> GridLayout<R> {
    pub fn new(columns: &[GridColumn<R>]) -> Self {
        let fixed: Vec<ColumnDef> = columns
            .iter()
            .filter(|c| c.is_fixed())
            .map(|c| c.def().clone())
            .collect();

        let mut scrolling: Vec<GridColumn<R>> =
            columns.iter().filter(|c| !c.is_fixed()).cloned().collect();
        scrolling.sort_by_key(|c| c.index());

        let wips = scrolling
            .iter()
            .find_map(|c| match c {
                GridColumn::WipGroup { wips, .. } => Some(sorted_defs(wips)),
                _ => None,
            })
            .unwrap_or_default();

        Self {
            fixed: sorted_defs(&fixed),
            scrolling,
            wips,
        }
    }

    pub fn has_wips(&self) -> bool {
        !self.wips.is_empty()
    }

    /// One header row, or two when a WIP group with sub-columns is present.
    pub fn header_rows(&self) -> Vec<Vec<HeaderCell>> {
        let row_span = if self.has_wips() { 2 } else { 1 };
        let mut top = Vec::new();

        for def in &self.fixed {
            top.push(HeaderCell {
                title: def.title.clone(),
                row_span,
                col_span: 1,
                sticky: true,
            });
        }

        for col in &self.scrolling {
            match col {
                GridColumn::WipGroup { def, .. } => {
                    if !self.has_wips() {
                        continue;
                    }
                    top.push(HeaderCell {
                        title: def.title.clone(),
                        row_span: 1,
                        col_span: self.wips.len() as u32,
                        sticky: false,
                    });
                }
                other => top.push(HeaderCell {
                    title: other.def().title.clone(),
                    row_span,
                    col_span: 1,
                    sticky: false,
                }),
            }
        }

        let mut rows = vec![top];
        if self.has_wips() {
            rows.push(
                self.wips
                    .iter()
                    .map(|def| HeaderCell {
                        title: def.title.clone(),
                        row_span: 1,
                        col_span: 1,
                        sticky: false,
                    })
                    .collect(),
            );
        }
        rows
    }

    pub fn body_cells(&self, row: &R) -> Vec<BodyCell> {
        let mut cells: Vec<BodyCell> = self
            .fixed
            .iter()
            .map(|def| BodyCell::Sticky(row.field_text(&def.field).unwrap_or_default()))
            .collect();

        for col in &self.scrolling {
            match col {
                GridColumn::WipGroup { .. } => {
                    for wip in &self.wips {
                        let count = row.wip_count(&wip.field).unwrap_or(0);
                        let target = (count != 0).then(|| row.wip_target(&wip.field));
                        cells.push(BodyCell::WipCount { count, target });
                    }
                }
                other => cells.push(BodyCell::Text(
                    row.field_text(other.field()).unwrap_or_default(),
                )),
            }
        }
        cells
    }

    pub fn footer_cells(&self, rows: &[R], summaries: &[WipSummary]) -> Vec<FooterCell> {
        let totals: HashMap<&str, i64> = summaries
            .iter()
            .map(|s| (s.wip_group.as_str(), s.total))
            .collect();

        let mut cells: Vec<FooterCell> = self
            .fixed
            .iter()
            .enumerate()
            .map(|(i, _)| {
                FooterCell::Sticky(if i == 0 {
                    SUBTOTAL_LABEL.to_string()
                } else {
                    String::new()
                })
            })
            .collect();

        for col in &self.scrolling {
            match col {
                GridColumn::Plain { summary, .. } => cells.push(FooterCell::Text(
                    summary.map(|f| f(rows).to_string()).unwrap_or_default(),
                )),
                GridColumn::WipGroup { .. } => {
                    for wip in &self.wips {
                        let total = totals.get(wip.field.as_str()).copied().unwrap_or(0);
                        cells.push(FooterCell::Text(total.to_string()));
                    }
                }
                GridColumn::Fixed(_) => {}
            }
        }
        cells
    }

    /// Left offsets of the pinned columns: each starts where the previous ended.
    pub fn sticky_offsets(&self, measure: &impl LayoutMeasure) -> Vec<f64> {
        let widths = measure.fixed_header_widths();
        let mut offset = 0.0;
        (0..self.fixed.len())
            .map(|i| {
                let left = offset;
                offset += widths.get(i).copied().unwrap_or(0.0);
                left
            })
            .collect()
    }

    /// `index` of every rendered leaf column, left to right.
    pub fn ordered_indices(&self) -> Vec<i32> {
        let mut indices: Vec<i32> = self.fixed.iter().map(|d| d.index).collect();
        for col in &self.scrolling {
            match col {
                GridColumn::WipGroup { .. } => indices.extend(self.wips.iter().map(|w| w.index)),
                other => indices.push(other.index()),
            }
        }
        indices
    }

    pub fn leaf_count(&self) -> usize {
        self.ordered_indices().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        mo: &'static str,
        qty: i64,
        wips: Vec<(&'static str, i64)>,
    }

    impl GridRow for Row {
        fn field_text(&self, field: &str) -> Option<String> {
            match field {
                "mo_number" => Some(self.mo.to_string()),
                "qty" => Some(self.qty.to_string()),
                _ => None,
            }
        }

        fn wip_count(&self, wip_group: &str) -> Option<i64> {
            self.wips
                .iter()
                .find(|(g, _)| *g == wip_group)
                .map(|(_, c)| *c)
        }

        fn wip_target(&self, wip_group: &str) -> WipTarget {
            WipTarget {
                mo_number: self.mo.to_string(),
                line_name: None,
                wip_group: wip_group.to_string(),
            }
        }
    }

    fn sum_qty(rows: &[Row]) -> i64 {
        rows.iter().map(|r| r.qty).sum()
    }

    fn columns() -> Vec<GridColumn<Row>> {
        vec![
            GridColumn::with_summary("qty", "Qty", 4, sum_qty),
            GridColumn::WipGroup {
                def: ColumnDef::new("wips", "WIP", 1),
                wips: vec![
                    ColumnDef::new("ASSY", "ASSY", 2),
                    ColumnDef::new("SMT", "SMT", 1),
                ],
            },
            GridColumn::fixed("mo_number", "Mo Number", 0),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { mo: "MO1", qty: 10, wips: vec![("SMT", 5)] },
            Row { mo: "MO2", qty: 7, wips: vec![("SMT", 0), ("ASSY", 3)] },
        ]
    }

    #[test]
    fn test_columns_sorted_by_index() {
        let layout = GridLayout::new(&columns());
        assert_eq!(layout.fixed[0].field, "mo_number");
        assert_eq!(layout.wips[0].field, "SMT");
        assert_eq!(layout.wips[1].field, "ASSY");
        assert!(layout.scrolling[0].is_wip_group());
        assert_eq!(layout.ordered_indices(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_equal_indices_keep_input_order() {
        let cols: Vec<GridColumn<Row>> = vec![
            GridColumn::fixed("b", "B", 1),
            GridColumn::fixed("a", "A", 1),
            GridColumn::fixed("z", "Z", 0),
        ];
        let layout = GridLayout::new(&cols);
        let fields: Vec<&str> = layout.fixed.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["z", "b", "a"]);
    }

    #[test]
    fn test_two_tier_header() {
        let layout = GridLayout::new(&columns());
        let header = layout.header_rows();
        assert_eq!(header.len(), 2);

        let top = &header[0];
        assert_eq!(top.len(), 3);
        assert!(top[0].sticky);
        assert_eq!(top[0].row_span, 2);
        assert_eq!(top[1].title, "WIP");
        assert_eq!(top[1].col_span, 2);
        assert_eq!(top[2].title, "Qty");
        assert_eq!(top[2].row_span, 2);

        let titles: Vec<&str> = header[1].iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["SMT", "ASSY"]);
    }

    #[test]
    fn test_single_header_row_without_wips() {
        let cols: Vec<GridColumn<Row>> = vec![
            GridColumn::fixed("mo_number", "Mo Number", 0),
            GridColumn::WipGroup {
                def: ColumnDef::new("wips", "WIP", 1),
                wips: vec![],
            },
            GridColumn::plain("qty", "Qty", 2),
        ];
        let layout = GridLayout::new(&cols);
        let header = layout.header_rows();
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].len(), 2);
        assert!(header[0].iter().all(|c| c.row_span == 1));
    }

    #[test]
    fn test_body_cells_drill_down_only_for_non_zero() {
        let layout = GridLayout::new(&columns());
        let rows = rows();

        let first = layout.body_cells(&rows[0]);
        assert_eq!(first[0], BodyCell::Sticky("MO1".into()));
        match &first[1] {
            BodyCell::WipCount { count, target } => {
                assert_eq!(*count, 5);
                let target = target.as_ref().expect("non-zero count must be clickable");
                assert_eq!(target.wip_group, "SMT");
                assert_eq!(target.mo_number, "MO1");
            }
            other => panic!("unexpected cell {other:?}"),
        }
        // ASSY missing in row data: plain zero
        assert_eq!(first[2], BodyCell::WipCount { count: 0, target: None });
        assert_eq!(first[3], BodyCell::Text("10".into()));

        let second = layout.body_cells(&rows[1]);
        assert_eq!(second[1], BodyCell::WipCount { count: 0, target: None });
    }

    #[test]
    fn test_footer_cells() {
        let layout = GridLayout::new(&columns());
        let summaries = vec![WipSummary { wip_group: "SMT".into(), total: 5 }];
        let footer = layout.footer_cells(&rows(), &summaries);
        assert_eq!(
            footer,
            vec![
                FooterCell::Sticky(SUBTOTAL_LABEL.into()),
                FooterCell::Text("5".into()),
                FooterCell::Text("0".into()),
                FooterCell::Text("17".into()),
            ]
        );
    }

    #[test]
    fn test_plain_column_without_summary_is_blank() {
        let cols: Vec<GridColumn<Row>> = vec![
            GridColumn::fixed("mo_number", "Mo Number", 0),
            GridColumn::fixed("qty", "Qty", 1),
            GridColumn::plain("qty", "Qty again", 2),
        ];
        let layout = GridLayout::new(&cols);
        let footer = layout.footer_cells(&rows(), &[]);
        assert_eq!(
            footer,
            vec![
                FooterCell::Sticky(SUBTOTAL_LABEL.into()),
                FooterCell::Sticky(String::new()),
                FooterCell::Text(String::new()),
            ]
        );
    }

    #[test]
    fn test_sticky_offsets_accumulate_widths() {
        let cols: Vec<GridColumn<Row>> = vec![
            GridColumn::fixed("a", "A", 0),
            GridColumn::fixed("b", "B", 1),
            GridColumn::fixed("c", "C", 2),
        ];
        let layout = GridLayout::new(&cols);
        assert_eq!(layout.sticky_offsets(&vec![80.0, 120.5, 60.0]), vec![0.0, 80.0, 200.5]);
        // not yet measured
        assert_eq!(layout.sticky_offsets(&vec![80.0]), vec![0.0, 80.0, 80.0]);
    }
}
