use serde::{Deserialize, Serialize};
use std::fmt;

/// Display attributes shared by every column variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Row field (or WIP group name) the column reads
    pub field: String,
    /// Header text
    pub title: String,
    /// Display position; columns are sorted ascending by it
    pub index: i32,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, title: impl Into<String>, index: i32) -> Self {
        Self {
            field: field.into(),
            title: title.into(),
            index,
        }
    }
}

/// Footer aggregate computed over the currently displayed rows.
pub type SummaryFn<R> = fn(&[R]) -> i64;

/// One displayable column of the grid.
pub enum GridColumn<R> {
    /// Pinned to the leading edge during horizontal scroll
    Fixed(ColumnDef),
    /// Ordinary scrolling column with an optional footer aggregate
    Plain {
        def: ColumnDef,
        summary: Option<SummaryFn<R>>,
    },
    /// Two-tier header: `def.title` spans all `wips` sub-columns
    WipGroup { def: ColumnDef, wips: Vec<ColumnDef> },
}

impl<R> GridColumn<R> {
    pub fn fixed(field: &str, title: &str, index: i32) -> Self {
        GridColumn::Fixed(ColumnDef::new(field, title, index))
    }

    pub fn plain(field: &str, title: &str, index: i32) -> Self {
        GridColumn::Plain {
            def: ColumnDef::new(field, title, index),
            summary: None,
        }
    }

    pub fn with_summary(field: &str, title: &str, index: i32, summary: SummaryFn<R>) -> Self {
        GridColumn::Plain {
            def: ColumnDef::new(field, title, index),
            summary: Some(summary),
        }
    }

    pub fn def(&self) -> &ColumnDef {
        match self {
            GridColumn::Fixed(def) => def,
            GridColumn::Plain { def, .. } => def,
            GridColumn::WipGroup { def, .. } => def,
        }
    }

    pub fn index(&self) -> i32 {
        self.def().index
    }

    pub fn field(&self) -> &str {
        &self.def().field
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, GridColumn::Fixed(_))
    }

    pub fn is_wip_group(&self) -> bool {
        matches!(self, GridColumn::WipGroup { .. })
    }
}

// Manual impls: derives would demand `R: Clone` / `R: Debug` although `R`
// only appears behind a fn pointer.
impl<R> Clone for GridColumn<R> {
    fn clone(&self) -> Self {
        match self {
            GridColumn::Fixed(def) => GridColumn::Fixed(def.clone()),
            GridColumn::Plain { def, summary } => GridColumn::Plain {
                def: def.clone(),
                summary: *summary,
            },
            GridColumn::WipGroup { def, wips } => GridColumn::WipGroup {
                def: def.clone(),
                wips: wips.clone(),
            },
        }
    }
}

impl<R> fmt::Debug for GridColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridColumn::Fixed(def) => f.debug_tuple("Fixed").field(def).finish(),
            GridColumn::Plain { def, summary } => f
                .debug_struct("Plain")
                .field("def", def)
                .field("has_summary", &summary.is_some())
                .finish(),
            GridColumn::WipGroup { def, wips } => f
                .debug_struct("WipGroup")
                .field("def", def)
                .field("wips", wips)
                .finish(),
        }
    }
}

/// Precomputed aggregate of one WIP column across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipSummary {
    pub wip_group: String,
    pub total: i64,
}

/// Order / line / WIP group triple a drill-down view is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipTarget {
    pub mo_number: String,
    pub line_name: Option<String>,
    pub wip_group: String,
}

/// Row access the grid needs; implemented by every row type it renders.
pub trait GridRow {
    /// Display text of a scalar field, `None` when the row has no such field
    fn field_text(&self, field: &str) -> Option<String>;

    /// Count of a WIP sub-column, `None` when the row carries no entry for it
    fn wip_count(&self, wip_group: &str) -> Option<i64>;

    /// Drill-down scope of a WIP cell in this row
    fn wip_target(&self, wip_group: &str) -> WipTarget;
}
