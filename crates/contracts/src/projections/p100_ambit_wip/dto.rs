use serde::{Deserialize, Serialize};

use crate::shared::grid::{GridRow, WipSummary, WipTarget};

/// Filter value meaning "no restriction".
pub const ALL: &str = "ALL";

/// MO status filter; wire values follow the PMS status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoStatus {
    #[default]
    #[serde(rename = "0")]
    All,
    #[serde(rename = "2")]
    Online,
    #[serde(rename = "3")]
    Close,
}

impl MoStatus {
    pub fn code(&self) -> &'static str {
        match self {
            MoStatus::All => "0",
            MoStatus::Online => "2",
            MoStatus::Close => "3",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MoStatus::All => "All",
            MoStatus::Online => "Online",
            MoStatus::Close => "Close",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(MoStatus::All),
            "2" => Some(MoStatus::Online),
            "3" => Some(MoStatus::Close),
            _ => None,
        }
    }

    pub fn all() -> [MoStatus; 3] {
        [MoStatus::All, MoStatus::Online, MoStatus::Close]
    }
}

/// Filter bar state of the WIP page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipFilters {
    pub mo_type: String,
    pub model_name: String,
    pub mo_number: String,
    pub section_name: String,
    pub lines: Vec<String>,
    pub is_show_line: bool,
    pub is_show_transfer_qty: bool,
    pub status: MoStatus,
}

impl Default for WipFilters {
    fn default() -> Self {
        Self {
            mo_type: ALL.to_string(),
            model_name: ALL.to_string(),
            mo_number: ALL.to_string(),
            section_name: ALL.to_string(),
            lines: Vec::new(),
            is_show_line: true,
            is_show_transfer_qty: false,
            status: MoStatus::All,
        }
    }
}

impl WipFilters {
    /// A query must be narrowed by model or by MO number.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_name == ALL && self.mo_number == ALL {
            return Err("Model Name and MO cannot both be ALL".to_string());
        }
        Ok(())
    }

    pub fn to_query(&self) -> WipQuery {
        WipQuery {
            mo_type: self.mo_type.clone(),
            model_name: self.model_name.clone(),
            mo_number: self.mo_number.clone(),
            section_name: self.section_name.clone(),
            lines: self.lines.clone(),
            is_show_line: self.is_show_line,
            status: self.status,
        }
    }
}

/// Body of `query-mos` and `query-wips`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipQuery {
    pub mo_type: String,
    pub model_name: String,
    pub mo_number: String,
    pub section_name: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(rename = "isShowLine", default)]
    pub is_show_line: bool,
    #[serde(default)]
    pub status: MoStatus,
}

/// Order-level (or order+line) base row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoRow {
    pub mo_number: String,
    pub model_name: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub target_qty: i64,
    #[serde(default)]
    pub device_config: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipGroupDef {
    pub wip_group: String,
    pub step_sequence: i32,
}

/// Body of the per-MO quantity endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoQtyRequest {
    pub mos: Vec<String>,
    #[serde(rename = "isShowLine", default)]
    pub is_show_line: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotInputQty {
    pub mo_number: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub notinput_qty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkQty {
    pub mo_number: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub link_qty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotLinkQty {
    pub mo_number: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub notlink_qty: i64,
}

/// Serial numbers linked to this MO and then moved to another MO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferMoQty {
    pub mo_number: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub transfer_mo_qty: i64,
}

/// Body of `query-wips-by-mos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipCountsRequest {
    pub mos: Vec<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(rename = "isShowLine", default)]
    pub is_show_line: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipCount {
    pub mo_number: String,
    #[serde(default)]
    pub line_name: Option<String>,
    pub wip_group: String,
    pub count: i64,
}

/// Body of `query-wip-detail`.
///
/// `lines` repeats the line filter the cell count was taken with, so an
/// order-mode cell lists the same units it counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipDetailRequest {
    #[serde(flatten)]
    pub target: WipTarget,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl WipDetailRequest {
    pub fn for_cell(target: WipTarget, filters: &WipFilters) -> Self {
        Self {
            target,
            lines: filters.lines.clone(),
        }
    }
}

/// A unit currently sitting in a WIP group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipUnit {
    pub serial_number: String,
    pub mo_number: String,
    pub line_name: String,
    pub wip_group: String,
    pub station_name: String,
    pub in_station_time: String,
}

/// Everything one query submission fetched, ready for the matrix builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WipDatasets {
    pub rows: Vec<MoRow>,
    pub wip_groups: Vec<WipGroupDef>,
    pub not_input: Vec<NotInputQty>,
    /// `None` when transfer quantities were not requested
    pub transfer: Option<Vec<TransferMoQty>>,
    pub link: Vec<LinkQty>,
    pub not_link: Vec<NotLinkQty>,
    pub wip_counts: Vec<WipCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipCell {
    pub wip_group: String,
    pub step_sequence: i32,
    pub count: i64,
}

/// A base row joined with its quantities and one cell per active WIP group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipMatrixRow {
    pub mo_number: String,
    pub model_name: String,
    pub line_name: Option<String>,
    pub target_qty: i64,
    pub device_config: String,
    pub wips: Vec<WipCell>,
    pub total: i64,
    pub transfer_mo_qty: Option<i64>,
    pub notinput_qty: i64,
    pub link_qty: i64,
    pub notlink_qty: i64,
}

impl GridRow for WipMatrixRow {
    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "mo_number" => Some(self.mo_number.clone()),
            "model_name" => Some(self.model_name.clone()),
            "line_name" => Some(self.line_name.clone().unwrap_or_default()),
            "target_qty" => Some(self.target_qty.to_string()),
            "device_config" => Some(self.device_config.clone()),
            "total" => Some(self.total.to_string()),
            "transfer_mo_qty" => self.transfer_mo_qty.map(|q| q.to_string()),
            "notinput_qty" => Some(self.notinput_qty.to_string()),
            "link_qty" => Some(self.link_qty.to_string()),
            "notlink_qty" => Some(self.notlink_qty.to_string()),
            _ => None,
        }
    }

    fn wip_count(&self, wip_group: &str) -> Option<i64> {
        self.wips
            .iter()
            .find(|w| w.wip_group == wip_group)
            .map(|w| w.count)
    }

    fn wip_target(&self, wip_group: &str) -> WipTarget {
        WipTarget {
            mo_number: self.mo_number.clone(),
            line_name: self.line_name.clone(),
            wip_group: wip_group.to_string(),
        }
    }
}

/// Rows, columns and footer aggregates of one query result.
#[derive(Debug, Clone, Default)]
pub struct WipMatrix {
    pub rows: Vec<WipMatrixRow>,
    pub columns: Vec<crate::shared::grid::GridColumn<WipMatrixRow>>,
    pub summaries: Vec<WipSummary>,
}

impl WipMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_require_model_or_mo() {
        let filters = WipFilters::default();
        assert!(filters.validate().is_err());

        let by_model = WipFilters {
            model_name: "X".into(),
            ..WipFilters::default()
        };
        assert!(by_model.validate().is_ok());
    }

    #[test]
    fn test_query_wire_format() {
        let filters = WipFilters {
            model_name: "X".into(),
            status: MoStatus::Online,
            ..WipFilters::default()
        };
        let json = serde_json::to_value(filters.to_query()).unwrap();
        assert_eq!(json["isShowLine"], true);
        assert_eq!(json["status"], "2");
        assert_eq!(json["mo_number"], "ALL");
        assert!(json.get("is_show_transfer_qty").is_none());
    }

    #[test]
    fn test_detail_request_carries_line_filter() {
        let filters = WipFilters {
            lines: vec!["SMT-L1".to_string()],
            ..WipFilters::default()
        };
        let target = WipTarget {
            mo_number: "MO-24001".to_string(),
            line_name: None,
            wip_group: "AOI".to_string(),
        };
        let request = WipDetailRequest::for_cell(target.clone(), &filters);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mo_number"], "MO-24001");
        assert_eq!(json["wip_group"], "AOI");
        assert_eq!(json["lines"], serde_json::json!(["SMT-L1"]));

        let bare: WipDetailRequest =
            serde_json::from_str(r#"{"mo_number":"MO-24001","line_name":null,"wip_group":"AOI"}"#)
                .unwrap();
        assert_eq!(bare.target, target);
        assert!(bare.lines.is_empty());
    }

    #[test]
    fn test_status_codes() {
        for status in MoStatus::all() {
            assert_eq!(MoStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(MoStatus::from_code("1"), None);
    }

    #[test]
    fn test_mo_row_without_line() {
        let row: MoRow = serde_json::from_str(
            r#"{"mo_number":"MO1","model_name":"X","target_qty":100,"device_config":"A"}"#,
        )
        .unwrap();
        assert_eq!(row.line_name, None);
    }
}
