use anyhow::{Context, Result};
use contracts::projections::p100_ambit_wip::{
    MoQtyRequest, MoRow, MoStatus, WipCount, WipCountsRequest, WipDetailRequest, WipGroupDef,
    WipQuery, WipUnit, ALL,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, Value};

/// Unit predicates of the per-MO quantity queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitQty {
    NotInput,
    Link,
    NotLink,
    Transfer,
}

impl UnitQty {
    fn condition(&self) -> &'static str {
        match self {
            UnitQty::NotInput => "is_input = 0",
            UnitQty::Link => "is_input = 1 AND is_linked = 1",
            UnitQty::NotLink => "is_input = 1 AND is_linked = 0",
            UnitQty::Transfer => "transfer_mo_number IS NOT NULL AND transfer_mo_number <> ''",
        }
    }
}

/// Aggregated quantity of one MO (or MO and line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QtyRow {
    pub mo_number: String,
    pub line_name: Option<String>,
    pub qty: i64,
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Select list and GROUP BY of the unit aggregates.
fn unit_grouping(is_show_line: bool) -> (&'static str, &'static str) {
    if is_show_line {
        ("mo_number, line_name", "mo_number, line_name")
    } else {
        ("mo_number, NULL AS line_name", "mo_number")
    }
}

async fn distinct_strings<C: ConnectionTrait>(
    conn: &C,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<String>> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values))
        .await
        .with_context(|| format!("Lookup failed: {}", sql))?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "value").map_err(Into::into))
        .collect()
}

pub async fn distinct_mo_types<C: ConnectionTrait>(conn: &C) -> Result<Vec<String>> {
    distinct_strings(
        conn,
        "SELECT DISTINCT mo_type AS value FROM mes_mo WHERE mo_type <> '' ORDER BY value",
        vec![],
    )
    .await
}

pub async fn distinct_models<C: ConnectionTrait>(conn: &C) -> Result<Vec<String>> {
    distinct_strings(
        conn,
        "SELECT DISTINCT model_name AS value FROM mes_mo ORDER BY value",
        vec![],
    )
    .await
}

/// Online MOs of a model; `ALL` returns every online MO.
pub async fn online_mos_by_model<C: ConnectionTrait>(
    conn: &C,
    model_name: &str,
) -> Result<Vec<String>> {
    let online = MoStatus::Online.code();
    if is_all(model_name) {
        distinct_strings(
            conn,
            "SELECT DISTINCT mo_number AS value FROM mes_mo WHERE status = ? ORDER BY value",
            vec![online.into()],
        )
        .await
    } else {
        distinct_strings(
            conn,
            "SELECT DISTINCT mo_number AS value FROM mes_mo
             WHERE status = ? AND model_name = ? ORDER BY value",
            vec![online.into(), model_name.into()],
        )
        .await
    }
}

pub async fn distinct_lines<C: ConnectionTrait>(conn: &C) -> Result<Vec<String>> {
    distinct_strings(
        conn,
        "SELECT DISTINCT line_name AS value FROM mes_mo_line ORDER BY value",
        vec![],
    )
    .await
}

pub async fn distinct_sections<C: ConnectionTrait>(conn: &C) -> Result<Vec<String>> {
    distinct_strings(
        conn,
        "SELECT DISTINCT section_name AS value FROM mes_wip_step
         WHERE section_name <> '' ORDER BY value",
        vec![],
    )
    .await
}

/// Base rows: one per MO, or one per MO and planned line in line mode.
pub async fn query_mos<C: ConnectionTrait>(conn: &C, query: &WipQuery) -> Result<Vec<MoRow>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if !is_all(&query.mo_type) {
        conditions.push("m.mo_type = ?".into());
        values.push(query.mo_type.clone().into());
    }
    if !is_all(&query.model_name) {
        conditions.push("m.model_name = ?".into());
        values.push(query.model_name.clone().into());
    }
    if !is_all(&query.mo_number) {
        conditions.push("m.mo_number = ?".into());
        values.push(query.mo_number.clone().into());
    }
    if query.status != MoStatus::All {
        conditions.push("m.status = ?".into());
        values.push(query.status.code().into());
    }

    let lines_in = placeholders(query.lines.len());
    let sql = if query.is_show_line {
        if !query.lines.is_empty() {
            conditions.push(format!("l.line_name IN ({})", lines_in));
            values.extend(query.lines.iter().map(|l| Value::from(l.clone())));
        }
        format!(
            "SELECT m.mo_number, m.model_name, l.line_name, l.target_qty, m.device_config
             FROM mes_mo m JOIN mes_mo_line l ON l.mo_number = m.mo_number
             {} ORDER BY m.mo_number, l.line_name",
            where_clause(&conditions)
        )
    } else {
        if !query.lines.is_empty() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM mes_mo_line l WHERE l.mo_number = m.mo_number AND l.line_name IN ({}))",
                lines_in
            ));
            values.extend(query.lines.iter().map(|l| Value::from(l.clone())));
        }
        format!(
            "SELECT m.mo_number, m.model_name, NULL AS line_name, m.target_qty, m.device_config
             FROM mes_mo m {} ORDER BY m.mo_number",
            where_clause(&conditions)
        )
    };

    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await
        .context("Failed to query MOs")?;

    rows.iter()
        .map(|row| -> Result<MoRow> {
            Ok(MoRow {
                mo_number: row.try_get("", "mo_number")?,
                model_name: row.try_get("", "model_name")?,
                line_name: row.try_get("", "line_name")?,
                target_qty: row.try_get("", "target_qty")?,
                device_config: row.try_get("", "device_config")?,
            })
        })
        .collect()
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// WIP steps of the selected section ordered by step sequence.
pub async fn query_wip_groups<C: ConnectionTrait>(
    conn: &C,
    query: &WipQuery,
) -> Result<Vec<WipGroupDef>> {
    let statement = if is_all(&query.section_name) {
        Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT wip_group, step_sequence FROM mes_wip_step ORDER BY step_sequence, wip_group"
                .to_string(),
        )
    } else {
        Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT wip_group, step_sequence FROM mes_wip_step
             WHERE section_name = ? ORDER BY step_sequence, wip_group",
            [query.section_name.clone().into()],
        )
    };

    let rows = conn
        .query_all(statement)
        .await
        .context("Failed to query WIP steps")?;
    rows.iter()
        .map(|row| -> Result<WipGroupDef> {
            Ok(WipGroupDef {
                wip_group: row.try_get("", "wip_group")?,
                step_sequence: row.try_get("", "step_sequence")?,
            })
        })
        .collect()
}

pub async fn unit_qty<C: ConnectionTrait>(
    conn: &C,
    request: &MoQtyRequest,
    kind: UnitQty,
) -> Result<Vec<QtyRow>> {
    if request.mos.is_empty() {
        return Ok(Vec::new());
    }

    let (select, group) = unit_grouping(request.is_show_line);
    let sql = format!(
        "SELECT {select}, COUNT(*) AS qty FROM mes_wip_unit
         WHERE mo_number IN ({mos}) AND {cond}
         GROUP BY {group} ORDER BY {group}",
        select = select,
        mos = placeholders(request.mos.len()),
        cond = kind.condition(),
        group = group,
    );
    let values: Vec<Value> = request.mos.iter().map(|m| Value::from(m.clone())).collect();

    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await
        .with_context(|| format!("Failed to query {:?} quantities", kind))?;
    rows.iter()
        .map(|row| -> Result<QtyRow> {
            Ok(QtyRow {
                mo_number: row.try_get("", "mo_number")?,
                line_name: row.try_get("", "line_name")?,
                qty: row.try_get("", "qty")?,
            })
        })
        .collect()
}

/// Input units per MO (and line) and WIP group.
pub async fn wip_counts<C: ConnectionTrait>(
    conn: &C,
    request: &WipCountsRequest,
) -> Result<Vec<WipCount>> {
    if request.mos.is_empty() {
        return Ok(Vec::new());
    }

    let (select, group) = unit_grouping(request.is_show_line);
    let mut values: Vec<Value> = request.mos.iter().map(|m| Value::from(m.clone())).collect();
    let line_filter = if request.lines.is_empty() {
        String::new()
    } else {
        values.extend(request.lines.iter().map(|l| Value::from(l.clone())));
        format!("AND line_name IN ({})", placeholders(request.lines.len()))
    };

    let sql = format!(
        "SELECT {select}, wip_group, COUNT(*) AS cnt FROM mes_wip_unit
         WHERE is_input = 1 AND mo_number IN ({mos}) {line_filter}
         GROUP BY {group}, wip_group ORDER BY {group}, wip_group",
        select = select,
        mos = placeholders(request.mos.len()),
        line_filter = line_filter,
        group = group,
    );

    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await
        .context("Failed to query WIP counts")?;
    rows.iter()
        .map(|row| -> Result<WipCount> {
            Ok(WipCount {
                mo_number: row.try_get("", "mo_number")?,
                line_name: row.try_get("", "line_name")?,
                wip_group: row.try_get("", "wip_group")?,
                count: row.try_get("", "cnt")?,
            })
        })
        .collect()
}

/// Input units behind one WIP cell, under the same line filter as `wip_counts`.
pub async fn wip_units<C: ConnectionTrait>(
    conn: &C,
    request: &WipDetailRequest,
) -> Result<Vec<WipUnit>> {
    let target = &request.target;
    let mut sql = String::from(
        "SELECT serial_number, mo_number, line_name, wip_group, station_name, in_station_time
         FROM mes_wip_unit WHERE is_input = 1 AND mo_number = ? AND wip_group = ?",
    );
    let mut values: Vec<Value> = vec![target.mo_number.clone().into(), target.wip_group.clone().into()];
    if let Some(line) = &target.line_name {
        sql.push_str(" AND line_name = ?");
        values.push(line.clone().into());
    }
    if !request.lines.is_empty() {
        sql.push_str(&format!(" AND line_name IN ({})", placeholders(request.lines.len())));
        values.extend(request.lines.iter().map(|l| Value::from(l.clone())));
    }
    sql.push_str(" ORDER BY in_station_time, serial_number");

    let rows = conn
        .query_all(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await
        .context("Failed to query WIP units")?;
    rows.iter()
        .map(|row| -> Result<WipUnit> {
            Ok(WipUnit {
                serial_number: row.try_get("", "serial_number")?,
                mo_number: row.try_get("", "mo_number")?,
                line_name: row.try_get("", "line_name")?,
                wip_group: row.try_get("", "wip_group")?,
                station_name: row.try_get("", "station_name")?,
                in_station_time: row.try_get("", "in_station_time")?,
            })
        })
        .collect()
}
