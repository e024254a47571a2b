//! Small demo plant: two models, three lines, five WIP steps.

use anyhow::Context;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, Value};

struct DemoMo {
    mo_number: &'static str,
    mo_type: &'static str,
    model_name: &'static str,
    device_config: &'static str,
    status: &'static str,
    lines: &'static [(&'static str, i64)],
}

const MOS: &[DemoMo] = &[
    DemoMo {
        mo_number: "MO-24001",
        mo_type: "NORMAL",
        model_name: "AX-100",
        device_config: "CFG-A",
        status: "2",
        lines: &[("SMT-L1", 300), ("SMT-L2", 200)],
    },
    DemoMo {
        mo_number: "MO-24002",
        mo_type: "NORMAL",
        model_name: "AX-100",
        device_config: "CFG-B",
        status: "2",
        lines: &[("SMT-L1", 150)],
    },
    DemoMo {
        mo_number: "MO-24003",
        mo_type: "REWORK",
        model_name: "BX-200",
        device_config: "CFG-A",
        status: "2",
        lines: &[("ASSY-L3", 80)],
    },
    DemoMo {
        mo_number: "MO-23950",
        mo_type: "NORMAL",
        model_name: "BX-200",
        device_config: "CFG-C",
        status: "3",
        lines: &[("ASSY-L3", 120)],
    },
];

const STEPS: &[(&str, i32, &str)] = &[
    ("SMT", 1, "SMT"),
    ("AOI", 2, "SMT"),
    ("DIP", 3, "ASSY"),
    ("ASSY", 4, "ASSY"),
    ("PACK", 5, "PACKING"),
];

const PROGRAMS: &[(&str, &[&str])] = &[
    ("AMBIT_WIP", &["VIEW", "EXPORT"]),
    ("USER_ADMIN", &["VIEW", "ADD", "EDIT", "DELETE", "IMPORT"]),
    ("PMS", &["VIEW", "RELEASE_MO", "CLOSE_MO"]),
];

async fn exec<C: ConnectionTrait>(conn: &C, sql: &str, values: Vec<Value>) -> anyhow::Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        sql,
        values,
    ))
    .await
    .with_context(|| format!("Seed statement failed: {}", sql))?;
    Ok(())
}

async fn is_empty<C: ConnectionTrait>(conn: &C) -> anyhow::Result<bool> {
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM mes_mo".to_string(),
        ))
        .await?;
    let count: i64 = match row {
        Some(row) => row.try_get("", "cnt")?,
        None => 0,
    };
    Ok(count == 0)
}

/// Inserts the demo data set unless `mes_mo` already has rows.
/// Returns whether anything was written.
pub async fn seed_demo<C: ConnectionTrait>(conn: &C) -> anyhow::Result<bool> {
    if !is_empty(conn).await? {
        return Ok(false);
    }

    for mo in MOS {
        let target: i64 = mo.lines.iter().map(|(_, qty)| qty).sum();
        exec(
            conn,
            "INSERT INTO mes_mo (mo_number, mo_type, model_name, target_qty, device_config, status)
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                mo.mo_number.into(),
                mo.mo_type.into(),
                mo.model_name.into(),
                target.into(),
                mo.device_config.into(),
                mo.status.into(),
            ],
        )
        .await?;

        for (line_idx, (line, qty)) in mo.lines.iter().enumerate() {
            exec(
                conn,
                "INSERT INTO mes_mo_line (mo_number, line_name, target_qty) VALUES (?, ?, ?)",
                vec![mo.mo_number.into(), (*line).into(), (*qty).into()],
            )
            .await?;

            // Deterministic spread of units over the steps of each line
            let mut serial = 0usize;
            for (step_idx, (group, _, section)) in STEPS.iter().enumerate() {
                let units = (step_idx + line_idx * 2 + mo.mo_number.len()) % 4 + 1;
                for n in 0..units {
                    serial += 1;
                    let serial_number = format!("{}-{}-{:04}", mo.mo_number, line, serial);
                    let transfer: Option<String> =
                        (group == &"PACK" && n == 0).then(|| "MO-24099".to_string());
                    exec(
                        conn,
                        "INSERT INTO mes_wip_unit
                            (serial_number, mo_number, line_name, wip_group, station_name,
                             in_station_time, is_input, is_linked, transfer_mo_number)
                         VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
                        vec![
                            serial_number.into(),
                            mo.mo_number.into(),
                            (*line).into(),
                            (*group).into(),
                            format!("{}-{}", section, group).into(),
                            format!("2024-05-{:02} 08:{:02}:00", step_idx + 10, n * 7).into(),
                            i32::from(n % 3 != 0).into(),
                            transfer.into(),
                        ],
                    )
                    .await?;
                }
            }

            // Released serial numbers that never entered the line
            for n in 0..(line_idx + 2) {
                exec(
                    conn,
                    "INSERT INTO mes_wip_unit
                        (serial_number, mo_number, line_name, wip_group, is_input)
                     VALUES (?, ?, ?, '', 0)",
                    vec![
                        format!("{}-{}-N{:03}", mo.mo_number, line, n).into(),
                        mo.mo_number.into(),
                        (*line).into(),
                    ],
                )
                .await?;
            }
        }
    }

    for (group, sequence, section) in STEPS {
        exec(
            conn,
            "INSERT INTO mes_wip_step (wip_group, step_sequence, section_name) VALUES (?, ?, ?)",
            vec![(*group).into(), (*sequence).into(), (*section).into()],
        )
        .await?;
    }

    for (program, permissions) in PROGRAMS {
        for permission in *permissions {
            exec(
                conn,
                "INSERT INTO mes_system_program (prg_name, permission) VALUES (?, ?)",
                vec![(*program).into(), (*permission).into()],
            )
            .await?;
        }
    }

    exec(
        conn,
        "INSERT INTO mes_users (emp_no, emp_name, emp_rank, class_name, station_name, emp_pass,
            emp_bc, email, dept_name, quit_date, roles, system_programs, stations)
         VALUES ('A0001', 'Administrator', '9', 'DAY', '', 'Admin@2024', 'Admin#2024',
            'admin@example.com', 'IT', '2000-12-31', '[\"Administrator\"]',
            '[{\"name\":\"USER_ADMIN\",\"permissions\":[\"VIEW\",\"ADD\",\"EDIT\",\"DELETE\",\"IMPORT\"]}]',
            '[]')",
        vec![],
    )
    .await?;

    tracing::info!(
        "Seeded demo data: {} MOs, {} WIP steps, {} system programs",
        MOS.len(),
        STEPS.len(),
        PROGRAMS.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let conn = memory_connection().await.unwrap();
        assert!(seed_demo(&conn).await.unwrap());
        assert!(!seed_demo(&conn).await.unwrap());
        assert!(!is_empty(&conn).await.unwrap());
    }
}
