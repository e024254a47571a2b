use anyhow::Result;

use crate::shared::data::{db::get_connection, seed};

/// Seed the demo plant into an empty database.
pub async fn ensure_demo_data() -> Result<()> {
    let conn = get_connection()?;
    if seed::seed_demo(conn).await? {
        tracing::info!("Demo data inserted");
    } else {
        tracing::info!("Database already has data, demo seed skipped");
    }
    Ok(())
}
