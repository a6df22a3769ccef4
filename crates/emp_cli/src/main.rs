//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `emp_core` linkage, logging and schema bootstrap without external setup.
//! - Keep stdout deterministic for quick local sanity checks.

use emp_core::db::open_db_in_memory;
use emp_core::{default_log_level, init_logging, EmpListQuery, EmpService, SqliteEmpRepository};
use std::error::Error;

const LOG_DIR_NAME: &str = "emp_cli_logs";

fn main() -> Result<(), Box<dyn Error>> {
    let log_path = std::env::temp_dir().join(LOG_DIR_NAME);
    let log_dir = log_path.to_str().ok_or("temp log dir is not valid UTF-8")?;
    init_logging(default_log_level(), log_dir)?;

    println!("emp_core ping={}", emp_core::ping());
    println!("emp_core version={}", emp_core::core_version());

    let conn = open_db_in_memory()?;
    let service = EmpService::new(SqliteEmpRepository::try_new(&conn)?);
    let rows = service.search(&EmpListQuery::default())?;
    println!("emp_core bootstrap=ok rows={}", rows.len());

    Ok(())
}
