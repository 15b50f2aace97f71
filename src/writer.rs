// ==========================================
// CSV 归档批量入库工具 - 表写入器
// ==========================================
// 职责: 以"替换"语义将内存表写入目标库
// 策略: 单事务内 DROP TABLE IF EXISTS -> CREATE TABLE -> 分块批量 INSERT
// ==========================================

use crate::config::DbConfig;
use crate::error::ImportResult;
use crate::table::{DataTable, Value};
use bytes::BytesMut;
use chrono::NaiveDateTime;
use pg_escape::quote_identifier;
use postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use std::fmt::Write as _;
use tracing::debug;

/// 每条 INSERT 语句的最大行数（参数总数需低于协议上限 65535）
const INSERT_CHUNK_SIZE: usize = 1000;

// ==========================================
// Value -> SQL 参数绑定
// ==========================================

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Int(v) => v.to_sql(ty, out),
            Value::Float(v) => v.to_sql(ty, out),
            Value::Text(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <i64 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
            || <NaiveDateTime as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

// ==========================================
// SQL 语句构造
// ==========================================

/// 构造建表语句（列类型由内存表逐列推断）
fn build_create_table_sql(table_name: &str, table: &DataTable) -> String {
    let columns_ddl: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), c.sql_type()))
        .collect();

    format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table_name),
        columns_ddl.join(", ")
    )
}

/// 构造多值 INSERT 语句（$n 占位符按行优先连续编号）
fn build_insert_sql(table_name: &str, table: &DataTable, chunk_rows: usize) -> String {
    let col_list = table
        .columns
        .iter()
        .map(|c| quote_identifier(&c.name).into_owned())
        .collect::<Vec<_>>()
        .join(", ");

    let n_cols = table.n_cols();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_identifier(table_name),
        col_list
    );

    for row in 0..chunk_rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..n_cols {
            if col > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "${}", row * n_cols + col + 1);
        }
        sql.push(')');
    }

    sql
}

// ==========================================
// 写入入口
// ==========================================

/// 以替换语义写入目标表，返回写入行数
///
/// # 参数
/// - config: 连接工厂；本次写入独占一个新连接，函数返回即释放
/// - table_name: 目标表名（已有同名表会被整体丢弃重建）
/// - table: 待写入的内存表
pub fn write_table(config: &DbConfig, table_name: &str, table: &DataTable) -> ImportResult<u64> {
    let mut client = config.connect()?;
    let mut tx = client.transaction()?;

    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_identifier(table_name));
    tx.execute(&drop_sql, &[])?;

    let create_sql = build_create_table_sql(table_name, table);
    debug!(table = %table_name, "建表: {}", create_sql);
    tx.execute(&create_sql, &[])?;

    let n_rows = table.n_rows();
    let mut written: u64 = 0;

    for chunk_start in (0..n_rows).step_by(INSERT_CHUNK_SIZE) {
        let chunk_end = (chunk_start + INSERT_CHUNK_SIZE).min(n_rows);
        let sql = build_insert_sql(table_name, table, chunk_end - chunk_start);

        let mut params: Vec<&(dyn ToSql + Sync)> =
            Vec::with_capacity((chunk_end - chunk_start) * table.n_cols());
        for row in chunk_start..chunk_end {
            for column in &table.columns {
                params.push(&column.values[row]);
            }
        }

        written += tx.execute(&sql, &params)?;
    }

    tx.commit()?;
    Ok(written)
}
