// ==========================================
// CSV 归档批量入库工具 - 去重转换
// ==========================================
// 职责: 按表名分发去重规则（同键保留文件顺序中最后一次出现）
// 结构: 表名 -> 规则 的注册表，便于后续追加规则
// ==========================================

use crate::error::{ImportError, ImportResult};
use crate::table::{DataTable, Value};
use chrono::DateTime;
use std::collections::HashMap;

// ==========================================
// DedupRule - 单表去重规则
// ==========================================

/// 单表去重规则
///
/// - key_columns: 去重键列（同键保留最后一行）
/// - epoch_column: 去重前需先从秒级时间戳整数转为时间值的列
#[derive(Debug)]
pub struct DedupRule {
    pub table: &'static str,
    pub key_columns: &'static [&'static str],
    pub epoch_column: Option<&'static str>,
}

/// 去重规则注册表（表名精确匹配；未命中即原样透传）
const DEDUP_RULES: &[DedupRule] = &[
    DedupRule {
        table: "employee_counts",
        key_columns: &["company_id", "time_recorded"],
        epoch_column: Some("time_recorded"),
    },
    DedupRule {
        table: "company_specialities",
        key_columns: &["company_id", "speciality"],
        epoch_column: None,
    },
    DedupRule {
        table: "company_industries",
        key_columns: &["company_id", "industry"],
        epoch_column: None,
    },
];

/// 按表名查找去重规则
pub fn rule_for(table_name: &str) -> Option<&'static DedupRule> {
    DEDUP_RULES.iter().find(|r| r.table == table_name)
}

/// 对内存表应用表名对应的去重规则
///
/// 未注册的表名不做任何修改。保留的行按原文件顺序压实。
pub fn apply(table_name: &str, table: DataTable) -> ImportResult<DataTable> {
    let Some(rule) = rule_for(table_name) else {
        return Ok(table);
    };

    let mut table = table;
    if let Some(column) = rule.epoch_column {
        convert_epoch_column(&mut table, table_name, column)?;
    }

    let key_indices: Vec<usize> = rule
        .key_columns
        .iter()
        .map(|&column| {
            table
                .column_index(column)
                .ok_or_else(|| ImportError::MissingKeyColumn {
                    table: table_name.to_string(),
                    column: column.to_string(),
                })
        })
        .collect::<ImportResult<_>>()?;

    // 逐行构造键元组，记录每个键最后一次出现的行号
    let n_rows = table.n_rows();
    let keys: Vec<Vec<Value>> = (0..n_rows)
        .map(|i| {
            key_indices
                .iter()
                .map(|&j| table.columns[j].values[i].clone())
                .collect()
        })
        .collect();

    let mut last_seen: HashMap<&Vec<Value>, usize> = HashMap::with_capacity(n_rows);
    for (i, key) in keys.iter().enumerate() {
        last_seen.insert(key, i);
    }

    let keep: Vec<usize> = (0..n_rows).filter(|i| last_seen[&keys[*i]] == *i).collect();
    if keep.len() == n_rows {
        return Ok(table);
    }

    Ok(table.select_rows(&keep))
}

/// 将指定列从秒级时间戳重新解释为秒精度时间值
///
/// 整数直接转换；浮点数四舍五入到秒后转换；已是时间值则原样保留
/// （保证转换幂等）；空值保持空；文本无法转换，报错。
fn convert_epoch_column(
    table: &mut DataTable,
    table_name: &str,
    column: &str,
) -> ImportResult<()> {
    let col_idx = table
        .column_index(column)
        .ok_or_else(|| ImportError::MissingKeyColumn {
            table: table_name.to_string(),
            column: column.to_string(),
        })?;

    let conversion_error = |value: &Value| ImportError::TimestampConversion {
        table: table_name.to_string(),
        column: column.to_string(),
        value: format!("{:?}", value),
    };

    let values = &mut table.columns[col_idx].values;
    for value in values.iter_mut() {
        let secs = match value {
            Value::Int(secs) => *secs,
            Value::Float(secs) if secs.is_finite() => secs.round() as i64,
            Value::Timestamp(_) | Value::Null => continue,
            other => return Err(conversion_error(other)),
        };

        let ts = DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| conversion_error(&Value::Int(secs)))?;
        *value = Value::Timestamp(ts);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use chrono::DateTime;

    fn table_of(columns: Vec<(&str, Vec<Value>)>) -> DataTable {
        DataTable {
            columns: columns
                .into_iter()
                .map(|(name, values)| Column {
                    name: name.to_string(),
                    values,
                })
                .collect(),
        }
    }

    fn text(v: &str) -> Value {
        Value::Text(v.to_string())
    }

    fn ts(epoch: i64) -> Value {
        Value::Timestamp(DateTime::from_timestamp(epoch, 0).unwrap().naive_utc())
    }

    #[test]
    fn test_unknown_table_is_identity() {
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1), Value::Int(1)]),
            ("name", vec![text("a"), text("a")]),
        ]);
        let result = apply("companies", table.clone()).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_company_specialities_keep_last() {
        // (1,"ai"), (1,"ai"), (2,"web") -> (1,"ai"), (2,"web")
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1), Value::Int(1), Value::Int(2)]),
            ("speciality", vec![text("ai"), text("ai"), text("web")]),
        ]);
        let result = apply("company_specialities", table).unwrap();

        assert_eq!(result.shape(), (2, 2));
        assert_eq!(result.columns[0].values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(result.columns[1].values, vec![text("ai"), text("web")]);
    }

    #[test]
    fn test_company_industries_keeps_latest_occurrence() {
        // 同键行中保留文件顺序里最靠后的那一行（其余列取该行的值）
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1), Value::Int(2), Value::Int(1)]),
            ("industry", vec![text("ai"), text("web"), text("ai")]),
            ("note", vec![text("old"), text("keep"), text("new")]),
        ]);
        let result = apply("company_industries", table).unwrap();

        assert_eq!(result.shape(), (2, 3));
        // (1,"ai") 的首行被丢弃，保留行按原始顺序压实
        assert_eq!(result.columns[0].values, vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(result.columns[2].values, vec![text("keep"), text("new")]);
    }

    #[test]
    fn test_employee_counts_epoch_and_dedup() {
        // (1,1000), (1,1000), (2,2000) -> (1,ts(1000)), (2,ts(2000))
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1), Value::Int(1), Value::Int(2)]),
            (
                "time_recorded",
                vec![Value::Int(1000), Value::Int(1000), Value::Int(2000)],
            ),
        ]);
        let result = apply("employee_counts", table).unwrap();

        assert_eq!(result.shape(), (2, 2));
        assert_eq!(result.columns[0].values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(result.columns[1].values, vec![ts(1000), ts(2000)]);
    }

    #[test]
    fn test_employee_counts_is_idempotent() {
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1), Value::Int(1), Value::Int(2)]),
            (
                "time_recorded",
                vec![Value::Int(1000), Value::Int(1000), Value::Int(2000)],
            ),
        ]);
        let once = apply("employee_counts", table).unwrap();
        let twice = apply("employee_counts", once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_float_epoch_rounded_to_second() {
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1)]),
            ("time_recorded", vec![Value::Float(1000.6)]),
        ]);
        let result = apply("employee_counts", table).unwrap();
        assert_eq!(result.columns[1].values, vec![ts(1001)]);
    }

    #[test]
    fn test_null_key_values_participate_in_dedup() {
        let table = table_of(vec![
            ("company_id", vec![Value::Null, Value::Null, Value::Int(1)]),
            ("industry", vec![text("ai"), text("ai"), text("ai")]),
        ]);
        let result = apply("company_industries", table).unwrap();
        assert_eq!(result.shape(), (2, 2));
    }

    #[test]
    fn test_missing_key_column_is_error() {
        let table = table_of(vec![("company_id", vec![Value::Int(1)])]);
        let result = apply("company_specialities", table);
        assert!(matches!(
            result,
            Err(ImportError::MissingKeyColumn { table, column })
                if table == "company_specialities" && column == "speciality"
        ));
    }

    #[test]
    fn test_text_epoch_value_is_error() {
        let table = table_of(vec![
            ("company_id", vec![Value::Int(1)]),
            ("time_recorded", vec![text("yesterday")]),
        ]);
        let result = apply("employee_counts", table);
        assert!(matches!(
            result,
            Err(ImportError::TimestampConversion { column, .. }) if column == "time_recorded"
        ));
    }
}
