// ==========================================
// CSV 归档批量入库工具 - 表格读取器
// ==========================================
// 职责: 将单个 CSV 文件解析为内存表
// 约定: 首行为表头; 逐列推断类型(整数 -> 浮点 -> 文本)
// ==========================================

use crate::error::{ImportError, ImportResult};
use crate::table::{Column, DataTable, Value};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 解析 CSV 文件为内存表
///
/// # 参数
/// - file_path: CSV 文件路径
///
/// # 返回
/// 内存表；表头缺失/为空或文件非法时返回错误
pub fn read_csv(file_path: &Path) -> ImportResult<DataTable> {
    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    // 读取表头
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::EmptyHeader(file_path.display().to_string()));
    }

    // 读取所有数据行（短行右侧补空，跳过完全空白的行）
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<String> = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").trim().to_string())
            .collect();

        if row.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    // 逐列推断类型并构造列
    let columns = headers
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let raw: Vec<&str> = rows.iter().map(|r| r[col_idx].as_str()).collect();
            Column {
                name: name.clone(),
                values: infer_column(&raw),
            }
        })
        .collect();

    Ok(DataTable { columns })
}

/// 推断一列的类型并完成转换
///
/// 规则: 所有非空值可解析为整数 -> Int; 否则可解析为浮点 -> Float;
/// 否则保留为 Text。空单元格一律为 Null。
fn infer_column(raw: &[&str]) -> Vec<Value> {
    let non_empty: Vec<&str> = raw.iter().copied().filter(|v| !v.is_empty()).collect();

    if !non_empty.is_empty() && non_empty.iter().all(|v| v.parse::<i64>().is_ok()) {
        return raw
            .iter()
            .map(|v| {
                if v.is_empty() {
                    Value::Null
                } else {
                    Value::Int(v.parse().unwrap())
                }
            })
            .collect();
    }

    if !non_empty.is_empty() && non_empty.iter().all(|v| v.parse::<f64>().is_ok()) {
        return raw
            .iter()
            .map(|v| {
                if v.is_empty() {
                    Value::Null
                } else {
                    Value::Float(v.parse().unwrap())
                }
            })
            .collect();
    }

    raw.iter()
        .map(|v| {
            if v.is_empty() {
                Value::Null
            } else {
                Value::Text(v.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_read_csv_basic_inference() {
        let file = write_csv("company_id,name,score\n1,alpha,0.5\n2,beta,1.25\n");
        let table = read_csv(file.path()).unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.columns[0].values[0], Value::Int(1));
        assert_eq!(table.columns[1].values[1], Value::Text("beta".to_string()));
        assert_eq!(table.columns[2].values[1], Value::Float(1.25));
    }

    #[test]
    fn test_mixed_int_float_column_becomes_float() {
        let file = write_csv("v\n1\n2.5\n");
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.columns[0].values[0], Value::Float(1.0));
        assert_eq!(table.columns[0].values[1], Value::Float(2.5));
    }

    #[test]
    fn test_numeric_fallback_to_text() {
        let file = write_csv("v\n1\nabc\n3\n");
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.columns[0].values[0], Value::Text("1".to_string()));
        assert_eq!(table.columns[0].values[1], Value::Text("abc".to_string()));
    }

    #[test]
    fn test_empty_cells_become_null() {
        let file = write_csv("company_id,industry\n1,\n2,ai\n");
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.columns[1].values[0], Value::Null);
        assert_eq!(table.columns[1].values[1], Value::Text("ai".to_string()));
        // 含空值不影响整数列推断
        assert_eq!(table.columns[0].values[0], Value::Int(1));
    }

    #[test]
    fn test_skip_blank_rows() {
        let file = write_csv("a,b\n1,x\n,\n2,y\n");
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_short_rows_padded_with_null() {
        let file = write_csv("a,b,c\n1,x\n");
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.shape(), (1, 3));
        assert_eq!(table.columns[2].values[0], Value::Null);
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = write_csv("");
        let result = read_csv(file.path());
        assert!(matches!(result, Err(ImportError::EmptyHeader(_))));
    }

    #[test]
    fn test_file_not_found() {
        let result = read_csv(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileReadError(_))));
    }
}
