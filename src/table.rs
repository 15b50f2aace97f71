// ==========================================
// CSV 归档批量入库工具 - 内存表模型
// ==========================================
// 职责: 单个 CSV 文件解析后的列式内存表示
// 生命周期: 解析创建 -> 可选去重 -> 写库后丢弃
// ==========================================

use chrono::NaiveDateTime;
use std::hash::{Hash, Hasher};

// ==========================================
// Value - 单元格值
// ==========================================

/// 单元格值（列内类型一致，空单元格为 Null）
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// 对应的 PostgreSQL 列类型
    pub fn sql_type(&self) -> Option<&'static str> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some("BIGINT"),
            Value::Float(_) => Some("DOUBLE PRECISION"),
            Value::Text(_) => Some("TEXT"),
            Value::Timestamp(_) => Some("TIMESTAMP"),
        }
    }
}

// 手动实现 Eq/Hash: 浮点数按位模式参与去重键比较
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Float(v) => {
                2u8.hash(state);
                v.to_bits().hash(state);
            }
            Value::Text(v) => {
                3u8.hash(state);
                v.hash(state);
            }
            Value::Timestamp(v) => {
                4u8.hash(state);
                v.hash(state);
            }
        }
    }
}

// ==========================================
// Column - 命名列
// ==========================================

/// 命名列，每行一个值
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    /// 列的 PostgreSQL 类型（取首个非空值；全空列按 TEXT 处理）
    pub fn sql_type(&self) -> &'static str {
        self.values
            .iter()
            .find_map(Value::sql_type)
            .unwrap_or("TEXT")
    }
}

// ==========================================
// DataTable - 内存表
// ==========================================

/// 有序列集合，各列按行位置对齐
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<Column>,
}

impl DataTable {
    /// 行数
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// 列数
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// 形状 (行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// 按列名查找列下标
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// 按列名取列
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// 取一行（各列同一下标的值，克隆）
    pub fn row(&self, idx: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.values[idx].clone()).collect()
    }

    /// 按行下标筛选，保持给定顺序
    pub fn select_rows(&self, indices: &[usize]) -> DataTable {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        DataTable { columns }
    }
}
