// ==========================================
// CSV 归档批量入库工具 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入流程错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 配置错误 =====
    #[error("缺少环境变量配置: {0}")]
    MissingConfig(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidConfig {
        key: String,
        value: String,
        message: String,
    },

    // ===== 文件解析错误 =====
    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("表头缺失或为空: {0}")]
    EmptyHeader(String),

    // ===== 数据转换错误 =====
    #[error("去重键列缺失 (表 {table}): 找不到列 {column}")]
    MissingKeyColumn { table: String, column: String },

    #[error("时间戳转换失败 (表 {table}, 列 {column}): 无法转换值 {value}")]
    TimestampConversion {
        table: String,
        column: String,
        value: String,
    },

    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库写入失败: {0}")]
    DatabaseWriteError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => ImportError::FileReadError(err.to_string()),
            _ => ImportError::CsvParseError(err.to_string()),
        }
    }
}

// 实现 From<postgres::Error>
// 连接阶段的错误由 config::DbConfig::connect 单独映射为 DatabaseConnectionError
impl From<postgres::Error> for ImportError {
    fn from(err: postgres::Error) -> Self {
        ImportError::DatabaseWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
