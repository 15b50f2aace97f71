// ==========================================
// CSV 归档批量入库工具 - 核心库
// ==========================================
// 技术栈: Rust + PostgreSQL
// 系统定位: 一次性批处理导入，运行完成即退出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 配置层 - 连接参数
pub mod config;

// 文件发现
pub mod discovery;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// 编排层 - 导入主流程
pub mod orchestrator;

// 读取层 - CSV 解析与类型推断
pub mod reader;

// 内存表模型
pub mod table;

// 转换层 - 按表名分发的去重规则
pub mod transform;

// 写入层 - 替换式写库
pub mod writer;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::DbConfig;
pub use error::{ImportError, ImportResult};
pub use orchestrator::{run_import, table_name_for, ImportSummary};
pub use table::{Column, DataTable, Value};
pub use transform::DedupRule;

/// 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
