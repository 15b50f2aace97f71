// ==========================================
// CSV 归档批量入库工具 - 导入编排器
// ==========================================
// 流程: 文件发现 -> 逐文件(读取 -> 去重 -> 写入) -> 进度上报
// 约定: 串行处理; 任一文件失败即中止整个运行
// ==========================================

use crate::config::DbConfig;
use crate::error::ImportResult;
use crate::{discovery, reader, transform, writer};
use std::path::Path;
use tracing::info;

// ==========================================
// ImportSummary - 运行结果汇总
// ==========================================

/// 一次运行的汇总统计
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub files_total: usize,
    pub tables_written: usize,
    pub rows_written: u64,
}

/// 由文件路径推导目标表名（去掉扩展名的文件基名）
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 执行完整导入流程
///
/// # 参数
/// - root: 归档根目录
/// - config: 数据库连接配置（每个文件写入时单独开关连接）
///
/// # 返回
/// 运行汇总；首个错误即中止，已写入的表保持替换后状态
pub fn run_import(root: &Path, config: &DbConfig) -> ImportResult<ImportSummary> {
    let files = discovery::list_csv_files(root);
    info!(root = %root.display(), files = files.len(), "文件发现完成");

    let mut summary = ImportSummary {
        files_total: files.len(),
        ..Default::default()
    };

    for path in &files {
        let table_name = table_name_for(path);
        info!(file = %path.display(), table = %table_name, "开始处理文件");

        let table = reader::read_csv(path)?;
        let before = table.shape();

        let table = transform::apply(&table_name, table)?;
        let after = table.shape();

        if transform::rule_for(&table_name).is_some() {
            info!(
                table = %table_name,
                rows_before = before.0,
                rows_after = after.0,
                cols = after.1,
                "去重完成"
            );
        } else {
            info!(table = %table_name, rows = after.0, cols = after.1, "无去重规则, 原样导入");
        }

        let rows = writer::write_table(config, &table_name, &table)?;
        info!(table = %table_name, rows, "表已重建并完成写入");

        summary.tables_written += 1;
        summary.rows_written += rows;
    }

    Ok(summary)
}
