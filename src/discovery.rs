// ==========================================
// CSV 归档批量入库工具 - 文件发现
// ==========================================
// 职责: 递归枚举根目录下所有 .csv 文件
// 约定: 顺序不保证; 目录不存在视为"无文件可导入"
// ==========================================

use glob::glob;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 递归列出根目录下所有 .csv 文件路径
///
/// # 参数
/// - root: 归档根目录
///
/// # 返回
/// 匹配的文件路径列表；目录不存在或不可读时返回空列表
pub fn list_csv_files(root: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*.csv", root.display());

    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(pattern = %pattern, "glob 模式无效: {}", e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("跳过不可读条目: {}", e);
                None
            }
        })
        .collect()
}
