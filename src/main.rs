// ==========================================
// CSV 归档批量入库工具 - 主入口
// ==========================================
// 用法: archive-importer [归档根目录]
// 环境: USERNAME / PASSWORD / HOST / PORT / DATABASE (必填)
// ==========================================

use archive_importer::{logging, run_import, DbConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// 默认归档根目录
const DEFAULT_ROOT: &str = "archive";

fn main() {
    // 初始化日志系统
    logging::init();

    info!("==================================================");
    info!("CSV 归档批量入库工具");
    info!("版本: {}", archive_importer::VERSION);
    info!("==================================================");

    // 先加载连接配置: 配置缺失时在读取任何文件之前即失败
    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("配置加载失败: {}", e);
            std::process::exit(1);
        }
    };

    // 归档根目录: 第一个命令行参数，缺省为 archive
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));

    match run_import(&root, &config) {
        Ok(summary) => {
            info!(
                files = summary.files_total,
                tables = summary.tables_written,
                rows = summary.rows_written,
                "导入完成"
            );
        }
        Err(e) => {
            error!("导入中止: {}", e);
            std::process::exit(1);
        }
    }
}
