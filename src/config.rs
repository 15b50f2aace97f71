// ==========================================
// CSV 归档批量入库工具 - 数据库连接配置
// ==========================================
// 职责: 启动时一次性读取连接参数，之后只读
// 来源: 进程环境变量 USERNAME / PASSWORD / HOST / PORT / DATABASE
// ==========================================

use crate::error::{ImportError, ImportResult};
use postgres::{Client, Config, NoTls};

// ==========================================
// DbConfig - 连接描述符（连接工厂）
// ==========================================

/// 数据库连接参数，启动时读取一次，整个运行期不可变
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DbConfig {
    /// 从进程环境变量读取连接参数
    ///
    /// # 环境变量（全部必填，无默认值）
    /// - USERNAME / PASSWORD / HOST / PORT / DATABASE
    pub fn from_env() -> ImportResult<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// 从注入的查找函数读取连接参数（测试无需改动进程环境）
    pub fn from_source<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> ImportResult<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ImportError::MissingConfig(key.to_string()))
        };

        let port_raw = require("PORT")?;
        let port: u16 = port_raw.parse().map_err(|e| ImportError::InvalidConfig {
            key: "PORT".to_string(),
            value: port_raw.clone(),
            message: format!("端口号解析失败: {}", e),
        })?;

        Ok(Self {
            username: require("USERNAME")?,
            password: require("PASSWORD")?,
            host: require("HOST")?,
            port,
            database: require("DATABASE")?,
        })
    }

    /// 打开一个新的数据库连接
    ///
    /// 每个文件写入时获取一次，作用域结束即释放
    pub fn connect(&self) -> ImportResult<Client> {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.username)
            .password(&self.password)
            .dbname(&self.database);

        config
            .connect(NoTls)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))
    }
}
