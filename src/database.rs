// ============================================================================
// 数据库模块：SQLite 持久化层
// 使用 rusqlite 直接操作 SQLite，遵循 KISS 原则，不引入 ORM
// 只提供两类存储：键值表（简历记录、草稿）和设置表
// ============================================================================

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::services::storage::KeyValueStore;
use crate::utils::error::{AppError, AppResult};

/// 数据库文件名
pub const DB_FILE_NAME: &str = "resume_studio.db";

/// 设置键：草稿自动保存延迟（毫秒）
pub const SETTING_AUTOSAVE_DELAY: &str = "autosave_delay_ms";

/// 设置键：默认导出目录
pub const SETTING_DEFAULT_EXPORT_DIR: &str = "default_export_dir";

/// 草稿自动保存默认延迟（毫秒）
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1500;

// ============================================================================
// 数据结构定义
// ============================================================================

/// 应用设置
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppSettings {
    pub autosave_delay_ms: u64,
    pub default_export_dir: Option<String>,
    pub db_path: String,
}

// ============================================================================
// 数据库管理器
// ============================================================================

/// 数据库管理器，封装 rusqlite 连接
pub struct Database {
    /// SQLite 数据库连接
    conn: Connection,
}

impl Database {
    /// 初始化数据库：在指定目录创建数据库文件并建表
    ///
    /// # 参数
    /// - `app_data_dir`: 应用数据目录路径（Tauri app_data_dir）
    ///
    /// # 返回
    /// - `Ok(Database)`: 初始化成功，返回数据库实例
    /// - `Err(AppError)`: 初始化失败，携带中文错误描述
    pub fn init(app_data_dir: &Path) -> AppResult<Self> {
        // 确保数据目录存在
        std::fs::create_dir_all(app_data_dir).map_err(|e| {
            AppError::DatabaseError(format!(
                "数据库初始化失败：无法创建数据目录 {}: {}",
                app_data_dir.display(),
                e
            ))
        })?;

        // 在数据目录下创建/打开数据库文件
        let db_path = app_data_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path).map_err(|e| {
            AppError::DatabaseError(format!(
                "数据库初始化失败：无法打开数据库文件 {}: {}",
                db_path.display(),
                e
            ))
        })?;

        Self::create_tables(&conn)?;

        log::info!("数据库已就绪: {}", db_path.display());
        Ok(Database { conn })
    }

    /// 打开内存数据库（测试和临时会话使用）
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            AppError::DatabaseError(format!("数据库初始化失败：无法打开内存数据库: {}", e))
        })?;
        Self::create_tables(&conn)?;
        Ok(Database { conn })
    }

    /// 创建所有数据库表（如果不存在）
    ///
    /// kv_store：简历记录列表与草稿，值为 JSON 字符串
    /// settings：应用设置键值对
    fn create_tables(conn: &Connection) -> AppResult<()> {
        conn.execute_batch(
            "
            -- 键值存储表
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- 设置表（键值对）
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| AppError::DatabaseError(format!("数据库初始化失败：创建表结构时出错: {}", e)))?;

        Ok(())
    }

    /// 获取数据库连接的引用
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// 数据库文件路径（内存数据库返回空字符串）
    pub fn path(&self) -> String {
        self.conn.path().map(|p| p.to_string()).unwrap_or_default()
    }

    // ========================================================================
    // 设置方法
    // ========================================================================

    /// 获取应用设置
    ///
    /// 自动保存延迟缺失、非数字或为 0 时使用默认值 1500ms。
    pub fn get_settings(&self) -> AppResult<AppSettings> {
        let autosave_delay_ms = self
            .get_setting(SETTING_AUTOSAVE_DELAY)?
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS);

        let default_export_dir = self
            .get_setting(SETTING_DEFAULT_EXPORT_DIR)?
            .filter(|v| !v.trim().is_empty());

        Ok(AppSettings {
            autosave_delay_ms,
            default_export_dir,
            db_path: self.path(),
        })
    }

    /// 读取单个设置项，不存在时返回 None
    pub fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("读取设置失败：{}", e)))
    }

    /// 保存单个设置项（键值对）
    ///
    /// 使用 INSERT OR REPLACE 实现 upsert 语义。
    pub fn save_setting(&self, key: &str, value: &str) -> AppResult<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| AppError::DatabaseError(format!("保存设置失败：{}", e)))?;

        Ok(())
    }
}

// ============================================================================
// 键值存储实现
// ============================================================================

impl KeyValueStore for Database {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("读取本地数据失败：{}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![key, value],
            )
            .map_err(|e| AppError::DatabaseError(format!("写入本地数据失败：{}", e)))?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| AppError::DatabaseError(format!("删除本地数据失败：{}", e)))?;

        Ok(())
    }
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    /// 测试数据库初始化：创建文件和所有表
    #[test]
    fn test_database_init_creates_file_and_tables() {
        let dir = TempDir::new().unwrap();
        let db = Database::init(dir.path()).unwrap();

        assert!(dir.path().join(DB_FILE_NAME).exists());

        let table_names: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(table_names, vec!["kv_store".to_string(), "settings".to_string()]);
    }

    /// 测试数据库初始化：重复初始化不会报错（CREATE TABLE IF NOT EXISTS）
    #[test]
    fn test_database_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let db1 = Database::init(dir.path()).unwrap();
        db1.set_item("k", "v").unwrap();
        drop(db1);

        let db2 = Database::init(dir.path()).unwrap();
        assert_eq!(db2.get_item("k").unwrap().as_deref(), Some("v"));
    }

    /// 测试数据库初始化：自动创建不存在的目录
    #[test]
    fn test_database_init_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested_path = dir.path().join("nested").join("deep").join("data");

        Database::init(&nested_path).unwrap();
        assert!(nested_path.join(DB_FILE_NAME).exists());
    }

    #[test]
    fn test_kv_store_get_set_remove() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.get_item("missing").unwrap(), None);

        db.set_item("a", "1").unwrap();
        db.set_item("a", "2").unwrap();
        assert_eq!(db.get_item("a").unwrap().as_deref(), Some("2"));

        db.remove_item("a").unwrap();
        assert_eq!(db.get_item("a").unwrap(), None);
        // 删除不存在的键不报错
        db.remove_item("a").unwrap();
    }

    #[test]
    fn test_get_settings_default() {
        let db = Database::in_memory().unwrap();
        let settings = db.get_settings().unwrap();
        assert_eq!(settings.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        assert_eq!(settings.default_export_dir, None);
    }

    #[test]
    fn test_invalid_autosave_delay_falls_back() {
        let db = Database::in_memory().unwrap();
        for bad in ["abc", "0", "-5", ""] {
            db.save_setting(SETTING_AUTOSAVE_DELAY, bad).unwrap();
            assert_eq!(db.get_settings().unwrap().autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        }
        db.save_setting(SETTING_AUTOSAVE_DELAY, " 800 ").unwrap();
        assert_eq!(db.get_settings().unwrap().autosave_delay_ms, 800);
    }

    #[test]
    fn test_settings_path_reported() {
        let dir = TempDir::new().unwrap();
        let db = Database::init(dir.path()).unwrap();
        let settings = db.get_settings().unwrap();
        assert!(settings.db_path.ends_with(DB_FILE_NAME));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// 设置保存后读取应一致，再次保存应覆盖
        #[test]
        fn prop_settings_round_trip(
            value1 in "[a-zA-Z0-9_/\\-]{1,100}",
            value2 in "[a-zA-Z0-9_/\\-]{1,100}",
        ) {
            let db = Database::in_memory().unwrap();

            db.save_setting(SETTING_DEFAULT_EXPORT_DIR, &value1).unwrap();
            let settings = db.get_settings().unwrap();
            prop_assert_eq!(settings.default_export_dir.as_deref(), Some(value1.as_str()));

            db.save_setting(SETTING_DEFAULT_EXPORT_DIR, &value2).unwrap();
            let settings = db.get_settings().unwrap();
            prop_assert_eq!(settings.default_export_dir.as_deref(), Some(value2.as_str()));
        }

        /// 重新打开数据库后键值数据保持不变
        #[test]
        fn prop_kv_persistence_across_restarts(
            entries in prop::collection::btree_map("[a-z:]{1,20}", "\\PC{0,50}", 1..5),
        ) {
            let dir = TempDir::new().unwrap();
            {
                let db = Database::init(dir.path()).unwrap();
                for (k, v) in &entries {
                    db.set_item(k, v).unwrap();
                }
            }
            let db = Database::init(dir.path()).unwrap();
            for (k, v) in &entries {
                let got = db.get_item(k).unwrap();
                prop_assert_eq!(got.as_deref(), Some(v.as_str()));
            }
        }
    }
}
