// ============================================================================
// 简历本地存储服务
// 只负责读写与最小校验，不做业务层的合并/迁移
// 读路径永不失败：数据缺失或被篡改时返回空列表 / None
// ============================================================================

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::models::dtos::{DraftPayload, ResumeRecord};
use crate::utils::error::{AppError, AppResult};
use crate::utils::lenient::is_truthy;

/// 简历记录列表的存储 key
pub const RECORDS_KEY: &str = "resume-studio:records";

/// 草稿的存储 key
pub const DRAFT_KEY: &str = "resume-studio:draft";

// ============================================================================
// 键值存储 Trait 定义
// ============================================================================

/// 字符串键值存储后端
///
/// 生产环境由 SQLite（`Database`）实现，测试和临时会话使用 `MemoryStore`。
pub trait KeyValueStore: Send {
    /// 读取键对应的值，不存在时返回 `Ok(None)`
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// 写入（覆盖）键值
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// 删除键，键不存在时不报错
    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// 内存键值存储
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::DatabaseError("内存存储访问失败：无法获取锁".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ============================================================================
// 简历存储
// ============================================================================

/// 简历记录与草稿的读写封装
pub struct ResumeStorage {
    kv: Box<dyn KeyValueStore>,
}

impl ResumeStorage {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// 安全读取并解析 JSON，任何失败都返回 None
    fn read_json(&self, key: &str) -> Option<Value> {
        let raw = match self.kv.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("读取本地数据失败 [{}]: {}", key, e);
                return None;
            }
        };
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("本地数据不是合法 JSON [{}]: {}", key, e);
                None
            }
        }
    }

    /// 读取全部简历记录
    ///
    /// key 不存在、数据不是数组时返回空列表；数组中无法识别的元素被跳过。
    pub fn read_records(&self) -> Vec<ResumeRecord> {
        match self.read_json(RECORDS_KEY) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ResumeRecord>(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 覆盖写入全部简历记录
    pub fn write_records(&self, records: &[ResumeRecord]) -> AppResult<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.set_item(RECORDS_KEY, &raw)
    }

    /// 读取草稿
    ///
    /// 只做最基础的结构检查：必须是对象且包含非空的 data 字段。
    pub fn read_draft(&self) -> Option<DraftPayload> {
        let parsed = self.read_json(DRAFT_KEY)?;
        let has_data = parsed.get("data").map(is_truthy).unwrap_or(false);
        if !parsed.is_object() || !has_data {
            return None;
        }
        serde_json::from_value(parsed).ok()
    }

    /// 写入草稿（覆盖上一份）
    pub fn write_draft(&self, payload: &DraftPayload) -> AppResult<()> {
        let raw = serde_json::to_string(payload)?;
        self.kv.set_item(DRAFT_KEY, &raw)
    }

    /// 清理草稿
    pub fn clear_draft(&self) -> AppResult<()> {
        self.kv.remove_item(DRAFT_KEY)
    }
}

// ============================================================================
// 单元测试
// ============================================================================
