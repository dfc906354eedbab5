// ============================================================================
// 数据传输对象（DTO）定义
// 本地持久化与前后端通信的数据结构，仅包含字段定义和序列化派生
// ⛔ 禁止：包含复杂的业务逻辑方法
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDocument;
use crate::utils::format::format_time;
use crate::utils::lenient::or_default;

/// 已保存的简历记录：摘要信息 + 完整简历数据
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    /// 更新时间（Unix 毫秒）
    #[serde(default, deserialize_with = "or_default")]
    pub updated_at: i64,
    #[serde(default, deserialize_with = "or_default")]
    pub data: ResumeDocument,
}

/// 简历摘要：列表渲染用，不含正文
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
    /// 本地时间显示文本，如 `2024/1/31 12:00:00`
    pub updated_at_text: String,
}

impl From<&ResumeRecord> for ResumeSummary {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            updated_at: record.updated_at,
            updated_at_text: format_time(record.updated_at),
        }
    }
}

/// 草稿：编辑中未保存内容的唯一快照
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftPayload {
    #[serde(default, deserialize_with = "or_default")]
    pub updated_at: i64,
    /// 正在编辑的简历 ID，未保存过时为空字符串
    #[serde(default, deserialize_with = "or_default")]
    pub current_id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub data: ResumeDocument,
}

/// 草稿元信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftMeta {
    pub updated_at: i64,
    pub current_id: String,
}

/// 保存 / 导入后返回给前端的结果
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SaveResult {
    pub id: String,
    pub title: String,
}

/// 导入元信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportMeta {
    /// 数据来源，目前只有 "json"
    pub source: String,
    pub file_name: Option<String>,
}

/// 导入结果
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImportResult {
    pub resume: ResumeDocument,
    pub meta: ImportMeta,
}

/// 编辑器显示模式
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Edit,
    Preview,
    /// 左右分栏
    #[default]
    Both,
}

/// 草稿操作后展示给用户的提示
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDto {
    pub message: String,
    pub is_error: bool,
}
