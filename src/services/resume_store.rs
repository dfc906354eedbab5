// ============================================================================
// 简历状态管理
// 持有当前编辑中的简历、已保存记录列表和当前简历 ID
// 所有持久化经由 ResumeStorage，所有外部数据经由规范化流程
// ============================================================================

use std::path::{Path, PathBuf};

use crate::models::dtos::{DraftMeta, DraftPayload, EditorMode, ResumeRecord, ResumeSummary, SaveResult};
use crate::models::resume::ResumeDocument;
use crate::services::defaults::{create_default_resume, DEFAULT_AVATAR_URL};
use crate::services::storage::ResumeStorage;
use crate::services::{avatar, docx, import_export};
use crate::utils::clock::Clock;
use crate::utils::error::AppResult;
use crate::utils::format::{export_file_name_today, sanitize_file_name, uid, DEFAULT_FILE_LABEL};

/// 标题为空时的记录名称
pub const UNTITLED_RESUME: &str = "未命名简历";

fn record_title(resume: &ResumeDocument) -> String {
    let title = resume.title.title.trim();
    if title.is_empty() {
        UNTITLED_RESUME.to_string()
    } else {
        title.to_string()
    }
}

/// 简历 Store
///
/// `revision` 在当前文档每次被修改或整体替换时递增，自动保存据此感知变更。
pub struct ResumeStore {
    storage: ResumeStorage,
    clock: Box<dyn Clock>,
    resume: ResumeDocument,
    mode: EditorMode,
    /// 当前简历 ID，未保存时为空字符串
    current_id: String,
    records: Vec<ResumeRecord>,
    revision: u64,
}

impl ResumeStore {
    /// 创建 Store，记录列表从本地存储初始化
    pub fn new(storage: ResumeStorage, clock: Box<dyn Clock>) -> Self {
        let records = storage.read_records();
        log::info!("已加载 {} 份本地简历", records.len());
        Self {
            storage,
            clock,
            resume: create_default_resume(),
            mode: EditorMode::default(),
            current_id: String::new(),
            records,
            revision: 0,
        }
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn resume(&self) -> &ResumeDocument {
        &self.resume
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// 简历摘要列表，按更新时间倒序
    pub fn resume_summaries(&self) -> Vec<ResumeSummary> {
        let mut summaries: Vec<ResumeSummary> = self.records.iter().map(ResumeSummary::from).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    pub fn has_saved(&self) -> bool {
        !self.records.is_empty()
    }

    // ========================================================================
    // 文档修改
    // ========================================================================

    /// 修改当前文档
    pub fn edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ResumeDocument),
    {
        f(&mut self.resume);
        self.revision += 1;
    }

    /// 整体替换当前文档
    fn replace_resume(&mut self, resume: ResumeDocument) {
        self.resume = resume;
        self.revision += 1;
    }

    /// 新增自定义模块，返回模块 key
    pub fn add_custom_module(&mut self, title: &str) -> String {
        let mut key = String::new();
        self.edit(|doc| key = doc.add_custom_module(title));
        key
    }

    /// 删除自定义模块
    pub fn remove_custom_module(&mut self, key: &str) -> bool {
        let mut removed = false;
        self.edit(|doc| removed = doc.remove_custom_module(key));
        removed
    }

    /// 从本地图片设置头像
    pub fn set_avatar_from_file(&mut self, path: &Path) -> AppResult<()> {
        let url = avatar::read_avatar_data_url(path)?;
        self.edit(|doc| doc.person_info.avatar_url = url);
        Ok(())
    }

    /// 恢复默认头像
    pub fn clear_avatar(&mut self) {
        self.edit(|doc| doc.person_info.avatar_url = DEFAULT_AVATAR_URL.to_string());
    }

    // ========================================================================
    // 记录操作
    // ========================================================================

    /// 新建简历：清空当前 ID 并重置为默认数据
    pub fn create_new(&mut self) {
        self.current_id.clear();
        self.replace_resume(create_default_resume());
    }

    pub fn reset(&mut self) {
        self.create_new();
    }

    fn persist_records(&self) -> AppResult<()> {
        self.storage.write_records(&self.records)
    }

    /// 保存当前简历：已有 ID 时原地更新，否则生成新 ID 并插入到列表头部
    pub fn save_current(&mut self) -> AppResult<SaveResult> {
        let id = if self.current_id.is_empty() {
            uid()
        } else {
            self.current_id.clone()
        };
        let title = record_title(&self.resume);

        let record = ResumeRecord {
            id: id.clone(),
            title: title.clone(),
            updated_at: self.clock.now_millis(),
            data: self.resume.clone(),
        };

        match self.records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record,
            None => self.records.insert(0, record),
        }
        self.current_id = id.clone();
        self.persist_records()?;

        log::info!("简历已保存: {} ({})", title, id);
        Ok(SaveResult { id, title })
    }

    /// 按 ID 加载简历，找不到时返回 false
    pub fn load_by_id(&mut self, id: &str) -> bool {
        let Some(found) = self.records.iter().find(|r| r.id == id) else {
            return false;
        };
        let data = found.data.clone();
        self.current_id = id.to_string();
        self.replace_resume(data);
        true
    }

    /// 按 ID 删除简历；删除的是当前简历时重置为新建状态
    pub fn remove_by_id(&mut self, id: &str) -> AppResult<bool> {
        let Some(idx) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        self.records.remove(idx);
        self.persist_records()?;

        if self.current_id == id {
            self.create_new();
        }

        log::info!("简历已删除: {}", id);
        Ok(true)
    }

    // ========================================================================
    // 草稿
    // ========================================================================

    pub fn save_draft(&self) -> AppResult<DraftPayload> {
        let payload = DraftPayload {
            updated_at: self.clock.now_millis(),
            current_id: self.current_id.clone(),
            data: self.resume.clone(),
        };
        self.storage.write_draft(&payload)?;
        Ok(payload)
    }

    /// 加载草稿，草稿不存在或结构非法时返回 false
    pub fn load_draft(&mut self) -> bool {
        let Some(draft) = self.storage.read_draft() else {
            return false;
        };
        self.current_id = draft.current_id;
        self.replace_resume(draft.data);
        true
    }

    pub fn has_draft(&self) -> bool {
        self.storage.read_draft().is_some()
    }

    pub fn draft_meta(&self) -> Option<DraftMeta> {
        self.storage.read_draft().map(|d| DraftMeta {
            updated_at: d.updated_at,
            current_id: d.current_id,
        })
    }

    pub fn clear_draft(&self) -> AppResult<()> {
        self.storage.clear_draft()
    }

    // ========================================================================
    // 导入导出
    // ========================================================================

    fn activate_imported(&mut self, imported: ResumeDocument) -> AppResult<SaveResult> {
        let id = uid();
        let title = record_title(&imported);

        self.records.insert(
            0,
            ResumeRecord {
                id: id.clone(),
                title: title.clone(),
                updated_at: self.clock.now_millis(),
                data: imported.clone(),
            },
        );
        self.persist_records()?;

        self.current_id = id.clone();
        self.replace_resume(imported);

        log::info!("简历已导入: {} ({})", title, id);
        Ok(SaveResult { id, title })
    }

    /// 从 JSON 文本导入简历：新建记录、持久化并设为当前简历
    ///
    /// JSON 解析失败时原样返回错误，状态不变。
    pub fn import_resume_from_json_str(&mut self, text: &str) -> AppResult<SaveResult> {
        let result = import_export::import_from_json_str(text, None, create_default_resume)?;
        self.activate_imported(result.resume)
    }

    /// 从 JSON 文件导入简历
    pub fn import_resume_from_json_file(&mut self, path: &Path) -> AppResult<SaveResult> {
        let result = import_export::import_from_json_file(path, create_default_resume)?;
        self.activate_imported(result.resume)
    }

    /// 导出简历记录为 JSON 文件（`<标题>.json`），写入指定目录
    ///
    /// 未指定 ID 时使用当前简历 ID；两者都为空时返回 `Ok(None)`。
    /// ID 在记录中找不到时导出当前编辑中的文档。
    pub fn export_resume_record_to_json_file(
        &self,
        id: Option<&str>,
        out_dir: &Path,
    ) -> AppResult<Option<PathBuf>> {
        let target_id = id.filter(|s| !s.is_empty()).unwrap_or(self.current_id.as_str());
        if target_id.is_empty() {
            return Ok(None);
        }

        let found = self.records.iter().find(|r| r.id == target_id);
        let data = found.map(|r| &r.data).unwrap_or(&self.resume);

        let title = [
            data.title.title.as_str(),
            found.map(|r| r.title.as_str()).unwrap_or_default(),
        ]
        .into_iter()
        .find(|t| !t.is_empty())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_FILE_LABEL);

        let path = out_dir.join(format!("{}.json", sanitize_file_name(title)));
        import_export::write_json_file(data, &path)?;

        log::info!("简历已导出 JSON: {}", path.display());
        Ok(Some(path))
    }

    /// 文档导出文件名（不含扩展名）：`标题-年月日`
    pub fn export_file_name(&self) -> String {
        export_file_name_today(&self.resume.title.title, self.clock.as_ref())
    }

    /// 导出当前简历为 Word 文档，返回文件路径
    pub fn export_docx(&self, out_dir: &Path) -> AppResult<PathBuf> {
        let path = out_dir.join(format!("{}.docx", self.export_file_name()));
        self.export_docx_to(&path)?;
        Ok(path)
    }

    /// 导出当前简历为 Word 文档到指定文件
    pub fn export_docx_to(&self, path: &Path) -> AppResult<()> {
        docx::export_to_docx(&self.resume, path)?;
        log::info!("简历已导出 Word: {}", path.display());
        Ok(())
    }
}
