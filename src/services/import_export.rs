// ============================================================================
// 简历 JSON 导入导出
// 导入：读取文本 → JSON 解析（失败直接返回错误）→ 规范化
// 导出：两空格缩进的 JSON，经临时文件原子写入
// ============================================================================

use std::io::Write;
use std::path::Path;

use crate::models::dtos::{ImportMeta, ImportResult};
use crate::models::resume::ResumeDocument;
use crate::services::normalizer::ensure_defaults;
use crate::utils::error::{AppError, AppResult};

/// 将简历导出为格式化的 JSON 字符串
pub fn export_to_json(resume: &ResumeDocument) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(resume)?)
}

/// 从 JSON 文本导入简历
///
/// JSON 解析失败时返回 `AppError::JsonError`，这是导入流程中唯一对用户可见的错误；
/// 结构残缺或字段错误由规范化流程兜底。
pub fn import_from_json_str<F>(
    text: &str,
    file_name: Option<&str>,
    default_factory: F,
) -> AppResult<ImportResult>
where
    F: FnOnce() -> ResumeDocument,
{
    let parsed: serde_json::Value = serde_json::from_str(text)?;
    let resume = ensure_defaults(&parsed, default_factory);
    Ok(ImportResult {
        resume,
        meta: ImportMeta {
            source: "json".to_string(),
            file_name: file_name.map(str::to_string),
        },
    })
}

/// 从 JSON 文件导入简历
pub fn import_from_json_file<F>(path: &Path, default_factory: F) -> AppResult<ImportResult>
where
    F: FnOnce() -> ResumeDocument,
{
    let text = std::fs::read_to_string(path)?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
    import_from_json_str(&text, file_name.as_deref(), default_factory)
}

/// 原子写入文件：先写同目录临时文件，成功后重命名到目标路径
///
/// 任何一步失败时由 scopeguard 清理临时文件，目标文件保持原样。
pub fn write_file_atomic<F>(target: &Path, write: F) -> AppResult<()>
where
    F: FnOnce(&mut std::fs::File) -> AppResult<()>,
{
    let file_name = target
        .file_name()
        .ok_or_else(|| AppError::ExportError(format!("导出失败：无效的文件路径 {}", target.display())))?;
    let temp_path = target.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let guard = scopeguard::guard(temp_path.clone(), |path| {
        let _ = std::fs::remove_file(path);
    });

    let mut file = std::fs::File::create(&temp_path)?;
    write(&mut file)?;
    file.flush()?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&temp_path, target)?;
    // 重命名成功，临时文件已不存在，解除清理
    scopeguard::ScopeGuard::into_inner(guard);
    Ok(())
}

/// 将简历 JSON 写入指定路径
pub fn write_json_file(resume: &ResumeDocument, target: &Path) -> AppResult<()> {
    let json = export_to_json(resume)?;
    write_file_atomic(target, |file| {
        file.write_all(json.as_bytes())?;
        Ok(())
    })
}
