// ============================================================================
// 导出 Commands
// 负责：选择导出位置、导出 JSON / Word、在文件管理器中定位导出文件
// ============================================================================

use std::sync::Mutex;

use tauri::{AppHandle, State};

use crate::commands::dialog;
use crate::database::Database;
use crate::state::EditorState;

const LOCK_ERROR: &str = "编辑器状态访问失败：无法获取锁";

fn default_export_dir(db: &State<'_, Mutex<Database>>) -> Result<Option<String>, String> {
    let db = db
        .lock()
        .map_err(|_| "数据库访问失败：无法获取锁".to_string())?;
    Ok(db.get_settings()?.default_export_dir)
}

/// 文档导出文件名（不含扩展名）
#[tauri::command]
pub async fn get_export_file_name(state: State<'_, Mutex<EditorState>>) -> Result<String, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.store().export_file_name())
}

/// 导出简历 JSON 到所选目录
///
/// 没有可导出的简历时返回 None；成功时返回文件路径。
#[tauri::command]
pub async fn export_resume_json(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
    db: State<'_, Mutex<Database>>,
    id: Option<String>,
) -> Result<Option<String>, String> {
    let start_dir = default_export_dir(&db)?;
    let out_dir = dialog::pick_export_dir(&app, start_dir.as_deref())?;

    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    let path = state
        .store()
        .export_resume_record_to_json_file(id.as_deref(), &out_dir)?;
    Ok(path.map(|p| p.to_string_lossy().to_string()))
}

/// 导出当前简历为 Word 文档，返回文件路径
#[tauri::command]
pub async fn export_resume_docx(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
    db: State<'_, Mutex<Database>>,
) -> Result<String, String> {
    let file_name = {
        let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
        format!("{}.docx", state.store().export_file_name())
    };
    let start_dir = default_export_dir(&db)?;
    let target = dialog::pick_save_path(&app, start_dir.as_deref(), &file_name, "Word", "docx")?;

    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.store().export_docx_to(&target)?;
    Ok(target.to_string_lossy().to_string())
}

/// 在系统文件管理器中定位导出文件
#[tauri::command]
pub async fn reveal_in_folder(path: String) -> Result<(), String> {
    tauri_plugin_opener::reveal_item_in_dir(&path)
        .map_err(|e| format!("打开文件夹失败：{}", e))
}
