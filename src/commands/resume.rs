// ============================================================================
// 简历 Commands
// 作为前端与 Store 之间的薄接口层，仅负责：
// 1. 接收前端参数
// 2. 从 Tauri State 获取 EditorState
// 3. 调用 Store 方法（经由 with_store 通知自动保存）
// 4. 返回结果
// ⛔ 禁止：包含业务逻辑
// ============================================================================

use std::sync::Mutex;
use std::time::Instant;

use tauri::{AppHandle, State};

use crate::commands::dialog;
use crate::models::dtos::{EditorMode, ResumeSummary, SaveResult};
use crate::models::resume::ResumeDocument;
use crate::state::EditorState;

const LOCK_ERROR: &str = "编辑器状态访问失败：无法获取锁";

// ============================================================================
// 当前文档
// ============================================================================

/// 获取当前编辑中的简历
#[tauri::command]
pub async fn get_resume(state: State<'_, Mutex<EditorState>>) -> Result<ResumeDocument, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.store().resume().clone())
}

/// 用前端编辑后的内容覆盖当前简历
#[tauri::command]
pub async fn update_resume(
    state: State<'_, Mutex<EditorState>>,
    resume: ResumeDocument,
) -> Result<(), String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.with_store(Instant::now(), |s| s.edit(|doc| *doc = resume));
    Ok(())
}

#[tauri::command]
pub async fn get_editor_mode(state: State<'_, Mutex<EditorState>>) -> Result<EditorMode, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.store().mode())
}

#[tauri::command]
pub async fn set_editor_mode(
    state: State<'_, Mutex<EditorState>>,
    mode: EditorMode,
) -> Result<(), String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.with_store(Instant::now(), |s| s.set_mode(mode));
    Ok(())
}

/// 新增自定义模块，返回模块 key
#[tauri::command]
pub async fn add_custom_module(
    state: State<'_, Mutex<EditorState>>,
    title: String,
) -> Result<String, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.with_store(Instant::now(), |s| s.add_custom_module(&title)))
}

#[tauri::command]
pub async fn remove_custom_module(
    state: State<'_, Mutex<EditorState>>,
    key: String,
) -> Result<bool, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.with_store(Instant::now(), |s| s.remove_custom_module(&key)))
}

/// 选择本地图片作为头像
#[tauri::command]
pub async fn pick_avatar(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
) -> Result<(), String> {
    let path = dialog::pick_image_file(&app)?;
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state
        .with_store(Instant::now(), |s| s.set_avatar_from_file(&path))
        .map_err(String::from)
}

#[tauri::command]
pub async fn clear_avatar(state: State<'_, Mutex<EditorState>>) -> Result<(), String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.with_store(Instant::now(), |s| s.clear_avatar());
    Ok(())
}

// ============================================================================
// 简历记录
// ============================================================================

/// 已保存简历列表（按更新时间倒序）
#[tauri::command]
pub async fn list_resumes(state: State<'_, Mutex<EditorState>>) -> Result<Vec<ResumeSummary>, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.store().resume_summaries())
}

#[tauri::command]
pub async fn create_resume(state: State<'_, Mutex<EditorState>>) -> Result<(), String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.with_store(Instant::now(), |s| s.create_new());
    Ok(())
}

#[tauri::command]
pub async fn save_resume(state: State<'_, Mutex<EditorState>>) -> Result<SaveResult, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state
        .with_store(Instant::now(), |s| s.save_current())
        .map_err(String::from)
}

#[tauri::command]
pub async fn load_resume(state: State<'_, Mutex<EditorState>>, id: String) -> Result<bool, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.with_store(Instant::now(), |s| s.load_by_id(&id)))
}

#[tauri::command]
pub async fn delete_resume(state: State<'_, Mutex<EditorState>>, id: String) -> Result<bool, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state
        .with_store(Instant::now(), |s| s.remove_by_id(&id))
        .map_err(String::from)
}

/// 从 JSON 文件导入简历：弹出文件选择框，导入后设为当前简历
#[tauri::command]
pub async fn import_resume_json(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
) -> Result<SaveResult, String> {
    let path = dialog::pick_json_file(&app)?;
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state
        .with_store(Instant::now(), |s| s.import_resume_from_json_file(&path))
        .map_err(String::from)
}

/// 下一次进入编辑器时不提示恢复草稿
#[tauri::command]
pub async fn suppress_draft_recover_prompt_once(
    state: State<'_, Mutex<EditorState>>,
) -> Result<(), String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    state.nav_mut().set_suppress_draft_recover_prompt_once(true);
    Ok(())
}
