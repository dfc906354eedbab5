// ============================================================================
// 草稿 Commands
// 手动保存 / 加载 / 清空草稿，以及进入编辑器时的恢复提示
// ============================================================================

use std::sync::Mutex;
use std::time::Instant;

use tauri::{AppHandle, State};

use crate::commands::dialog::DialogPrompt;
use crate::models::dtos::{DraftMeta, NoticeDto};
use crate::services::autosave::{ConfirmPrompt, DraftNotice};
use crate::state::EditorState;

const LOCK_ERROR: &str = "编辑器状态访问失败：无法获取锁";

fn notice(n: DraftNotice) -> NoticeDto {
    NoticeDto {
        message: n.message().to_string(),
        is_error: n.is_error(),
    }
}

#[tauri::command]
pub async fn save_draft(state: State<'_, Mutex<EditorState>>) -> Result<NoticeDto, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(notice(state.save_draft_now()))
}

/// 加载草稿，用户取消确认框时返回 None
///
/// 确认框弹出期间不持有编辑器状态锁，自动保存和编辑照常进行。
#[tauri::command]
pub async fn load_draft(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
) -> Result<Option<NoticeDto>, String> {
    let request = {
        let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
        match state.draft_load_prompt() {
            Ok(request) => request,
            Err(n) => return Ok(Some(notice(n))),
        }
    };
    let answer = DialogPrompt::new(&app).confirm(&request);

    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.finish_load_draft(answer, Instant::now()).map(notice))
}

#[tauri::command]
pub async fn clear_draft(state: State<'_, Mutex<EditorState>>) -> Result<NoticeDto, String> {
    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(notice(state.clear_draft()))
}

#[tauri::command]
pub async fn get_draft_meta(state: State<'_, Mutex<EditorState>>) -> Result<Option<DraftMeta>, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.store().draft_meta())
}

/// 是否有尚未写入草稿的修改
#[tauri::command]
pub async fn is_draft_dirty(state: State<'_, Mutex<EditorState>>) -> Result<bool, String> {
    let state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.autosave().is_dirty())
}

/// 编辑器挂载时调用：存在草稿且未被抑制时提示恢复，返回是否恢复
#[tauri::command]
pub async fn recover_draft_on_mount(
    app: AppHandle,
    state: State<'_, Mutex<EditorState>>,
) -> Result<bool, String> {
    let request = {
        let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
        state.draft_recover_prompt()
    };
    let Some(request) = request else {
        return Ok(false);
    };
    let answer = DialogPrompt::new(&app).confirm(&request);

    let mut state = state.lock().map_err(|_| LOCK_ERROR.to_string())?;
    Ok(state.finish_recover(answer, Instant::now()))
}
