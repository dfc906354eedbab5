// ============================================================================
// 设置 Commands
// ============================================================================

use std::sync::Mutex;
use std::time::Duration;

use tauri::State;

use crate::database::{AppSettings, Database, SETTING_AUTOSAVE_DELAY};
use crate::state::EditorState;

/// 获取应用设置
#[tauri::command]
pub async fn get_app_settings(db: State<'_, Mutex<Database>>) -> Result<AppSettings, String> {
    let db = db
        .lock()
        .map_err(|_| "数据库访问失败：无法获取锁".to_string())?;
    Ok(db.get_settings()?)
}

/// 保存单个设置项，自动保存延迟立即生效
#[tauri::command]
pub async fn save_app_setting(
    db: State<'_, Mutex<Database>>,
    state: State<'_, Mutex<EditorState>>,
    key: String,
    value: String,
) -> Result<(), String> {
    let settings = {
        let db = db
            .lock()
            .map_err(|_| "数据库访问失败：无法获取锁".to_string())?;
        db.save_setting(&key, &value)?;
        db.get_settings()?
    };

    if key == SETTING_AUTOSAVE_DELAY {
        let mut state = state
            .lock()
            .map_err(|_| "编辑器状态访问失败：无法获取锁".to_string())?;
        state.set_autosave_delay(Duration::from_millis(settings.autosave_delay_ms));
    }
    Ok(())
}
