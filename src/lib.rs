// ============================================================================
// [总线] 程序的组装车间
// ✅ 只能做：pub mod 暴露子模块、注册 .invoke_handler()、初始化 State
// ⛔ 禁止：直接实现 command 函数
// ============================================================================

#[cfg(feature = "desktop")]
pub mod commands;
pub mod database;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(feature = "desktop")]
use tauri::Manager;

// ============================================================================
// 应用入口
// ============================================================================

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use database::Database;
    use services::resume_store::ResumeStore;
    use services::storage::ResumeStorage;
    use state::{EditorState, TICK_INTERVAL};
    use utils::clock::SystemClock;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // 获取应用数据目录并初始化数据库
            let app_data_dir = app
                .path()
                .app_data_dir()
                .map_err(|e| format!("获取应用数据目录失败: {}", e))?;
            let settings_db = Database::init(&app_data_dir)?;
            let settings = settings_db.get_settings()?;

            // 简历记录与草稿使用独立连接，随 Store 一起进入编辑器状态
            let kv_db = Database::init(&app_data_dir)?;
            let store = ResumeStore::new(ResumeStorage::new(Box::new(kv_db)), Box::new(SystemClock));
            let editor = EditorState::new(store, Duration::from_millis(settings.autosave_delay_ms));

            app.manage(Mutex::new(settings_db));
            app.manage(Mutex::new(editor));

            // 后台线程推进草稿自动保存的防抖计时
            let handle = app.handle().clone();
            std::thread::spawn(move || loop {
                std::thread::sleep(TICK_INTERVAL);
                let state = handle.state::<Mutex<EditorState>>();
                let Ok(mut editor) = state.lock() else {
                    log::error!("编辑器状态锁已失效，停止自动保存");
                    break;
                };
                editor.tick(Instant::now());
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 简历 commands
            commands::resume::get_resume,
            commands::resume::update_resume,
            commands::resume::get_editor_mode,
            commands::resume::set_editor_mode,
            commands::resume::add_custom_module,
            commands::resume::remove_custom_module,
            commands::resume::pick_avatar,
            commands::resume::clear_avatar,
            commands::resume::list_resumes,
            commands::resume::create_resume,
            commands::resume::save_resume,
            commands::resume::load_resume,
            commands::resume::delete_resume,
            commands::resume::import_resume_json,
            commands::resume::suppress_draft_recover_prompt_once,
            // 草稿 commands
            commands::draft::save_draft,
            commands::draft::load_draft,
            commands::draft::clear_draft,
            commands::draft::get_draft_meta,
            commands::draft::is_draft_dirty,
            commands::draft::recover_draft_on_mount,
            // 导出 commands
            commands::export::get_export_file_name,
            commands::export::export_resume_json,
            commands::export::export_resume_docx,
            commands::export::reveal_in_folder,
            // 设置 commands
            commands::settings::get_app_settings,
            commands::settings::save_app_setting,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
