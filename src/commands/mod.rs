// ============================================================================
// [接口层] Tauri commands
// ✅ 只能做：参数接收、State 获取、调用 services、错误转换为 String
// ⛔ 禁止：包含业务逻辑
// ============================================================================

pub mod dialog;
pub mod draft;
pub mod export;
pub mod resume;
pub mod settings;
