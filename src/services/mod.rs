// ============================================================================
// 业务层：纯 Rust 核心逻辑
// ✅ 特点：不依赖 `tauri::*`，保持纯净，方便写 #[test]
// ⛔ 禁止：直接返回前端专用的错误格式
// ============================================================================

pub mod autosave;
pub mod avatar;
pub mod defaults;
pub mod docx;
pub mod editor_nav;
pub mod import_export;
pub mod normalizer;
pub mod resume_store;
pub mod storage;
