// ============================================================================
// 原生对话框适配
// 文件选择、保存位置选择以及草稿确认框，均为阻塞调用，只能在 async command 中使用
// ============================================================================

use std::path::{Path, PathBuf};

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, FilePath, MessageDialogButtons, MessageDialogKind};

use crate::services::autosave::{ConfirmPrompt, PromptAnswer, PromptKind, PromptRequest};
use crate::utils::error::AppError;

/// 系统确认框
///
/// 系统对话框无法区分"取消"和"直接关闭"，两者都视为取消。
pub struct DialogPrompt<'a> {
    app: &'a AppHandle,
}

impl<'a> DialogPrompt<'a> {
    pub fn new(app: &'a AppHandle) -> Self {
        Self { app }
    }
}

impl ConfirmPrompt for DialogPrompt<'_> {
    fn confirm(&mut self, request: &PromptRequest) -> PromptAnswer {
        let accepted = self
            .app
            .dialog()
            .message(request.message)
            .title(request.title)
            .kind(match request.kind {
                PromptKind::Info => MessageDialogKind::Info,
                PromptKind::Warning => MessageDialogKind::Warning,
            })
            .buttons(MessageDialogButtons::OkCancelCustom(
                request.confirm_label.to_string(),
                request.cancel_label.to_string(),
            ))
            .blocking_show();

        if accepted {
            PromptAnswer::Confirm
        } else {
            PromptAnswer::Cancel
        }
    }
}

fn into_path(picked: Option<FilePath>) -> Result<PathBuf, String> {
    // 用户取消了对话框
    let picked = picked.ok_or_else(|| String::from(AppError::Cancelled))?;
    picked
        .as_path()
        .map(Path::to_path_buf)
        .ok_or_else(|| "无法解析所选路径".to_string())
}

/// 选择要导入的 JSON 文件
pub fn pick_json_file(app: &AppHandle) -> Result<PathBuf, String> {
    into_path(
        app.dialog()
            .file()
            .add_filter("JSON", &["json"])
            .blocking_pick_file(),
    )
}

/// 选择头像图片
pub fn pick_image_file(app: &AppHandle) -> Result<PathBuf, String> {
    into_path(
        app.dialog()
            .file()
            .add_filter("图片", &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"])
            .blocking_pick_file(),
    )
}

/// 选择导出目录，`start_dir` 为设置中的默认导出目录
pub fn pick_export_dir(app: &AppHandle, start_dir: Option<&str>) -> Result<PathBuf, String> {
    let mut builder = app.dialog().file();
    if let Some(dir) = start_dir {
        builder = builder.set_directory(dir);
    }
    into_path(builder.blocking_pick_folder())
}

/// 选择导出文件的保存位置
pub fn pick_save_path(
    app: &AppHandle,
    start_dir: Option<&str>,
    file_name: &str,
    filter_name: &str,
    extension: &str,
) -> Result<PathBuf, String> {
    let mut builder = app
        .dialog()
        .file()
        .set_file_name(file_name)
        .add_filter(filter_name, &[extension]);
    if let Some(dir) = start_dir {
        builder = builder.set_directory(dir);
    }
    into_path(builder.blocking_save_file())
}
