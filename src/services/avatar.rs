// ============================================================================
// 头像处理：上传前校验 + 读取为 data URL
// ============================================================================

use std::path::Path;
use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;

use crate::utils::error::{AppError, AppResult};

/// 头像大小上限（字节），等于该值也会被拒绝
pub const MAX_AVATAR_BYTES: u64 = 2 * 1024 * 1024;

static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(png|jpe?g|gif|webp|bmp|svg)$").expect("图片扩展名正则无效"));

/// 校验头像文件
///
/// MIME 以 `image/` 开头，或文件名（不区分大小写）以常见图片扩展名结尾即视为图片。
pub fn validate_avatar(file_name: &str, mime: &str, size: u64) -> AppResult<()> {
    let is_image = mime.starts_with("image/") || IMAGE_EXTENSION.is_match(&file_name.to_lowercase());
    if !is_image {
        return Err(AppError::ValidationError("只能上传图片文件".to_string()));
    }
    if size >= MAX_AVATAR_BYTES {
        return Err(AppError::ValidationError("图片大小不能超过 2MB".to_string()));
    }
    Ok(())
}

/// 根据扩展名推断图片 MIME，未知扩展名返回 None
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// 把图片字节编码为 data URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// 校验并读取本地图片，返回可直接写入 `personInfo.avatarUrl` 的 data URL
pub fn read_avatar_data_url(path: &Path) -> AppResult<String> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime = mime_from_file_name(&file_name).unwrap_or_default();
    let size = std::fs::metadata(path)?.len();

    validate_avatar(&file_name, mime, size)?;

    let bytes = std::fs::read(path)?;
    log::info!("头像已读取: {} ({} 字节)", file_name, bytes.len());
    Ok(encode_data_url(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_by_mime_or_extension() {
        assert!(validate_avatar("photo", "image/png", 10).is_ok());
        assert!(validate_avatar("ME.JPG", "", 10).is_ok());
        assert!(validate_avatar("a.svg", "application/octet-stream", 10).is_ok());

        let err = validate_avatar("resume.pdf", "application/pdf", 10).unwrap_err();
        assert_eq!(err.to_string(), "验证失败：只能上传图片文件");
    }

    #[test]
    fn test_validate_size_limit() {
        assert!(validate_avatar("a.png", "image/png", MAX_AVATAR_BYTES - 1).is_ok());
        let err = validate_avatar("a.png", "image/png", MAX_AVATAR_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "验证失败：图片大小不能超过 2MB");
    }

    #[test]
    fn test_mime_from_file_name() {
        assert_eq!(mime_from_file_name("a.JPEG"), Some("image/jpeg"));
        assert_eq!(mime_from_file_name("icon.svg"), Some("image/svg+xml"));
        assert_eq!(mime_from_file_name("noext"), None);
        assert_eq!(mime_from_file_name("a.txt"), None);
    }

    #[test]
    fn test_read_avatar_data_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avatar.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let url = read_avatar_data_url(&path).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_read_rejects_non_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(matches!(read_avatar_data_url(&path), Err(AppError::ValidationError(_))));
    }
}
