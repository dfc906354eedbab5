// ============================================================================
// 统一错误类型定义
// 使用 thiserror 派生宏，集中定义所有对外可见的错误
// ============================================================================

use thiserror::Error;

/// 应用统一错误枚举
///
/// 每个变体对应一类错误。存储层读路径上的错误会在内部降级为默认值，
/// 只有写入失败、导入解析失败和导出失败会以 `AppError` 的形式交给调用方。
/// 通过 `impl From<AppError> for String` 保持与 Tauri command 的兼容性
/// （Tauri command 要求返回 `Result<T, String>`）。
#[derive(Debug, Error)]
pub enum AppError {
    /// 参数验证失败（如头像不是图片、文件过大）
    #[error("验证失败：{0}")]
    ValidationError(String),

    /// 文件系统 IO 错误
    #[error("IO 错误：{0}")]
    IoError(#[from] std::io::Error),

    /// 数据库操作错误
    #[error("{0}")]
    DatabaseError(String),

    /// JSON 解析/序列化失败（导入简历时直接透传给用户）
    #[error("JSON 解析失败：{0}")]
    JsonError(#[from] serde_json::Error),

    /// 导出 Word / JSON 失败
    #[error("{0}")]
    ExportError(String),

    /// 用户取消操作（如关闭文件选择对话框）
    #[error("cancelled")]
    Cancelled,
}

/// 便捷类型别名，统一项目内的 Result 签名
pub type AppResult<T> = Result<T, AppError>;

/// 将 AppError 转换为 String，保持与 Tauri command 返回类型的兼容性
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}
