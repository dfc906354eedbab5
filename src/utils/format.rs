// ============================================================================
// 格式化工具：ID 生成、文件名清理、导出文件名、时间格式化
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use time::Date;

use crate::utils::clock::{millis_to_local, Clock, SystemClock};

/// 文件名清理后为空时使用的默认名称
pub const DEFAULT_FILE_LABEL: &str = "简历";

/// 文件系统非法字符：\ / : * ? " < > |
static ILLEGAL_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("非法字符正则无效"));

/// 生成唯一标识符：`<毫秒时间戳>-<12 位十六进制随机数>`
pub fn uid() -> String {
    let random: u64 = rand::random();
    format!(
        "{}-{:012x}",
        SystemClock.now_millis(),
        random & 0xffff_ffff_ffff
    )
}

/// 将文件名中的非法字符替换为下划线，并去除首尾空白
///
/// 清理结果为空时返回默认名称 "简历"，永远不会返回空字符串。
pub fn sanitize_file_name(name: &str) -> String {
    let safe = ILLEGAL_FILE_CHARS.replace_all(name, "_");
    let safe = safe.trim();
    if safe.is_empty() {
        DEFAULT_FILE_LABEL.to_string()
    } else {
        safe.to_string()
    }
}

/// 构建文档导出文件名（不含扩展名）：`标题-年月日`
pub fn build_export_file_name(title: &str, date: Date) -> String {
    format!(
        "{}-{:04}{:02}{:02}",
        sanitize_file_name(title),
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// 毫秒时间戳格式化为本地时间字符串，如 `2024/1/31 12:00:00`
///
/// 时间戳超出范围时返回空字符串。
pub fn format_time(millis: i64) -> String {
    let format = time::macros::format_description!(
        "[year]/[month padding:none]/[day padding:none] [hour]:[minute]:[second]"
    );
    millis_to_local(millis)
        .and_then(|dt| dt.format(format).ok())
        .unwrap_or_default()
}

/// 使用给定时钟的今天日期构建导出文件名
pub fn export_file_name_today(title: &str, clock: &dyn Clock) -> String {
    build_export_file_name(title, clock.today())
}
