// ============================================================================
// Word 文档导出
// 先把简历转换为段落列表（纯函数，方便测试），再用 zip 打包成最小 OOXML 文档
// ============================================================================

use std::io::Write;
use std::path::Path;

use crate::models::resume::{
    EducationItem, GridRow, ModuleKind, ProjectExpItem, ResumeDocument, SkillsItem, WorkExpItem,
};
use crate::services::import_export::write_file_atomic;
use crate::utils::error::{AppError, AppResult};

/// 文档段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    /// 文档主标题
    Title(String),
    /// 一级标题（章节）
    Heading(String),
    /// 正文
    Text(String),
}

/// 条目在 Word 中的呈现方式
trait ItemLines {
    /// 摘要行中依次出现的字段
    fn summary_fields(&self) -> Vec<&str>;

    fn highlights(&self) -> &[String] {
        &[]
    }

    fn description(&self) -> &str {
        ""
    }

    fn rows(&self) -> Option<&[GridRow]>;
}

impl ItemLines for EducationItem {
    fn summary_fields(&self) -> Vec<&str> {
        vec![self.school.as_str(), self.major.as_str(), self.degree.as_str()]
    }

    fn rows(&self) -> Option<&[GridRow]> {
        self.rows.as_deref()
    }
}

impl ItemLines for SkillsItem {
    fn summary_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    fn rows(&self) -> Option<&[GridRow]> {
        self.rows.as_deref()
    }
}

impl ItemLines for WorkExpItem {
    fn summary_fields(&self) -> Vec<&str> {
        vec![self.company.as_str(), self.title.as_str()]
    }

    fn highlights(&self) -> &[String] {
        &self.highlights
    }

    fn rows(&self) -> Option<&[GridRow]> {
        self.rows.as_deref()
    }
}

impl ItemLines for ProjectExpItem {
    fn summary_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.role.as_deref().unwrap_or_default(),
            self.link.as_deref().unwrap_or_default(),
        ]
    }

    fn highlights(&self) -> &[String] {
        &self.highlights
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rows(&self) -> Option<&[GridRow]> {
        self.rows.as_deref()
    }
}

fn text(paragraphs: &mut Vec<Paragraph>, line: impl Into<String>) {
    paragraphs.push(Paragraph::Text(line.into()));
}

/// 网格行：非空单元格以 " / " 连接
fn push_grid_rows(paragraphs: &mut Vec<Paragraph>, rows: Option<&[GridRow]>) {
    for row in rows.unwrap_or_default() {
        let joined = row
            .values
            .iter()
            .filter(|v| !v.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" / ");
        if !joined.is_empty() {
            text(paragraphs, format!("- {}", joined));
        }
    }
}

fn push_items<T: ItemLines>(paragraphs: &mut Vec<Paragraph>, items: &[T]) {
    for item in items {
        let line = item
            .summary_fields()
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        if !line.is_empty() {
            text(paragraphs, line);
        }

        for highlight in item.highlights().iter().filter(|h| !h.is_empty()) {
            text(paragraphs, format!("- {}", highlight));
        }

        if !item.description().is_empty() {
            text(paragraphs, item.description());
        }

        push_grid_rows(paragraphs, item.rows());
    }
}

fn push_labeled(paragraphs: &mut Vec<Paragraph>, label: &str, value: &str) {
    if !value.is_empty() {
        text(paragraphs, format!("{}：{}", label, value));
    }
}

/// 将简历转换为 Word 段落列表
///
/// 顺序：标题、副标题、个人信息、求职意向，然后按 `modulesOrder` 输出各模块。
pub fn build_paragraphs(resume: &ResumeDocument) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();

    if !resume.title.title.is_empty() {
        paragraphs.push(Paragraph::Title(resume.title.title.clone()));
    }
    if let Some(subtitle) = resume.title.subtitle.as_deref().filter(|s| !s.is_empty()) {
        text(&mut paragraphs, subtitle);
    }

    let person = &resume.person_info;
    if person.enabled {
        paragraphs.push(Paragraph::Heading("个人信息".to_string()));
        let age = person.age.to_string();
        let base_lines = [
            ("姓名", person.name.as_str()),
            ("性别", person.gender.as_str()),
            ("年龄", age.as_str()),
            ("电话", person.phone.as_str()),
            ("邮箱", person.email.as_str()),
            ("微信", person.wechat.as_str()),
            ("Github", person.github.as_str()),
        ];
        for (label, value) in base_lines {
            push_labeled(&mut paragraphs, label, value);
        }

        for key in &person.order {
            let Some(field) = person.fields.get(key).filter(|f| f.enabled) else {
                continue;
            };
            if field.label.is_empty() && field.value.is_empty() {
                continue;
            }
            let label = if field.label.is_empty() { "自定义" } else { field.label.as_str() };
            text(&mut paragraphs, format!("{}：{}", label, field.value));
        }
    }

    let job = &resume.job_intention;
    if job.enabled {
        paragraphs.push(Paragraph::Heading("求职意向".to_string()));
        push_labeled(&mut paragraphs, "求职意向", &job.position);
        push_labeled(&mut paragraphs, "工作经验", &format!("{}年", job.work_years));
        push_labeled(&mut paragraphs, "期望城市", &job.city);
        push_labeled(&mut paragraphs, "期望薪资", job.salary.as_deref().unwrap_or_default());

        if let Some(custom) = job.custom.as_ref() {
            if !custom.title.is_empty() || !custom.value.is_empty() {
                let title = if custom.title.is_empty() { "自定义" } else { custom.title.as_str() };
                text(&mut paragraphs, format!("{}：{}", title, custom.value));
            }
        }
    }

    let modules = &resume.modules;
    for key in &resume.modules_order {
        let Some(kind) = ModuleKind::parse(key) else {
            continue;
        };
        let (enabled, title, rows) = match kind {
            ModuleKind::Education => (modules.education.enabled, &modules.education.title, modules.education.rows.as_deref()),
            ModuleKind::Skills => (modules.skills.enabled, &modules.skills.title, modules.skills.rows.as_deref()),
            ModuleKind::WorkExp => (modules.work_exp.enabled, &modules.work_exp.title, modules.work_exp.rows.as_deref()),
            ModuleKind::ProjectExp => (modules.project_exp.enabled, &modules.project_exp.title, modules.project_exp.rows.as_deref()),
            ModuleKind::SelfIntro => (modules.self_intro.enabled, &modules.self_intro.title, modules.self_intro.rows.as_deref()),
            ModuleKind::Custom(k) => match modules.custom.get(k) {
                Some(m) => (m.enabled, &m.title, m.rows.as_deref()),
                None => continue,
            },
        };
        if !enabled {
            continue;
        }

        let heading = if title.is_empty() { key.clone() } else { title.clone() };
        paragraphs.push(Paragraph::Heading(heading));

        match kind {
            ModuleKind::Education => push_items(&mut paragraphs, &modules.education.items),
            ModuleKind::Skills => push_items(&mut paragraphs, &modules.skills.items),
            ModuleKind::WorkExp => push_items(&mut paragraphs, &modules.work_exp.items),
            ModuleKind::ProjectExp => push_items(&mut paragraphs, &modules.project_exp.items),
            ModuleKind::SelfIntro => {
                if !modules.self_intro.value.text.is_empty() {
                    text(&mut paragraphs, modules.self_intro.value.text.clone());
                }
            }
            ModuleKind::Custom(_) => {}
        }

        push_grid_rows(&mut paragraphs, rows);
    }

    paragraphs
}

// ============================================================================
// OOXML 打包
// ============================================================================

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
</w:styles>"#;

/// XML 文本转义
fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // XML 1.0 不允许的控制字符直接丢弃
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// 生成 word/document.xml
pub fn document_xml(paragraphs: &[Paragraph]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        let (style, content) = match paragraph {
            Paragraph::Title(t) => (Some("Title"), t),
            Paragraph::Heading(t) => (Some("Heading1"), t),
            Paragraph::Text(t) => (None, t),
        };
        body.push_str("<w:p>");
        if let Some(style) = style {
            body.push_str(&format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", style));
        }
        body.push_str(&format!(
            "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape_xml(content)
        ));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{}<w:sectPr/></w:body></w:document>"
        ),
        body
    )
}

/// 将段落打包为 .docx 写入指定路径
pub fn write_docx(paragraphs: &[Paragraph], target: &Path) -> AppResult<()> {
    let document = document_xml(paragraphs);
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/styles.xml", STYLES_XML),
        ("word/document.xml", &document),
    ];

    write_file_atomic(target, |file| {
        let mut zip_writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, content) in parts {
            zip_writer
                .start_file(name, options)
                .map_err(|e| AppError::ExportError(format!("导出 Word 失败：添加 {} 时出错: {}", name, e)))?;
            zip_writer.write_all(content.as_bytes())?;
        }

        zip_writer
            .finish()
            .map_err(|e| AppError::ExportError(format!("导出 Word 失败：完成 ZIP 时出错: {}", e)))?;
        Ok(())
    })
}

/// 导出简历为 Word 文档
///
/// 任何失败都统一转换为 "导出 Word 失败，请重试"，原始错误记录到日志。
pub fn export_to_docx(resume: &ResumeDocument, target: &Path) -> AppResult<()> {
    write_docx(&build_paragraphs(resume), target).map_err(|e| {
        log::error!("导出 Word 失败 [{}]: {}", target.display(), e);
        AppError::ExportError("导出 Word 失败，请重试".to_string())
    })
}
