// ============================================================================
// 简历文档数据模型
// JSON 字段名与导出文件保持一致（camelCase），所有字段宽松反序列化：
// 类型不匹配时回落为默认值，保证本地数据和导入文件永远可读
// ============================================================================

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::utils::format::uid;
use crate::utils::lenient::{map_lenient, opt_vec_lenient, or_default, vec_lenient};

/// 自定义模块 key 前缀
pub const CUSTOM_MODULE_PREFIX: &str = "custom-";

/// 五个内置模块 key，同时也是默认显示顺序
pub const BUILT_IN_MODULES: [&str; 5] = ["education", "skills", "workExp", "projectExp", "selfIntro"];

/// 模块 key 的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind<'a> {
    Education,
    Skills,
    WorkExp,
    ProjectExp,
    SelfIntro,
    /// `custom-<id>` 形式的自定义模块
    Custom(&'a str),
}

impl<'a> ModuleKind<'a> {
    /// 解析模块 key，既不是内置模块也不带自定义前缀时返回 None
    pub fn parse(key: &'a str) -> Option<Self> {
        match key {
            "education" => Some(Self::Education),
            "skills" => Some(Self::Skills),
            "workExp" => Some(Self::WorkExp),
            "projectExp" => Some(Self::ProjectExp),
            "selfIntro" => Some(Self::SelfIntro),
            k if k.starts_with(CUSTOM_MODULE_PREFIX) => Some(Self::Custom(k)),
            _ => None,
        }
    }
}

// ============================================================================
// 标题 / 求职意向 / 个人信息
// ============================================================================

/// 标题对齐方式
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleAlign {
    Left,
    Center,
    Right,
}

/// 简历标题
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ResumeTitle {
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub align: Option<TitleAlign>,
}

/// 求职意向内部字段的显示开关
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobIntentionFields {
    #[serde(deserialize_with = "or_default")]
    pub work_years: bool,
    #[serde(deserialize_with = "or_default")]
    pub position: bool,
    #[serde(deserialize_with = "or_default")]
    pub city: bool,
    #[serde(deserialize_with = "or_default")]
    pub salary: bool,
    #[serde(deserialize_with = "or_default")]
    pub custom: bool,
}

/// 标题 + 值形式的自定义字段
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CustomField {
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub value: String,
}

/// 求职意向
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobIntention {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub position: String,
    #[serde(deserialize_with = "or_default")]
    pub work_years: u32,
    #[serde(deserialize_with = "or_default")]
    pub city: String,
    #[serde(deserialize_with = "or_default")]
    pub fields: JobIntentionFields,
    /// 字段显示顺序，取值为 `fields` 中的字段名
    #[serde(deserialize_with = "vec_lenient")]
    pub order: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub salary: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub custom: Option<CustomField>,
}

/// 头像形状
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvatarShape {
    #[default]
    Circle,
    Square,
}

/// 个人信息预览配置
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonPreview {
    #[serde(deserialize_with = "or_default")]
    pub avatar_shape: AvatarShape,
    #[serde(deserialize_with = "or_default")]
    pub columns: u8,
    #[serde(deserialize_with = "or_default")]
    pub show_labels: bool,
}

impl Default for PersonPreview {
    fn default() -> Self {
        Self {
            avatar_shape: AvatarShape::Circle,
            columns: 1,
            show_labels: true,
        }
    }
}

/// 个人信息中的单个可配置字段
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct PersonField {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub label: String,
    #[serde(deserialize_with = "or_default")]
    pub value: String,
}

/// 个人信息
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonInfo {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub preview: PersonPreview,
    #[serde(deserialize_with = "or_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "map_lenient")]
    pub fields: BTreeMap<String, PersonField>,
    #[serde(deserialize_with = "vec_lenient")]
    pub order: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub gender: String,
    #[serde(deserialize_with = "or_default")]
    pub age: u32,
    #[serde(deserialize_with = "or_default")]
    pub phone: String,
    #[serde(deserialize_with = "or_default")]
    pub email: String,
    #[serde(deserialize_with = "or_default")]
    pub wechat: String,
    #[serde(deserialize_with = "or_default")]
    pub github: String,
}

// ============================================================================
// 模块与条目
// ============================================================================

/// 网格行：1~6 列的自由排版
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GridRow {
    #[serde(deserialize_with = "or_default")]
    pub cols: u8,
    #[serde(deserialize_with = "vec_lenient")]
    pub values: Vec<String>,
}

/// 模块时间：`[开始, 结束]` 或任意字符串
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ModuleTime {
    Range(String, String),
    Text(String),
}

impl ModuleTime {
    pub fn empty_range() -> Self {
        Self::Range(String::new(), String::new())
    }
}

/// 模块通用属性，自定义模块只有这些字段
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ModuleCommon {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub time: Option<ModuleTime>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
}

/// 带条目列表的内置模块（教育/技能/工作/项目）
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct ListModule<T> {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub time: Option<ModuleTime>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
    #[serde(deserialize_with = "vec_lenient")]
    pub items: Vec<T>,
}

/// 自我评价内容
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SelfIntro {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub text: String,
}

/// 自我评价模块
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SelfIntroModule {
    #[serde(deserialize_with = "or_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub time: Option<ModuleTime>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
    #[serde(deserialize_with = "or_default")]
    pub value: SelfIntro,
}

/// 教育经历
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub school: String,
    #[serde(deserialize_with = "or_default")]
    pub major: String,
    #[serde(deserialize_with = "or_default")]
    pub degree: String,
    #[serde(deserialize_with = "or_default")]
    pub start: String,
    #[serde(deserialize_with = "or_default")]
    pub end: String,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
}

/// 专业技能
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SkillsItem {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub level: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
}

/// 工作经历
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct WorkExpItem {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub company: String,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub start: String,
    #[serde(deserialize_with = "or_default")]
    pub end: String,
    #[serde(deserialize_with = "or_default")]
    pub city: Option<String>,
    #[serde(deserialize_with = "vec_lenient")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
}

/// 项目经历
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ProjectExpItem {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub role: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub start: String,
    #[serde(deserialize_with = "or_default")]
    pub end: String,
    #[serde(deserialize_with = "or_default")]
    pub description: String,
    #[serde(deserialize_with = "vec_lenient")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub link: Option<String>,
    #[serde(deserialize_with = "opt_vec_lenient")]
    pub rows: Option<Vec<GridRow>>,
}

/// 模块集合：五个内置模块 + 自定义模块映射
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeModules {
    #[serde(deserialize_with = "map_lenient")]
    pub custom: BTreeMap<String, ModuleCommon>,
    #[serde(deserialize_with = "or_default")]
    pub education: ListModule<EducationItem>,
    #[serde(deserialize_with = "or_default")]
    pub skills: ListModule<SkillsItem>,
    #[serde(deserialize_with = "or_default")]
    pub work_exp: ListModule<WorkExpItem>,
    #[serde(deserialize_with = "or_default")]
    pub project_exp: ListModule<ProjectExpItem>,
    #[serde(deserialize_with = "or_default")]
    pub self_intro: SelfIntroModule,
}

// ============================================================================
// 简历文档
// ============================================================================

/// 完整简历文档
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(deserialize_with = "or_default")]
    pub title: ResumeTitle,
    #[serde(deserialize_with = "or_default")]
    pub job_intention: JobIntention,
    #[serde(deserialize_with = "or_default")]
    pub person_info: PersonInfo,
    /// 模块在预览中的显示顺序（内置 key ∪ 自定义 key）
    #[serde(deserialize_with = "vec_lenient")]
    pub modules_order: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub modules: ResumeModules,
}

impl ResumeDocument {
    /// 新增一个自定义模块并追加到显示顺序末尾，返回模块 key
    pub fn add_custom_module(&mut self, title: &str) -> String {
        let key = format!("{}{}", CUSTOM_MODULE_PREFIX, uid());
        self.modules.custom.insert(
            key.clone(),
            ModuleCommon {
                enabled: true,
                title: title.to_string(),
                icon: None,
                time: Some(ModuleTime::empty_range()),
                rows: Some(Vec::new()),
            },
        );
        self.modules_order.push(key.clone());
        key
    }

    /// 删除自定义模块（同时从显示顺序中移除），内置模块不可删除
    pub fn remove_custom_module(&mut self, key: &str) -> bool {
        if !key.starts_with(CUSTOM_MODULE_PREFIX) {
            return false;
        }
        let removed = self.modules.custom.remove(key).is_some();
        let before = self.modules_order.len();
        self.modules_order.retain(|k| k != key);
        removed || before != self.modules_order.len()
    }
}
