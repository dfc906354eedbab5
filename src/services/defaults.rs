// ============================================================================
// 默认简历工厂
// 每次调用都生成一份全新的完整文档，条目 id 动态生成
// ============================================================================

use std::collections::BTreeMap;

use crate::models::resume::{
    AvatarShape, CustomField, EducationItem, JobIntention, JobIntentionFields, ListModule,
    ModuleTime, PersonField, PersonInfo, PersonPreview, ProjectExpItem, ResumeDocument,
    ResumeModules, ResumeTitle, SelfIntro, SelfIntroModule, SkillsItem, WorkExpItem,
    BUILT_IN_MODULES,
};
use crate::utils::format::uid;

/// 默认头像地址（前端静态资源）
pub const DEFAULT_AVATAR_URL: &str = "/assets/defaultavatar.svg";

/// 求职意向字段默认顺序
pub const JOB_INTENTION_ORDER: [&str; 5] = ["workYears", "position", "city", "salary", "custom"];

/// 个人信息字段默认顺序
pub const PERSON_FIELD_ORDER: [&str; 7] = ["name", "gender", "age", "phone", "email", "wechat", "github"];

fn person_field(label: &str, value: &str) -> PersonField {
    PersonField {
        enabled: true,
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn list_module<T>(title: &str, icon: &str, items: Vec<T>) -> ListModule<T> {
    ListModule {
        enabled: true,
        title: title.to_string(),
        icon: Some(icon.to_string()),
        time: Some(ModuleTime::empty_range()),
        rows: Some(Vec::new()),
        items,
    }
}

/// 创建"新建简历"的默认数据
pub fn create_default_resume() -> ResumeDocument {
    let fields: BTreeMap<String, PersonField> = [
        ("name", person_field("姓名", "")),
        ("gender", person_field("性别", "男")),
        ("age", person_field("年龄", "27")),
        ("phone", person_field("电话", "131xxxx8888")),
        ("email", person_field("邮箱", "admin@google.com")),
        ("wechat", person_field("微信", "0123456789")),
        ("github", person_field("Github", "https://github.com/wzd")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    ResumeDocument {
        title: ResumeTitle {
            title: "简历标题".to_string(),
            subtitle: Some("简历模板".to_string()),
            align: None,
        },
        job_intention: JobIntention {
            enabled: true,
            position: "Java高级开发工程师".to_string(),
            work_years: 5,
            city: "北京".to_string(),
            fields: JobIntentionFields {
                work_years: true,
                position: true,
                city: true,
                salary: false,
                custom: false,
            },
            order: strings(&JOB_INTENTION_ORDER),
            salary: Some(String::new()),
            custom: Some(CustomField {
                title: "自定义".to_string(),
                value: String::new(),
            }),
        },
        person_info: PersonInfo {
            enabled: true,
            preview: PersonPreview {
                avatar_shape: AvatarShape::Circle,
                columns: 1,
                show_labels: true,
            },
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            fields,
            order: strings(&PERSON_FIELD_ORDER),
            name: "张三".to_string(),
            gender: "男".to_string(),
            age: 27,
            phone: "131xxxx8888".to_string(),
            email: "admin@google.com".to_string(),
            wechat: "0123456789".to_string(),
            github: "https://github.com/wzd".to_string(),
        },
        modules_order: strings(&BUILT_IN_MODULES),
        modules: ResumeModules {
            custom: BTreeMap::new(),
            education: list_module(
                "教育背景",
                "🎓",
                vec![EducationItem {
                    id: uid(),
                    school: "示例大学".to_string(),
                    major: "计算机科学与技术".to_string(),
                    degree: "本科".to_string(),
                    start: "2017-09".to_string(),
                    end: "2021-06".to_string(),
                    rows: None,
                }],
            ),
            skills: list_module(
                "专业技能",
                "🛠️",
                vec![SkillsItem {
                    id: uid(),
                    name: "Vue / TypeScript".to_string(),
                    level: Some("熟练".to_string()),
                    description: Some("熟悉 Vue3 生态，能独立完成中后台页面开发".to_string()),
                    rows: None,
                }],
            ),
            work_exp: list_module(
                "工作经历",
                "💼",
                vec![WorkExpItem {
                    id: uid(),
                    company: "示例科技".to_string(),
                    title: "前端开发".to_string(),
                    start: "2021-07".to_string(),
                    end: "至今".to_string(),
                    city: Some("北京".to_string()),
                    highlights: strings(&["负责核心业务模块开发", "推动组件化与工程化落地"]),
                    rows: None,
                }],
            ),
            project_exp: list_module(
                "项目经历",
                "📌",
                vec![ProjectExpItem {
                    id: uid(),
                    name: "示例项目".to_string(),
                    role: Some("核心开发".to_string()),
                    start: "2022-01".to_string(),
                    end: "2022-06".to_string(),
                    description: "项目简介...".to_string(),
                    highlights: strings(&["负责需求拆解与实现", "性能优化与体验提升"]),
                    link: Some(String::new()),
                    rows: None,
                }],
            ),
            self_intro: SelfIntroModule {
                enabled: true,
                title: "自我评价".to_string(),
                icon: Some("📝".to_string()),
                time: Some(ModuleTime::empty_range()),
                rows: Some(Vec::new()),
                value: SelfIntro {
                    enabled: true,
                    text: "热爱技术，学习能力强，沟通协作良好。".to_string(),
                },
            },
        },
    }
}
