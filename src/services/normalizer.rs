// ============================================================================
// 简历数据规范化
// 将导入的/残缺的简历 JSON 与默认文档逐块浅合并，得到结构完整的文档
// 永不失败：任何缺失或格式错误的字段都回落为默认值
// ============================================================================

use serde_json::{Map, Value};

use crate::models::resume::{ResumeDocument, BUILT_IN_MODULES, CUSTOM_MODULE_PREFIX};
use crate::utils::lenient::is_truthy;

static NULL: Value = Value::Null;

/// 取对象字段，非对象或字段缺失时返回 `Value::Null`
fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// 浅合并：以 `base` 为底，`over` 的同名键覆盖；任一侧不是对象时视为空对象
fn shallow_merge(base: &Value, over: &Value) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    if let Some(over) = over.as_object() {
        for (key, value) in over {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

/// 对 `merged[key]` 执行 `shallow_merge(base[key], partial[key])`
fn merge_block(merged: &mut Map<String, Value>, base: &Value, partial: &Value, key: &str) {
    merged.insert(key.to_string(), shallow_merge(field(base, key), field(partial, key)));
}

/// 模块显示顺序：去重（保留首次出现）后过滤无效 key，结果为空时回落默认顺序
fn reconcile_modules_order(partial: &Value, base: &Value, custom: &Value) -> Value {
    let order = match field(partial, "modulesOrder") {
        Value::Array(items) => items.as_slice(),
        _ => field(base, "modulesOrder").as_array().map(Vec::as_slice).unwrap_or(&[]),
    };

    let mut dedup: Vec<&Value> = Vec::with_capacity(order.len());
    for key in order {
        if !dedup.contains(&key) {
            dedup.push(key);
        }
    }

    let final_order: Vec<Value> = dedup
        .into_iter()
        .filter(|key| match key.as_str() {
            Some(k) if BUILT_IN_MODULES.contains(&k) => true,
            Some(k) if k.starts_with(CUSTOM_MODULE_PREFIX) => is_truthy(field(custom, k)),
            _ => false,
        })
        .cloned()
        .collect();

    if final_order.is_empty() {
        field(base, "modulesOrder").clone()
    } else {
        Value::Array(final_order)
    }
}

/// JSON 层面的规范化：`partial` 覆盖在 `base` 之上
///
/// 只对固定的嵌套块（title、jobIntention、personInfo、personInfo.preview、
/// personInfo.fields、modules、modules.custom）做一层浅合并，
/// 其余字段由顶层合并整体决定，不做递归深合并。
pub fn normalize_value(partial: &Value, base: &Value) -> Value {
    let mut merged = match shallow_merge(base, partial) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    merge_block(&mut merged, base, partial, "title");
    merge_block(&mut merged, base, partial, "jobIntention");

    // 个人信息及其预览配置、字段配置
    let base_person = field(base, "personInfo");
    let partial_person = field(partial, "personInfo");
    let mut person = match shallow_merge(base_person, partial_person) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merge_block(&mut person, base_person, partial_person, "preview");
    merge_block(&mut person, base_person, partial_person, "fields");
    let order = match field(partial_person, "order") {
        Value::Array(_) => field(partial_person, "order").clone(),
        _ => field(base_person, "order").clone(),
    };
    person.insert("order".to_string(), order);
    merged.insert("personInfo".to_string(), Value::Object(person));

    // 模块集合与自定义模块
    let base_modules = field(base, "modules");
    let partial_modules = field(partial, "modules");
    let mut modules = match shallow_merge(base_modules, partial_modules) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merge_block(&mut modules, base_modules, partial_modules, "custom");

    let custom = modules.get("custom").cloned().unwrap_or(Value::Null);
    merged.insert(
        "modulesOrder".to_string(),
        reconcile_modules_order(partial, base, &custom),
    );

    // 内置模块必须是对象，否则整体替换为默认模块
    for key in BUILT_IN_MODULES {
        let usable = modules.get(key).map(Value::is_object).unwrap_or(false);
        if !usable {
            modules.insert(key.to_string(), field(base_modules, key).clone());
        }
    }
    merged.insert("modules".to_string(), Value::Object(modules));

    Value::Object(merged)
}

/// 确保简历数据包含所有必需的默认字段
///
/// `default_factory` 每次调用生成一份完整默认文档。
/// 输入可以是任意 JSON（包括非对象），返回值总是结构完整的文档。
pub fn ensure_defaults<F>(partial: &Value, default_factory: F) -> ResumeDocument
where
    F: FnOnce() -> ResumeDocument,
{
    let base = default_factory();
    let base_value = match serde_json::to_value(&base) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("默认简历序列化失败，直接使用默认文档: {}", e);
            return base;
        }
    };

    let merged = normalize_value(partial, &base_value);
    match serde_json::from_value::<ResumeDocument>(merged) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("规范化结果无法解析为简历文档，使用默认文档: {}", e);
            base
        }
    }
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ModuleCommon;
    use crate::services::defaults::create_default_resume;
    use proptest::prelude::*;
    use serde_json::json;

    fn order_of(doc: &ResumeDocument) -> Vec<&str> {
        doc.modules_order.iter().map(String::as_str).collect()
    }

    fn renormalize(doc: &ResumeDocument) -> ResumeDocument {
        ensure_defaults(&serde_json::to_value(doc).unwrap(), create_default_resume)
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let doc = ensure_defaults(&json!({}), create_default_resume);
        let default = create_default_resume();
        assert_eq!(doc.title, default.title);
        assert_eq!(doc.modules_order, default.modules_order);
        assert_eq!(doc.modules.education.title, "教育背景");
    }

    #[test]
    fn test_non_object_input_never_fails() {
        for input in [json!(null), json!(42), json!("resume"), json!([1, 2, 3]), json!(true)] {
            let doc = ensure_defaults(&input, create_default_resume);
            assert_eq!(order_of(&doc), BUILT_IN_MODULES.to_vec());
            assert!(doc.modules.self_intro.enabled);
        }
    }

    #[test]
    fn test_nested_block_merges_one_level() {
        let doc = ensure_defaults(
            &json!({
                "title": { "title": "我的简历" },
                "personInfo": { "name": "李四", "preview": { "columns": 2 } }
            }),
            create_default_resume,
        );
        assert_eq!(doc.title.title, "我的简历");
        // 未覆盖的同级字段来自默认值
        assert_eq!(doc.title.subtitle.as_deref(), Some("简历模板"));
        assert_eq!(doc.person_info.name, "李四");
        assert_eq!(doc.person_info.preview.columns, 2);
        assert!(doc.person_info.preview.show_labels);
        assert_eq!(doc.person_info.phone, "131xxxx8888");
    }

    #[test]
    fn test_unlisted_fields_replaced_wholesale() {
        // jobIntention.fields 不在合并清单中：部分对象整体替换默认值
        let doc = ensure_defaults(
            &json!({ "jobIntention": { "fields": { "salary": true } } }),
            create_default_resume,
        );
        assert!(doc.job_intention.fields.salary);
        assert!(!doc.job_intention.fields.position);
        assert_eq!(doc.job_intention.city, "北京");
    }

    #[test]
    fn test_person_fields_merged_and_order_kept_verbatim() {
        let doc = ensure_defaults(
            &json!({
                "personInfo": {
                    "fields": { "blog": { "enabled": true, "label": "博客", "value": "x.dev" } },
                    "order": ["blog", "missing-key"]
                }
            }),
            create_default_resume,
        );
        assert!(doc.person_info.fields.contains_key("blog"));
        assert!(doc.person_info.fields.contains_key("phone"));
        assert_eq!(doc.person_info.order, vec!["blog".to_string(), "missing-key".to_string()]);

        let doc = ensure_defaults(&json!({ "personInfo": { "order": "name" } }), create_default_resume);
        assert_eq!(doc.person_info.order.len(), 7);
    }

    #[test]
    fn test_order_deduplicated() {
        let doc = ensure_defaults(
            &json!({ "modulesOrder": ["education", "education", "skills"] }),
            create_default_resume,
        );
        assert_eq!(order_of(&doc), vec!["education", "skills"]);
    }

    #[test]
    fn test_missing_custom_module_dropped() {
        let doc = ensure_defaults(
            &json!({
                "modulesOrder": ["custom-x", "custom-y", "skills"],
                "modules": { "custom": { "custom-y": { "enabled": true, "title": "证书" } } }
            }),
            create_default_resume,
        );
        assert_eq!(order_of(&doc), vec!["custom-y", "skills"]);
        assert_eq!(doc.modules.custom["custom-y"].title, "证书");
    }

    #[test]
    fn test_falsy_custom_entry_dropped() {
        let doc = ensure_defaults(
            &json!({
                "modulesOrder": ["custom-a", "education"],
                "modules": { "custom": { "custom-a": null } }
            }),
            create_default_resume,
        );
        assert_eq!(order_of(&doc), vec!["education"]);
    }

    #[test]
    fn test_bogus_order_falls_back_to_default() {
        let doc = ensure_defaults(&json!({ "modulesOrder": ["bogus"] }), create_default_resume);
        assert_eq!(order_of(&doc), BUILT_IN_MODULES.to_vec());

        let doc = ensure_defaults(&json!({ "modulesOrder": [] }), create_default_resume);
        assert_eq!(order_of(&doc), BUILT_IN_MODULES.to_vec());

        let doc = ensure_defaults(&json!({ "modulesOrder": [1, null, {}] }), create_default_resume);
        assert_eq!(order_of(&doc), BUILT_IN_MODULES.to_vec());
    }

    #[test]
    fn test_non_object_builtin_module_backfilled() {
        let doc = ensure_defaults(
            &json!({
                "modules": {
                    "education": null,
                    "skills": 3,
                    "workExp": "broken",
                    "projectExp": [1],
                    "selfIntro": { "enabled": false, "title": "关于我" }
                }
            }),
            create_default_resume,
        );
        assert_eq!(doc.modules.education.title, "教育背景");
        assert_eq!(doc.modules.skills.title, "专业技能");
        assert_eq!(doc.modules.work_exp.title, "工作经历");
        assert_eq!(doc.modules.project_exp.title, "项目经历");
        // 对象形式的模块整体保留，不做字段级回填
        assert!(!doc.modules.self_intro.enabled);
        assert_eq!(doc.modules.self_intro.title, "关于我");
        assert_eq!(doc.modules.self_intro.value.text, "");
    }

    #[test]
    fn test_custom_modules_merged_with_defaults() {
        let doc = ensure_defaults(
            &json!({ "modules": { "custom": { "custom-1": { "enabled": true, "title": "荣誉" } } } }),
            create_default_resume,
        );
        assert_eq!(
            doc.modules.custom.get("custom-1"),
            Some(&ModuleCommon {
                enabled: true,
                title: "荣誉".to_string(),
                ..ModuleCommon::default()
            })
        );
    }

    #[test]
    fn test_null_blocks_restored_from_defaults() {
        let input = json!({
            "title": null,
            "jobIntention": null,
            "personInfo": { "preview": null, "fields": null, "order": null },
            "modules": { "custom": null }
        });
        let doc = ensure_defaults(&input, create_default_resume);
        let default = create_default_resume();
        assert_eq!(doc.title, default.title);
        assert_eq!(doc.job_intention, default.job_intention);
        assert_eq!(doc.person_info, default.person_info);
        assert_eq!(doc.modules.custom, default.modules.custom);
        assert_eq!(order_of(&doc), BUILT_IN_MODULES.to_vec());
        assert_eq!(renormalize(&doc), doc);

        // 整个 personInfo 为 null 时同样回落
        let doc = ensure_defaults(&json!({ "personInfo": null }), create_default_resume);
        assert_eq!(doc.person_info, default.person_info);
    }

    #[test]
    fn test_idempotent_on_default_document() {
        let once = ensure_defaults(&json!({ "title": { "title": "A" } }), create_default_resume);
        assert_eq!(renormalize(&once), once);
    }

    // ========================================================================
    // 属性测试
    // ========================================================================

    /// 模块 key 池：内置、存在/不存在的自定义、无效值
    fn module_key_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            prop::sample::select(BUILT_IN_MODULES.to_vec()).prop_map(|k| json!(k)),
            Just(json!("custom-a")),
            Just(json!("custom-b")),
            Just(json!("bogus")),
            Just(json!(7)),
            Just(Value::Null),
        ]
    }

    /// 内置模块值：正常对象、空对象或损坏的原始值
    fn module_value_strategy() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            Just(Some(json!(1))),
            Just(Some(json!({}))),
            "[a-z]{0,8}".prop_map(|t| Some(json!({ "enabled": true, "title": t, "items": [] }))),
        ]
    }

    fn partial_document_strategy() -> impl Strategy<Value = Value> {
        (
            prop::option::of(prop::collection::vec(module_key_strategy(), 0..8)),
            prop::collection::vec(module_value_strategy(), 5),
            prop::option::of("[a-z ]{0,12}"),
            any::<bool>(),
            prop::option::of(prop::collection::vec("[a-z]{1,5}", 0..4)),
        )
            .prop_map(|(order, module_values, title, with_custom, person_order)| {
                let mut root = Map::new();
                if let Some(order) = order {
                    root.insert("modulesOrder".to_string(), Value::Array(order));
                }
                let mut modules = Map::new();
                for (key, value) in BUILT_IN_MODULES.iter().zip(module_values) {
                    if let Some(value) = value {
                        modules.insert(key.to_string(), value);
                    }
                }
                if with_custom {
                    modules.insert(
                        "custom".to_string(),
                        json!({ "custom-a": { "enabled": true, "title": "A" } }),
                    );
                }
                root.insert("modules".to_string(), Value::Object(modules));
                if let Some(title) = title {
                    root.insert("title".to_string(), json!({ "title": title }));
                }
                if let Some(person_order) = person_order {
                    root.insert("personInfo".to_string(), json!({ "order": person_order }));
                }
                Value::Object(root)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// 规范化幂等：对已规范化的文档再次规范化结果不变
        #[test]
        fn prop_normalization_idempotent(partial in partial_document_strategy()) {
            let once = ensure_defaults(&partial, create_default_resume);
            let twice = renormalize(&once);
            prop_assert_eq!(twice, once);
        }

        /// 完整性：显示顺序非空、无重复、只包含有效 key
        #[test]
        fn prop_order_complete_and_valid(partial in partial_document_strategy()) {
            let doc = ensure_defaults(&partial, create_default_resume);
            prop_assert!(!doc.modules_order.is_empty());
            for (i, key) in doc.modules_order.iter().enumerate() {
                prop_assert!(!doc.modules_order[..i].contains(key), "重复的模块 key: {}", key);
                let valid = BUILT_IN_MODULES.contains(&key.as_str())
                    || doc.modules.custom.contains_key(key);
                prop_assert!(valid, "无效的模块 key: {}", key);
            }
        }

        /// 完整性：损坏的内置模块被替换为默认模块
        #[test]
        fn prop_builtin_modules_always_usable(partial in partial_document_strategy()) {
            let merged = normalize_value(&partial, &serde_json::to_value(create_default_resume()).unwrap());
            for key in BUILT_IN_MODULES {
                prop_assert!(merged["modules"][key].is_object(), "模块 {} 不是对象", key);
            }
        }
    }
}
