// ============================================================================
// 编辑器导航状态
// ============================================================================

/// 页面间跳转时携带的一次性标志
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditorNav {
    /// 进入编辑器时不弹出草稿恢复提示（仅生效一次）
    suppress_draft_recover_prompt_once: bool,
}

impl EditorNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress_draft_recover_prompt_once(&self) -> bool {
        self.suppress_draft_recover_prompt_once
    }

    pub fn set_suppress_draft_recover_prompt_once(&mut self, value: bool) {
        self.suppress_draft_recover_prompt_once = value;
    }

    /// 读取标志并重置为 false，返回读取前的值
    pub fn consume_suppress_draft_recover_prompt_once(&mut self) -> bool {
        std::mem::take(&mut self.suppress_draft_recover_prompt_once)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_is_one_shot() {
        let mut nav = EditorNav::new();
        assert!(!nav.consume_suppress_draft_recover_prompt_once());

        nav.set_suppress_draft_recover_prompt_once(true);
        assert!(nav.suppress_draft_recover_prompt_once());
        assert!(nav.consume_suppress_draft_recover_prompt_once());
        assert!(!nav.consume_suppress_draft_recover_prompt_once());
    }
}
