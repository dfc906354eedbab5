// ============================================================================
// 草稿自动保存控制器
// 纯状态机：时间由调用方注入，确认框由 ConfirmPrompt 抽象
// 文档变更通过 ResumeStore 的 revision 感知，每次变更重新开始防抖计时
// ============================================================================

use std::time::{Duration, Instant};

use crate::services::resume_store::ResumeStore;

/// 草稿保存防抖时间（毫秒）
pub const DRAFT_THROTTLE_MS: u64 = 1500;

// ============================================================================
// 用户确认
// ============================================================================

/// 确认框的用户选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Confirm,
    Cancel,
    /// 直接关闭了对话框
    Dismiss,
}

/// 确认框的图标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Info,
    Warning,
}

/// 确认框内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
}

/// 手动加载草稿前的确认
pub const LOAD_DRAFT_PROMPT: PromptRequest = PromptRequest {
    kind: PromptKind::Warning,
    title: "加载草稿",
    message: "将用草稿内容覆盖当前编辑内容，是否继续？",
    confirm_label: "加载",
    cancel_label: "取消",
};

/// 打开编辑器时的草稿恢复提示
pub const RECOVER_DRAFT_PROMPT: PromptRequest = PromptRequest {
    kind: PromptKind::Info,
    title: "草稿",
    message: "检测到未保存的草稿，是否恢复？",
    confirm_label: "恢复",
    cancel_label: "忽略",
};

/// 是/否确认框（桌面端为系统对话框，测试中为脚本化应答）
pub trait ConfirmPrompt {
    fn confirm(&mut self, request: &PromptRequest) -> PromptAnswer;
}

// ============================================================================
// 操作结果提示
// ============================================================================

/// 草稿操作完成后给用户的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftNotice {
    Saved,
    SaveFailed,
    Cleared,
    ClearFailed,
    NoDraft,
    Loaded,
    LoadFailed,
}

impl DraftNotice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Saved => "已保存到草稿",
            Self::SaveFailed => "草稿保存失败",
            Self::Cleared => "草稿已清空",
            Self::ClearFailed => "草稿清空失败",
            Self::NoDraft => "暂无草稿",
            Self::Loaded => "草稿已加载",
            Self::LoadFailed => "草稿加载失败",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::SaveFailed | Self::ClearFailed | Self::LoadFailed)
    }
}

// ============================================================================
// 控制器
// ============================================================================

/// 草稿自动保存控制器
#[derive(Debug)]
pub struct DraftAutoSave {
    delay: Duration,
    /// 有尚未写入草稿的修改
    dirty: bool,
    /// 吞掉下一次文档变更（加载草稿产生的那一次）
    skip_once: bool,
    last_revision: u64,
    deadline: Option<Instant>,
}

impl DraftAutoSave {
    /// `revision` 为创建时 Store 的文档版本
    pub fn new(delay: Duration, revision: u64) -> Self {
        Self {
            delay,
            dirty: false,
            skip_once: false,
            last_revision: revision,
            deadline: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 是否有等待触发的自动保存
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 更新防抖时间，已排期的保存不受影响
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// 感知文档变更
    ///
    /// revision 未变化时什么都不做；skip_once 置位时本次变更被吞掉并清除标志；
    /// 否则标记 dirty 并重新开始计时。
    pub fn observe(&mut self, revision: u64, now: Instant) {
        if revision == self.last_revision {
            return;
        }
        self.last_revision = revision;

        if self.skip_once {
            self.skip_once = false;
            log::debug!("跳过加载草稿引起的自动保存 (revision {})", revision);
            return;
        }

        self.dirty = true;
        self.deadline = Some(now + self.delay);
        log::debug!("草稿自动保存已排期 (revision {})", revision);
    }

    /// 推进时间：到期时写入草稿，返回本次是否执行了保存
    ///
    /// 写入失败只记录日志，dirty 保持不变。
    pub fn tick(&mut self, now: Instant, store: &ResumeStore) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.deadline = None;

        match store.save_draft() {
            Ok(_) => self.dirty = false,
            Err(e) => log::warn!("草稿自动保存失败: {}", e),
        }
        true
    }

    /// 手动保存草稿
    pub fn save_now(&mut self, store: &ResumeStore) -> DraftNotice {
        match store.save_draft() {
            Ok(_) => {
                self.dirty = false;
                DraftNotice::Saved
            }
            Err(e) => {
                log::warn!("草稿保存失败: {}", e);
                DraftNotice::SaveFailed
            }
        }
    }

    /// 手动清空草稿
    pub fn clear(&mut self, store: &ResumeStore) -> DraftNotice {
        match store.clear_draft() {
            Ok(()) => {
                self.dirty = false;
                DraftNotice::Cleared
            }
            Err(e) => {
                log::warn!("草稿清空失败: {}", e);
                DraftNotice::ClearFailed
            }
        }
    }

    /// 加载草稿并吞掉由此产生的文档变更
    fn load_skipping_autosave(&mut self, store: &mut ResumeStore, now: Instant) -> bool {
        self.skip_once = true;
        let ok = store.load_draft();
        self.observe(store.revision(), now);
        // 文档未被替换时不会有变更事件，直接复位
        self.skip_once = false;
        ok
    }

    // ------------------------------------------------------------------------
    // 加载 / 恢复草稿分两段：先检查并给出确认框内容，用户应答后再应用。
    // 确认框打开期间调用方不应持有编辑器状态，文档变更和防抖计时照常进行。
    // ------------------------------------------------------------------------

    /// 手动加载草稿的检查阶段：没有草稿时直接给出提示
    pub fn load_prompt(&self, store: &ResumeStore) -> Result<PromptRequest, DraftNotice> {
        if store.has_draft() {
            Ok(LOAD_DRAFT_PROMPT)
        } else {
            Err(DraftNotice::NoDraft)
        }
    }

    /// 手动加载草稿的应用阶段
    ///
    /// 用户取消或关闭对话框时返回 None；确认框期间草稿被清空时返回 `LoadFailed`。
    pub fn apply_load(
        &mut self,
        store: &mut ResumeStore,
        answer: PromptAnswer,
        now: Instant,
    ) -> Option<DraftNotice> {
        if answer != PromptAnswer::Confirm {
            return None;
        }

        if self.load_skipping_autosave(store, now) {
            log::info!("草稿已加载");
            Some(DraftNotice::Loaded)
        } else {
            Some(DraftNotice::LoadFailed)
        }
    }

    /// 打开编辑器时的检查阶段：需要提示恢复时返回确认框内容
    ///
    /// `should_prompt` 为 false 时不提示。
    pub fn recover_prompt(&self, store: &ResumeStore, should_prompt: bool) -> Option<PromptRequest> {
        (should_prompt && store.has_draft()).then_some(RECOVER_DRAFT_PROMPT)
    }

    /// 打开编辑器时的应用阶段，返回是否恢复了草稿
    pub fn apply_recover(&mut self, store: &mut ResumeStore, answer: PromptAnswer, now: Instant) -> bool {
        if answer != PromptAnswer::Confirm {
            return false;
        }

        let ok = self.load_skipping_autosave(store, now);
        if ok {
            self.dirty = false;
            log::info!("已恢复未保存的草稿");
        }
        ok
    }
}

impl Default for DraftAutoSave {
    fn default() -> Self {
        Self::new(Duration::from_millis(DRAFT_THROTTLE_MS), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{MemoryStore, ResumeStorage};
    use crate::utils::clock::ManualClock;
    use std::collections::VecDeque;

    /// 按脚本依次应答，并记录收到的确认请求
    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<PromptAnswer>,
        asked: Vec<PromptRequest>,
    }

    impl ScriptedPrompt {
        fn answering(answers: &[PromptAnswer]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&mut self, request: &PromptRequest) -> PromptAnswer {
            self.asked.push(*request);
            self.answers.pop_front().unwrap_or(PromptAnswer::Dismiss)
        }
    }

    fn setup() -> (ResumeStore, DraftAutoSave, Instant) {
        let store = ResumeStore::new(
            ResumeStorage::new(Box::new(MemoryStore::new())),
            Box::new(ManualClock::new(1_000)),
        );
        let autosave = DraftAutoSave::new(Duration::from_millis(DRAFT_THROTTLE_MS), store.revision());
        (store, autosave, Instant::now())
    }

    /// 模拟 command 层：检查、弹框、应用三步
    fn load(
        autosave: &mut DraftAutoSave,
        store: &mut ResumeStore,
        prompt: &mut dyn ConfirmPrompt,
        now: Instant,
    ) -> Option<DraftNotice> {
        match autosave.load_prompt(store) {
            Ok(request) => {
                let answer = prompt.confirm(&request);
                autosave.apply_load(store, answer, now)
            }
            Err(notice) => Some(notice),
        }
    }

    fn recover(
        autosave: &mut DraftAutoSave,
        store: &mut ResumeStore,
        prompt: &mut dyn ConfirmPrompt,
        should_prompt: bool,
        now: Instant,
    ) -> bool {
        match autosave.recover_prompt(store, should_prompt) {
            Some(request) => {
                let answer = prompt.confirm(&request);
                autosave.apply_recover(store, answer, now)
            }
            None => false,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_coalesces_edits() {
        let (mut store, mut autosave, t0) = setup();

        store.edit(|doc| doc.title.title = "a".to_string());
        autosave.observe(store.revision(), t0);
        assert!(autosave.is_dirty());

        store.edit(|doc| doc.title.title = "ab".to_string());
        autosave.observe(store.revision(), t0 + ms(1000));

        // 第一次变更后 1500ms，但计时已被第二次变更重置
        assert!(!autosave.tick(t0 + ms(1500), &store));
        assert!(!store.has_draft());

        assert!(autosave.tick(t0 + ms(2500), &store));
        assert!(!autosave.is_dirty());
        assert!(store.load_draft());
        assert_eq!(store.resume().title.title, "ab");
    }

    #[test]
    fn test_observe_without_change_is_noop() {
        let (store, mut autosave, t0) = setup();
        autosave.observe(store.revision(), t0);
        assert!(!autosave.is_dirty());
        assert!(!autosave.is_pending());
        assert!(!autosave.tick(t0 + ms(5000), &store));
    }

    #[test]
    fn test_manual_save_and_clear() {
        let (store, mut autosave, _) = setup();
        assert_eq!(autosave.save_now(&store), DraftNotice::Saved);
        assert!(store.has_draft());
        assert_eq!(autosave.clear(&store), DraftNotice::Cleared);
        assert!(!store.has_draft());
        assert!(!autosave.is_dirty());
    }

    #[test]
    fn test_load_without_draft_reports_and_skips_prompt() {
        let (mut store, mut autosave, t0) = setup();
        let mut prompt = ScriptedPrompt::default();
        assert_eq!(load(&mut autosave, &mut store, &mut prompt, t0), Some(DraftNotice::NoDraft));
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_load_cancelled_or_dismissed_is_noop() {
        let (mut store, mut autosave, t0) = setup();
        store.save_draft().unwrap();
        store.edit(|doc| doc.title.title = "未保存".to_string());
        let revision = store.revision();

        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Cancel, PromptAnswer::Dismiss]);
        assert_eq!(load(&mut autosave, &mut store, &mut prompt, t0), None);
        assert_eq!(load(&mut autosave, &mut store, &mut prompt, t0), None);
        assert_eq!(store.revision(), revision);
        assert_eq!(store.resume().title.title, "未保存");
        assert_eq!(prompt.asked, vec![LOAD_DRAFT_PROMPT, LOAD_DRAFT_PROMPT]);
    }

    #[test]
    fn test_load_does_not_reschedule_save() {
        let (mut store, _, t0) = setup();
        store.edit(|doc| doc.title.title = "草稿内容".to_string());
        store.save_draft().unwrap();
        store.create_new();
        let mut autosave = DraftAutoSave::new(ms(DRAFT_THROTTLE_MS), store.revision());

        let t1 = t0 + ms(10_000);
        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Confirm]);
        assert_eq!(load(&mut autosave, &mut store, &mut prompt, t1), Some(DraftNotice::Loaded));
        assert_eq!(store.resume().title.title, "草稿内容");

        // 加载本身不触发自动保存
        assert!(!autosave.is_pending());

        // 加载后的第一次真实编辑照常排期
        store.edit(|doc| doc.title.title = "继续编辑".to_string());
        autosave.observe(store.revision(), t1 + ms(100));
        assert!(autosave.is_pending());
        assert!(autosave.is_dirty());
    }

    #[test]
    fn test_recover_on_mount() {
        let (mut store, mut autosave, t0) = setup();
        store.edit(|doc| doc.title.title = "恢复我".to_string());
        store.save_draft().unwrap();
        store.create_new();
        autosave = DraftAutoSave::new(autosave.delay(), store.revision());

        // 被抑制时不提示
        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Confirm]);
        assert!(!recover(&mut autosave, &mut store, &mut prompt, false, t0));
        assert!(prompt.asked.is_empty());

        // 用户忽略
        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Cancel]);
        assert!(!recover(&mut autosave, &mut store, &mut prompt, true, t0));
        assert_eq!(store.resume().title.title, "简历标题");

        // 用户恢复
        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Confirm]);
        assert!(recover(&mut autosave, &mut store, &mut prompt, true, t0));
        assert_eq!(prompt.asked, vec![RECOVER_DRAFT_PROMPT]);
        assert_eq!(store.resume().title.title, "恢复我");
        assert!(!autosave.is_dirty());
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_edits_while_prompt_open_keep_debouncing() {
        let (mut store, mut autosave, t0) = setup();
        store.save_draft().unwrap();
        assert_eq!(autosave.load_prompt(&store), Ok(LOAD_DRAFT_PROMPT));

        // 确认框打开期间的编辑照常排期并到期保存
        store.edit(|doc| doc.title.title = "对话框期间".to_string());
        autosave.observe(store.revision(), t0);
        assert!(autosave.is_pending());
        assert!(autosave.tick(t0 + ms(DRAFT_THROTTLE_MS), &store));
        assert!(!autosave.is_dirty());

        let t1 = t0 + ms(5_000);
        assert_eq!(
            autosave.apply_load(&mut store, PromptAnswer::Confirm, t1),
            Some(DraftNotice::Loaded)
        );
        assert_eq!(store.resume().title.title, "对话框期间");
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_draft_cleared_while_prompt_open() {
        let (mut store, mut autosave, t0) = setup();
        store.save_draft().unwrap();
        assert!(autosave.load_prompt(&store).is_ok());
        assert_eq!(autosave.clear(&store), DraftNotice::Cleared);
        assert_eq!(
            autosave.apply_load(&mut store, PromptAnswer::Confirm, t0),
            Some(DraftNotice::LoadFailed)
        );
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_prompt_kinds() {
        assert_eq!(LOAD_DRAFT_PROMPT.kind, PromptKind::Warning);
        assert_eq!(RECOVER_DRAFT_PROMPT.kind, PromptKind::Info);
    }

    #[test]
    fn test_recover_without_draft_never_prompts() {
        let (mut store, mut autosave, t0) = setup();
        let mut prompt = ScriptedPrompt::answering(&[PromptAnswer::Confirm]);
        assert!(!recover(&mut autosave, &mut store, &mut prompt, true, t0));
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(DraftNotice::Saved.message(), "已保存到草稿");
        assert_eq!(DraftNotice::NoDraft.message(), "暂无草稿");
        assert!(DraftNotice::LoadFailed.is_error());
        assert!(!DraftNotice::Loaded.is_error());
    }
}
