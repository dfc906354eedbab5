// ============================================================================
// 编辑器会话状态
// 把 Store、自动保存控制器和导航标志绑在一起，所有会改动文档的操作
// 都经由这里执行，执行完立即通知自动保存
// ============================================================================

use std::time::{Duration, Instant};

use crate::services::autosave::{DraftAutoSave, DraftNotice, PromptAnswer, PromptRequest};
use crate::services::editor_nav::EditorNav;
use crate::services::resume_store::ResumeStore;

/// 后台线程推进自动保存的间隔
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

pub struct EditorState {
    store: ResumeStore,
    autosave: DraftAutoSave,
    nav: EditorNav,
}

impl EditorState {
    pub fn new(store: ResumeStore, autosave_delay: Duration) -> Self {
        let autosave = DraftAutoSave::new(autosave_delay, store.revision());
        Self {
            store,
            autosave,
            nav: EditorNav::new(),
        }
    }

    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    pub fn autosave(&self) -> &DraftAutoSave {
        &self.autosave
    }

    pub fn nav_mut(&mut self) -> &mut EditorNav {
        &mut self.nav
    }

    pub fn set_autosave_delay(&mut self, delay: Duration) {
        self.autosave.set_delay(delay);
    }

    /// 在 Store 上执行操作，随后把可能产生的文档变更交给自动保存
    pub fn with_store<R, F>(&mut self, now: Instant, f: F) -> R
    where
        F: FnOnce(&mut ResumeStore) -> R,
    {
        let result = f(&mut self.store);
        self.autosave.observe(self.store.revision(), now);
        result
    }

    /// 推进自动保存计时
    pub fn tick(&mut self, now: Instant) -> bool {
        self.autosave.tick(now, &self.store)
    }

    pub fn save_draft_now(&mut self) -> DraftNotice {
        self.autosave.save_now(&self.store)
    }

    pub fn clear_draft(&mut self) -> DraftNotice {
        self.autosave.clear(&self.store)
    }

    /// 手动加载草稿的检查阶段，确认框应在释放编辑器状态后再弹出
    pub fn draft_load_prompt(&self) -> Result<PromptRequest, DraftNotice> {
        self.autosave.load_prompt(&self.store)
    }

    pub fn finish_load_draft(&mut self, answer: PromptAnswer, now: Instant) -> Option<DraftNotice> {
        self.autosave.apply_load(&mut self.store, answer, now)
    }

    /// 进入编辑器时的检查阶段，导航标志只消费一次
    pub fn draft_recover_prompt(&mut self) -> Option<PromptRequest> {
        let should_prompt = !self.nav.consume_suppress_draft_recover_prompt_once();
        self.autosave.recover_prompt(&self.store, should_prompt)
    }

    pub fn finish_recover(&mut self, answer: PromptAnswer, now: Instant) -> bool {
        self.autosave.apply_recover(&mut self.store, answer, now)
    }
}
