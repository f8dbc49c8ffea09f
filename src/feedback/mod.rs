use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ToastId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastKind {
    Pending,
    Success,
    Failure,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastEntry {
    pub id: Option<ToastId>,
    pub kind: ToastKind,
    pub message: String,
    pub auto_close_ms: Option<u32>,
    pub closable: bool,
}

impl ToastEntry {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            message: message.into(),
            auto_close_ms: match kind {
                ToastKind::Pending => None,
                ToastKind::Success | ToastKind::Failure => Some(4_000),
            },
            closable: kind != ToastKind::Pending,
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Pending, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Failure, message)
    }

    pub fn auto_close_ms(mut self, value: Option<u32>) -> Self {
        self.auto_close_ms = value;
        self
    }

    pub fn closable(mut self, value: bool) -> Self {
        self.closable = value;
        self
    }
}

const DEFAULT_MAX_VISIBLE: usize = 5;

struct ToastState {
    queue: VecDeque<ToastEntry>,
    max_visible: usize,
}

impl Default for ToastState {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

/// Transient, non-blocking message channel. Cloning shares the same queue.
#[derive(Clone, Default)]
pub struct ToastManager {
    next_id: Arc<AtomicU64>,
    state: Arc<RwLock<ToastState>>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_visible(self, value: usize) -> Self {
        self.write().max_visible = value.max(1);
        self
    }

    pub fn show(&self, mut entry: ToastEntry) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        entry.id = Some(id);

        let mut state = self.write();
        let limit = state.max_visible;
        state.queue.push_back(entry);
        while state.queue.len() > limit {
            state.queue.pop_front();
        }
        id
    }

    pub fn update(&self, id: ToastId, mut entry: ToastEntry) -> bool {
        let mut state = self.write();
        if let Some(current) = state
            .queue
            .iter_mut()
            .find(|candidate| candidate.id == Some(id))
        {
            entry.id = Some(id);
            *current = entry;
            return true;
        }
        false
    }

    /// Replaces `pending` with `entry` when it is still visible, otherwise shows `entry`.
    pub fn settle(&self, pending: Option<ToastId>, entry: ToastEntry) -> ToastId {
        match pending {
            Some(id) if self.update(id, entry.clone()) => id,
            _ => self.show(entry),
        }
    }

    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut state = self.write();
        if let Some(index) = state.queue.iter().position(|entry| entry.id == Some(id)) {
            state.queue.remove(index);
            return true;
        }
        false
    }

    pub fn dismiss_all(&self) {
        self.write().queue.clear();
    }

    pub fn list(&self) -> Vec<ToastEntry> {
        let state = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.queue.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<ToastEntry> {
        self.list().pop()
    }

    fn write(&self) -> RwLockWriteGuard<'_, ToastState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// How a rejected submission is worded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FailureNotice {
    /// Always show this text.
    Fixed(String),
    /// Show the rejection's own message, or this text when it has none.
    ErrorOrFallback(String),
}

impl FailureNotice {
    pub fn resolve(&self, rejection: Option<String>) -> String {
        match self {
            Self::Fixed(message) => message.clone(),
            Self::ErrorOrFallback(fallback) => rejection
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| fallback.clone()),
        }
    }
}

/// Notification texts for one form's submission lifecycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitNotices {
    pub pending: Option<String>,
    pub success: String,
    pub failure: FailureNotice,
}

impl SubmitNotices {
    pub fn new(success: impl Into<String>, failure: FailureNotice) -> Self {
        Self {
            pending: None,
            success: success.into(),
            failure,
        }
    }

    pub fn pending(mut self, message: impl Into<String>) -> Self {
        self.pending = Some(message.into());
        self
    }
}
