use arena_api::{EntityKind, Operation};
use std::collections::VecDeque;

/// UI ticks a toast stays on screen (80ms ticks ≈ 4s).
pub const TOAST_TTL_TICKS: u32 = 50;
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub ttl: u32,
}

impl Toast {
    pub fn success(kind: EntityKind, operation: Operation) -> Self {
        let config = kind.config();
        let verb = match (operation, config.feminine) {
            (Operation::Create, false) => "criado",
            (Operation::Create, true) => "criada",
            (Operation::Delete, false) => "excluído",
            (Operation::Delete, true) => "excluída",
        };
        Self::new(
            ToastLevel::Success,
            format!("{} {verb} com sucesso!", capitalize(config.singular)),
        )
    }

    pub fn failure(kind: EntityKind, operation: Operation, reason: &str) -> Self {
        let verb = match operation {
            Operation::Create => "criar",
            Operation::Delete => "excluir",
        };
        Self::new(ToastLevel::Failure, format!("Erro ao {verb} {kind}: {reason}"))
    }

    fn new(level: ToastLevel, message: String) -> Self {
        Self { level, message, ttl: TOAST_TTL_TICKS }
    }
}

/// Newest toast last. Oldest ones are dropped past the cap.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Age every toast by one tick. Returns true when something expired.
    pub fn tick(&mut self) -> bool {
        let before = self.toasts.len();
        for toast in &mut self.toasts {
            toast.ttl = toast.ttl.saturating_sub(1);
        }
        self.toasts.retain(|t| t.ttl > 0);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
