//! Application state definitions

use super::forms::ContactForm;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Contact,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "ホーム",
            Self::Contact => "お問い合わせ",
        }
    }
}

/// Named scroll targets on the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Concept,
    Phases,
    Vision,
    Cta,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [Self::Concept, Self::Phases, Self::Vision, Self::Cta];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Concept => "コンセプト",
            Self::Phases => "7つのステップ",
            Self::Vision => "ビジョン",
            Self::Cta => "参加する",
        }
    }

    /// Digit key that jumps to this anchor
    pub fn shortcut(&self) -> char {
        match self {
            Self::Concept => '1',
            Self::Phases => '2',
            Self::Vision => '3',
            Self::Cta => '4',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.shortcut() == c)
    }
}

/// Fire-and-forget navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    GoTo(View),
    ScrollTo(Anchor),
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Home view
    pub home_scroll: u16,

    // Contact view focus
    pub contact_form: ContactForm,

    // Errors waiting to be shown, oldest first
    error_queue: VecDeque<String>,
}

impl AppState {
    pub fn new(contact_form: ContactForm) -> Self {
        Self {
            contact_form,
            ..Self::default()
        }
    }

    /// Scroll the home view down, stopping at `max`
    pub fn scroll_down(&mut self, lines: u16, max: u16) {
        self.home_scroll = self.home_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.home_scroll = self.home_scroll.saturating_sub(lines);
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}
