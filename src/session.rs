//! The interactive workflow as an explicit state value.
//!
//! [`dispatch`] feeds one [`Input`] into the [`Session`] and returns the
//! [`Effect`] the driver has to carry out. It never performs I/O: side
//! effects leave as [`Request`] values and their results come back as
//! [`Message`] inputs.

mod render;
mod transitions;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::style::Style;
use ratatui::widgets::ListItem;

use crate::Theme;
use crate::config::KeyResolver;
use crate::message::{Message, Request};
use crate::secret::SecretSummary;
use crate::ui::{List, ListRow, TextArea, TextInput};

/// Exactly one view is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SelectingAction,
    SelectingNamespace,
    SelectingSecret,
    EnteringName,
    EditingPayload,
}

/// A row of the selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    CreateNew,
    UpdateExisting,
    Namespace(String),
    Secret(String),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateNew => write!(f, "Create a new secret"),
            Self::UpdateExisting => write!(f, "Update an existing secret"),
            Self::Namespace(name) | Self::Secret(name) => write!(f, "{name}"),
        }
    }
}

impl ListRow for Entry {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(self.to_string()).style(Style::default().fg(theme.text()))
    }
}

#[derive(Debug)]
pub enum Input {
    Key(KeyEvent),
    Paste(String),
    Message(Message),
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    Idle,
    Run(Request),
    Quit,
    /// The secret was written and encrypted.
    Done(PathBuf),
}

pub struct Session {
    view: View,
    list: List<Entry>,
    name_input: TextInput,
    editor: TextArea,
    /// Name of the secret being created or edited.
    secret_name: Option<String>,
    namespace: Option<String>,
    /// Last fetched secrets of `namespace`.
    secrets: Vec<SecretSummary>,
    error: Option<String>,
    /// At most one request is in flight.
    pending: Option<Request>,
    resolver: Arc<KeyResolver>,
}

impl Session {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            view: View::SelectingAction,
            list: List::new(
                vec![Entry::CreateNew, Entry::UpdateExisting],
                resolver.clone(),
            ),
            name_input: TextInput::new().with_placeholder("my-secret"),
            editor: TextArea::new(),
            secret_name: None,
            namespace: None,
            secrets: Vec::new(),
            error: None,
            pending: None,
            resolver,
        }
    }

    pub const fn view(&self) -> View {
        self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn pending(&self) -> Option<&Request> {
        self.pending.as_ref()
    }
}

/// Apply one input to the session.
pub fn dispatch(session: &mut Session, input: Input) -> Effect {
    match input {
        Input::Quit => Effect::Quit,
        Input::Key(key) => session.on_key(key),
        Input::Paste(text) => {
            session.on_paste(&text);
            Effect::Idle
        }
        Input::Message(message) => session.on_message(message),
    }
}
