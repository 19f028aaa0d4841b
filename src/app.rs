use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::Result;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::commands::Backend;
use crate::config::{GlobalAction, KeyResolver};
use crate::message::{Message, Request};
use crate::session::{Effect, Input, Session, dispatch};
use crate::tui::{Event, Tui};
use crate::ui::{Component, ErrorBanner, Spinner, StatusBar};

const STATUS_BAR_HEIGHT: u16 = 3;

/// How the run ended.
pub enum Outcome {
    Quit,
    Saved(PathBuf),
}

enum Incoming {
    Event(Event),
    Message(Message),
    Closed,
}

pub struct App {
    session: Session,
    backend: Backend,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    spinner: Spinner,
    status_bar: StatusBar,
    outcome: Option<Outcome>,
    should_suspend: bool,
    message_tx: UnboundedSender<Message>,
    message_rx: UnboundedReceiver<Message>,
}

impl App {
    pub fn new(backend: Backend, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(resolver.clone()),
            backend,
            status_bar: StatusBar::new(resolver.clone()),
            resolver,
            theme,
            spinner: Spinner::default(),
            outcome: None,
            should_suspend: false,
            message_tx,
            message_rx,
        }
    }

    pub async fn run(mut self) -> Result<Outcome> {
        let mut tui = Tui::new(30.0, 8.0)?;
        tui.enter()?;

        while self.outcome.is_none() {
            let incoming = tokio::select! {
                event = tui.next_event() => event.map_or(Incoming::Closed, Incoming::Event),
                message = self.message_rx.recv() => message.map_or(Incoming::Closed, Incoming::Message),
            };

            match incoming {
                Incoming::Event(event) => self.handle_event(&mut tui, event)?,
                Incoming::Message(message) => {
                    debug!(message = message_kind(&message), "Command finished");
                    self.apply(Input::Message(message));
                    self.render(&mut tui)?;
                }
                Incoming::Closed => self.outcome = Some(Outcome::Quit),
            }

            if self.should_suspend {
                tui.suspend()?;
                tui.resume()?;
                self.should_suspend = false;
                self.render(&mut tui)?;
            }
        }

        tui.exit()?;
        Ok(self.outcome.unwrap_or(Outcome::Quit))
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Init | Event::Render => self.render(tui)?,
            Event::Tick => {
                if self.session.pending().is_some() {
                    self.spinner.handle_tick();
                }
            }
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Quit => self.apply(Input::Quit),
            Event::Error(e) => error!(error = %e, "Terminal event stream failed"),
            Event::Paste(text) => {
                self.apply(Input::Paste(text));
                self.render(tui)?;
            }
            Event::Key(key) => {
                if self.resolver.matches_global(&key, GlobalAction::Suspend) {
                    self.should_suspend = true;
                    return Ok(());
                }
                self.apply(Input::Key(key));
                self.render(tui)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, input: Input) {
        match dispatch(&mut self.session, input) {
            Effect::Idle => {}
            Effect::Run(request) => self.spawn(request),
            Effect::Quit => {
                info!(view = ?self.session.view(), "Quit requested");
                self.outcome = Some(Outcome::Quit);
            }
            Effect::Done(path) => self.outcome = Some(Outcome::Saved(path)),
        }
    }

    /// Run the command for `request` off the event loop.
    fn spawn(&self, request: Request) {
        let command = self.backend.command_for(request);
        let name = command.name();
        info!(command = %name, "Spawning command");
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = command.execute(tx).await {
                // Receiver is gone once the app quits.
                debug!(command = %name, error = %e, "Command result dropped");
            }
        });
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let theme = self.theme;
        let location = self.session.location();
        let keybindings = self.session.keybindings();
        if let Some(request) = self.session.pending() {
            self.spinner.set_label(request.label());
        }

        tui.draw(|frame| {
            let area = frame.area();
            let error = self.session.error().map(ErrorBanner::new);
            let error_height = error.as_ref().map_or(0, |e| e.height(area.width));
            let spinner_height = u16::from(self.session.pending().is_some());

            let [main, error_area, spinner_area, status] = Layout::vertical([
                Constraint::Min(5),
                Constraint::Length(error_height),
                Constraint::Length(spinner_height),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .areas(area);

            if let Some(banner) = &error {
                banner.render(frame, error_area, &theme);
            }
            if spinner_height > 0 {
                self.spinner.render(frame, spinner_area, &theme);
            }
            self.status_bar
                .render(frame, status, &theme, &location, &keybindings);
            self.session.render(frame, main, &theme);
        })?;
        Ok(())
    }
}

const fn message_kind(message: &Message) -> &'static str {
    match message {
        Message::NamespacesLoaded(_) => "namespaces loaded",
        Message::SecretsLoaded { .. } => "secrets loaded",
        Message::QueryFailed(_) => "query failed",
        Message::Saved(_) => "saved",
        Message::SaveFailed(_) => "save failed",
        Message::EncryptFailed(_) => "encrypt failed",
    }
}
