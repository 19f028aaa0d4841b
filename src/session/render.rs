use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::{Session, View};
use crate::Theme;
use crate::config::{EditorAction, GlobalAction, KeyResolver, NavAction};
use crate::ui::{Component, Keybinding};

impl Session {
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        match self.view {
            View::SelectingAction => self.render_list(frame, area, theme, "Choose an action"),
            View::SelectingNamespace => self.render_list(frame, area, theme, "Choose a namespace"),
            View::SelectingSecret => self.render_list(frame, area, theme, "Choose a secret"),
            View::EnteringName => self.render_name(frame, area, theme),
            View::EditingPayload => self.render_editor(frame, area, theme),
        }
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, title: &str) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(title_style(theme))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.list.is_empty() {
            self.list.render(frame, inner, theme);
        } else if self.pending.is_none() {
            let retry = self.resolver.display_nav(NavAction::Select);
            let empty = match self.view {
                View::SelectingNamespace => "No namespaces found.",
                _ => "No secrets found.",
            };
            frame.render_widget(
                Paragraph::new(format!("{empty} Press {retry} to retry."))
                    .style(Style::default().fg(theme.overlay0())),
                inner,
            );
        }
    }

    fn render_name(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [prompt, input, hint, _] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new("Enter the name of your new secret.").style(title_style(theme)),
            prompt,
        );
        self.name_input.render(frame, input, theme);
        frame.render_widget(
            Paragraph::new(format!(
                "({} to confirm, {} to quit)",
                self.resolver.display_nav(NavAction::Select),
                self.resolver.display_global(GlobalAction::Quit)
            ))
            .style(Style::default().fg(theme.overlay1())),
            hint,
        );
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [prompt, editor, hint] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let name = self.secret_name.as_deref().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Enter Secret Data.", title_style(theme)),
                Span::styled(format!("  {name}.yaml"), Style::default().fg(theme.yellow())),
            ])),
            prompt,
        );
        self.editor.render(frame, editor, theme);
        frame.render_widget(
            Paragraph::new(format!(
                "({} to quit, {} to save)",
                self.resolver.display_global(GlobalAction::Quit),
                self.resolver.display_editor(EditorAction::Save)
            ))
            .style(Style::default().fg(theme.overlay1())),
            hint,
        );
    }

    /// Hints for the active view, shown in the status bar.
    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        match self.view {
            View::SelectingAction | View::SelectingNamespace | View::SelectingSecret => vec![
                Keybinding::new(
                    format!(
                        "{}/{}",
                        r.display_nav(NavAction::Up),
                        r.display_nav(NavAction::Down)
                    ),
                    "Navigate",
                ),
                Keybinding::new(r.display_nav(NavAction::Select), "Select"),
            ],
            View::EnteringName => vec![
                Keybinding::new(r.display_nav(NavAction::Select), "Confirm"),
                focus_hint(r, self.name_input.is_focused()),
            ],
            View::EditingPayload => vec![
                Keybinding::new(r.display_editor(EditorAction::Save), "Save & encrypt"),
                focus_hint(r, self.editor.is_focused()),
            ],
        }
    }

    /// Breadcrumbs of what has been chosen so far.
    pub fn location(&self) -> Vec<String> {
        self.namespace
            .iter()
            .chain(self.secret_name.iter())
            .cloned()
            .collect()
    }
}

fn focus_hint(resolver: &KeyResolver, focused: bool) -> Keybinding {
    if focused {
        Keybinding::new(resolver.display_editor(EditorAction::Blur), "Unfocus")
    } else {
        Keybinding::new("any key", "Focus")
    }
}

fn title_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.mauve())
        .add_modifier(Modifier::BOLD)
}
