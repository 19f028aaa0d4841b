use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Modifier, Style};
use ratatui::widgets::{List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult};

const PAGE_STEP: usize = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Selectable list driven by the navigation keybindings.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut list = Self {
            items: Vec::new(),
            state: ListState::default(),
            resolver,
        };
        list.set_items(items);
        list
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the items and highlight the first one.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = ListState::default();
        if !self.items.is_empty() {
            self.state.select(Some(0));
        }
    }

    fn select_index(&mut self, index: usize) {
        if !self.items.is_empty() {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
    }

    fn change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        match self.state.selected() {
            Some(selected) if Some(selected) != before => {
                ListEvent::Changed(self.items[selected].clone()).into()
            }
            _ => EventResult::Consumed,
        }
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<Self::Output> {
        if self.resolver.matches_nav(&key, NavAction::Select) {
            return self
                .selected()
                .cloned()
                .map_or(EventResult::Ignored, |item| ListEvent::Activated(item).into());
        }

        let before = self.state.selected();
        let current = before.unwrap_or(0);
        let last = self.items.len().saturating_sub(1);

        let target = if self.resolver.matches_nav(&key, NavAction::Down) {
            current + 1
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            current.saturating_sub(1)
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            current + PAGE_STEP
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            current.saturating_sub(PAGE_STEP)
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            0
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            last
        } else {
            return EventResult::Ignored;
        };

        self.select_index(target);
        self.change_event(before)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    impl ListRow for &'static str {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(*self)
        }
    }

    fn press(list: &mut List<&'static str>, code: KeyCode) -> EventResult<ListEvent<&'static str>> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut list = List::new(vec!["a", "b", "c"], Arc::new(KeyResolver::default()));
        assert_eq!(press(&mut list, KeyCode::Up), EventResult::Consumed);
        assert_eq!(press(&mut list, KeyCode::Down), ListEvent::Changed("b").into());
        assert_eq!(press(&mut list, KeyCode::PageDown), ListEvent::Changed("c").into());
        assert_eq!(press(&mut list, KeyCode::Down), EventResult::Consumed);
        assert_eq!(press(&mut list, KeyCode::Char('g')), ListEvent::Changed("a").into());
    }

    #[test]
    fn test_enter_activates_selection() {
        let mut list = List::new(vec!["default", "prod"], Arc::new(KeyResolver::default()));
        press(&mut list, KeyCode::Char('j'));
        assert_eq!(press(&mut list, KeyCode::Enter), ListEvent::Activated("prod").into());
    }

    #[test]
    fn test_empty_list() {
        let mut list: List<&'static str> = List::new(vec![], Arc::new(KeyResolver::default()));
        assert_eq!(press(&mut list, KeyCode::Enter), EventResult::Ignored);
        assert_eq!(press(&mut list, KeyCode::Down), EventResult::Consumed);
        assert!(list.selected().is_none());
    }

    #[test]
    fn test_set_items_resets_selection() {
        let mut list = List::new(vec!["a", "b"], Arc::new(KeyResolver::default()));
        press(&mut list, KeyCode::Down);
        list.set_items(vec!["x", "y"]);
        assert_eq!(list.selected(), Some(&"x"));
    }
}
