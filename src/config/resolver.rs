use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{EditorAction, GlobalAction, NavAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions using the configured keybindings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Suspend => &kb.suspend,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    fn editor(&self, action: EditorAction) -> &KeyBinding {
        let kb = &self.keybindings.editor;
        match action {
            EditorAction::Save => &kb.save,
            EditorAction::Blur => &kb.blur,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_editor(&self, event: &KeyEvent, action: EditorAction) -> bool {
        self.editor(action).matches(event)
    }

    pub fn display_editor(&self, action: EditorAction) -> String {
        self.editor(action).display()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_default_bindings() {
        let resolver = KeyResolver::default();
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        assert!(resolver.matches_global(&ctrl('c'), GlobalAction::Quit));
        assert!(resolver.matches_editor(&ctrl('s'), EditorAction::Save));
        assert!(resolver.matches_editor(
            &KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            EditorAction::Blur
        ));
        assert!(resolver.matches_nav(
            &KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE),
            NavAction::Down
        ));
        assert!(!resolver.matches_global(
            &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE),
            GlobalAction::Quit
        ));
    }

    #[test]
    fn test_display() {
        let resolver = KeyResolver::default();
        assert_eq!(resolver.display_editor(EditorAction::Save), "ctrl+s");
        assert_eq!(resolver.display_nav(NavAction::Up), "k/↑");
    }
}
