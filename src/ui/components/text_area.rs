use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult};

/// Multi-line text editor.
///
/// Holds one `String` per line. `col` is a char index into the current row
/// and may sit one past the last char.
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
    scroll: usize,
    focused: bool,
}

impl TextArea {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
            focused: true,
        }
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set_value(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
        self.scroll = 0;
    }

    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn focus(&mut self) {
        self.focused = true;
    }

    pub const fn blur(&mut self) {
        self.focused = false;
    }

    /// Insert pasted text at the cursor, honouring its line breaks.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for c in text.chars() {
            match c {
                '\n' => self.split_line(),
                '\t' => self.insert_char(' '),
                c if c.is_control() => {}
                c => self.insert_char(c),
            }
        }
    }

    fn current(&self) -> &str {
        &self.lines[self.row]
    }

    fn byte_index(&self, col: usize) -> usize {
        let line = self.current();
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    fn clamp_col(&mut self) {
        self.col = self.col.min(char_len(self.current()));
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    fn split_line(&mut self) {
        let at = self.byte_index(self.col);
        let tail = self.lines[self.row].split_off(at);
        self.row += 1;
        self.lines.insert(self.row, tail);
        self.col = 0;
    }

    fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_index(self.col);
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(self.current());
            self.lines[self.row].push_str(&line);
        }
    }

    fn delete(&mut self) {
        if self.col < char_len(self.current()) {
            let at = self.byte_index(self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(self.current());
        }
    }

    fn move_right(&mut self) {
        if self.col < char_len(self.current()) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        self.row = self.row.saturating_add_signed(delta).min(last);
        self.clamp_col();
    }

    fn render_line(&self, index: usize, theme: &Theme) -> Line<'static> {
        let text_style = Style::default().fg(theme.text());
        let line = &self.lines[index];
        if !self.focused || index != self.row {
            return Line::from(Span::styled(line.clone(), text_style));
        }

        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);
        let (before, after) = line.split_at(self.byte_index(self.col));
        let mut rest = after.chars();
        let under_cursor = rest.next().unwrap_or(' ');
        Line::from(vec![
            Span::styled(before.to_string(), text_style),
            Span::styled(under_cursor.to_string(), cursor_style),
            Span::styled(rest.as_str().to_string(), text_style),
        ])
    }
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl Component for TextArea {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        if !self.focused {
            return EventResult::Ignored;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.split_line(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.move_left(),
            (KeyCode::Right, _) => self.move_right(),
            (KeyCode::Up, _) => self.move_vertical(-1),
            (KeyCode::Down, _) => self.move_vertical(1),
            (KeyCode::PageUp, _) => self.move_vertical(-10),
            (KeyCode::PageDown, _) => self.move_vertical(10),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.col = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.col = char_len(self.current());
            }
            (KeyCode::Tab, _) => self.insert_str("  "),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let border = if self.focused {
            theme.lavender()
        } else {
            theme.surface1()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));

        // Keep the cursor row on screen
        let height = usize::from(block.inner(area).height).max(1);
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }

        let lines: Vec<Line> = (self.scroll..self.lines.len())
            .take(height)
            .map(|i| self.render_line(i, theme))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(area: &mut TextArea, code: KeyCode) {
        area.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(area: &mut TextArea, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                press(area, KeyCode::Enter);
            } else {
                press(area, KeyCode::Char(c));
            }
        }
    }

    #[test]
    fn test_typing_across_lines() {
        let mut area = TextArea::new();
        type_str(&mut area, "password: hunter2\napi-key: abc123");
        assert_eq!(area.value(), "password: hunter2\napi-key: abc123");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut area = TextArea::new();
        type_str(&mut area, "a\nb");
        press(&mut area, KeyCode::Home);
        press(&mut area, KeyCode::Backspace);
        assert_eq!(area.value(), "ab");
    }

    #[test]
    fn test_delete_at_end_of_line_joins_next() {
        let mut area = TextArea::new();
        area.set_value("one\ntwo");
        press(&mut area, KeyCode::Up);
        press(&mut area, KeyCode::End);
        press(&mut area, KeyCode::Delete);
        assert_eq!(area.value(), "onetwo");
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut area = TextArea::new();
        area.set_value("a: 1\nlonger: value");
        press(&mut area, KeyCode::Up);
        press(&mut area, KeyCode::Char('!'));
        assert_eq!(area.value(), "a: 1!\nlonger: value");
    }

    #[test]
    fn test_set_value_empty_keeps_one_line() {
        let mut area = TextArea::new();
        area.set_value("");
        assert_eq!(area.value(), "");
        press(&mut area, KeyCode::Char('x'));
        assert_eq!(area.value(), "x");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut area = TextArea::new();
        area.insert_str("a: 1\r\nb: 2");
        assert_eq!(area.value(), "a: 1\nb: 2");
    }

    #[test]
    fn test_blurred_area_ignores_keys() {
        let mut area = TextArea::new();
        area.blur();
        assert!(!area.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)).is_consumed());
        assert_eq!(area.value(), "");
    }
}
