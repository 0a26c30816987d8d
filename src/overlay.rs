//! Console text-edit overlay
//!
//! A one-line editor that prints itself to the terminal after every
//! mutation, rendering the cell under the cursor in reverse video. While
//! the overlay is active it absorbs text input (as a
//! [`CharacterListener`]) and, through [`EditorKeys`], every key event,
//! so nothing leaks through to gameplay bindings mid-edit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use tracing::info;

use crate::input::{CharacterListener, Key, KeyAction, KeyConsumer, Modifiers};

struct Buffer {
    chars: Vec<char>,
    /// Insertion point, in 0..=chars.len()
    cursor: usize,
}

impl Buffer {
    fn render(&self) -> String {
        let before: String = self.chars[..self.cursor].iter().collect();
        if self.cursor == self.chars.len() {
            return format!("{before}{}", " ".reverse());
        }
        let at: String = self.chars[self.cursor..=self.cursor].iter().collect();
        let after: String = self.chars[self.cursor + 1..].iter().collect();
        format!("{before}{}{after}", at.reverse())
    }
}

/// Line editor over Unicode scalars
pub struct TextEdit {
    buffer: Mutex<Buffer>,
    active: AtomicBool,
}

impl TextEdit {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Buffer {
                chars: Vec::new(),
                cursor: 0,
            }),
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn insert(&self, ch: char) {
        let mut buffer = self.buffer.lock().expect("overlay buffer lock");
        let at = buffer.cursor;
        buffer.chars.insert(at, ch);
        buffer.cursor += 1;
        println!("{}", buffer.render());
    }

    /// Remove the scalar under the cursor; no-op at the end of the line
    pub fn delete(&self) {
        let mut buffer = self.buffer.lock().expect("overlay buffer lock");
        if buffer.cursor == buffer.chars.len() {
            return;
        }
        let at = buffer.cursor;
        buffer.chars.remove(at);
        println!("{}", buffer.render());
    }

    /// Remove the scalar before the cursor; no-op at the start
    pub fn backspace(&self) {
        let mut buffer = self.buffer.lock().expect("overlay buffer lock");
        if buffer.cursor == 0 {
            return;
        }
        buffer.cursor -= 1;
        let at = buffer.cursor;
        buffer.chars.remove(at);
        println!("{}", buffer.render());
    }

    pub fn move_left(&self) {
        let mut buffer = self.buffer.lock().expect("overlay buffer lock");
        if buffer.cursor == 0 {
            return;
        }
        buffer.cursor -= 1;
        println!("{}", buffer.render());
    }

    pub fn move_right(&self) {
        let mut buffer = self.buffer.lock().expect("overlay buffer lock");
        if buffer.cursor == buffer.chars.len() {
            return;
        }
        buffer.cursor += 1;
        println!("{}", buffer.render());
    }

    /// Current buffer contents
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .expect("overlay buffer lock")
            .chars
            .iter()
            .collect()
    }

    /// Current cursor position in scalars
    pub fn cursor(&self) -> usize {
        self.buffer.lock().expect("overlay buffer lock").cursor
    }
}

impl Default for TextEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterListener for TextEdit {
    fn serve_character(&self, ch: char) {
        if self.is_active() {
            self.insert(ch);
        }
    }
}

/// Key-chain stage that drives a [`TextEdit`]
///
/// Gets first refusal on every key event. In text mode everything is
/// consumed: Escape leaves text mode, Backspace/Delete/Left/Right edit,
/// and the rest is swallowed so it cannot trigger gameplay bindings.
/// Outside text mode only the toggle key is consumed, entering text
/// mode on press.
pub struct EditorKeys {
    overlay: Arc<TextEdit>,
    toggle: Key,
    on_mode_change: Option<Box<dyn Fn(bool) + Send + Sync>>,
}

impl EditorKeys {
    pub fn new(overlay: Arc<TextEdit>, toggle: Key) -> Self {
        Self {
            overlay,
            toggle,
            on_mode_change: None,
        }
    }

    /// Hook invoked with the new mode whenever text mode flips
    pub fn on_mode_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_mode_change = Some(Box::new(hook));
        self
    }

    pub fn set_text_mode(&self, text_mode: bool) {
        self.overlay.set_active(text_mode);
        if let Some(hook) = &self.on_mode_change {
            hook(text_mode);
        }
        if text_mode {
            info!("entering text mode");
        } else {
            info!("exiting text mode");
        }
    }
}

impl KeyConsumer for EditorKeys {
    fn name(&self) -> &str {
        "editor"
    }

    fn consume_key(&self, key: Key, action: KeyAction, _mods: Modifiers) -> bool {
        if self.overlay.is_active() {
            if action != KeyAction::Press && action != KeyAction::Repeat {
                return true;
            }
            match key {
                Key::Escape => self.set_text_mode(false),
                Key::Backspace => self.overlay.backspace(),
                Key::Delete => self.overlay.delete(),
                Key::Left => self.overlay.move_left(),
                Key::Right => self.overlay.move_right(),
                _ => {}
            }
            return true;
        }
        if key == self.toggle {
            if action == KeyAction::Press {
                self.set_text_mode(true);
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let edit = TextEdit::new();
        edit.insert('a');
        edit.insert('c');
        edit.move_left();
        edit.insert('b');

        assert_eq!(edit.contents(), "abc");
        assert_eq!(edit.cursor(), 2);
    }

    #[test]
    fn test_backspace_removes_before_cursor() {
        let edit = TextEdit::new();
        edit.insert('a');
        edit.insert('b');
        edit.backspace();

        assert_eq!(edit.contents(), "a");
        assert_eq!(edit.cursor(), 1);

        // At the start of the line it is a no-op
        edit.backspace();
        edit.backspace();
        assert_eq!(edit.contents(), "");
        assert_eq!(edit.cursor(), 0);
    }

    #[test]
    fn test_delete_removes_under_cursor() {
        let edit = TextEdit::new();
        edit.insert('a');
        edit.insert('b');

        // Cursor at the end: delete is a no-op
        edit.delete();
        assert_eq!(edit.contents(), "ab");

        edit.move_left();
        edit.move_left();
        edit.delete();
        assert_eq!(edit.contents(), "b");
        assert_eq!(edit.cursor(), 0);
    }

    #[test]
    fn test_cursor_movement_is_clamped() {
        let edit = TextEdit::new();
        edit.insert('x');

        edit.move_right();
        assert_eq!(edit.cursor(), 1);

        edit.move_left();
        edit.move_left();
        assert_eq!(edit.cursor(), 0);
    }

    #[test]
    fn test_characters_only_land_while_active() {
        let edit = TextEdit::new();
        edit.serve_character('a');
        assert_eq!(edit.contents(), "");

        edit.set_active(true);
        edit.serve_character('ß');
        edit.serve_character('é');
        assert_eq!(edit.contents(), "ßé");

        edit.set_active(false);
        edit.serve_character('x');
        assert_eq!(edit.contents(), "ßé");
    }

    #[test]
    fn test_editor_keys_toggle_and_consume() {
        let overlay = Arc::new(TextEdit::new());
        let editor = EditorKeys::new(overlay.clone(), Key::J);

        // Outside text mode, unrelated keys fall through
        assert!(!editor.consume_key(Key::W, KeyAction::Press, Modifiers::empty()));

        // The toggle key enters text mode and is consumed
        assert!(editor.consume_key(Key::J, KeyAction::Press, Modifiers::empty()));
        assert!(overlay.is_active());

        // In text mode everything is consumed, including unbound keys
        assert!(editor.consume_key(Key::W, KeyAction::Press, Modifiers::empty()));
        assert!(editor.consume_key(Key::W, KeyAction::Release, Modifiers::empty()));

        // Escape leaves text mode; pass-through is restored
        assert!(editor.consume_key(Key::Escape, KeyAction::Press, Modifiers::empty()));
        assert!(!overlay.is_active());
        assert!(!editor.consume_key(Key::W, KeyAction::Press, Modifiers::empty()));
    }

    #[test]
    fn test_editor_keys_edit_in_text_mode() {
        let overlay = Arc::new(TextEdit::new());
        let editor = EditorKeys::new(overlay.clone(), Key::J);

        editor.set_text_mode(true);
        overlay.serve_character('h');
        overlay.serve_character('i');

        editor.consume_key(Key::Left, KeyAction::Press, Modifiers::empty());
        editor.consume_key(Key::Backspace, KeyAction::Press, Modifiers::empty());
        assert_eq!(overlay.contents(), "i");

        editor.consume_key(Key::Delete, KeyAction::Press, Modifiers::empty());
        assert_eq!(overlay.contents(), "");
    }

    #[test]
    fn test_mode_change_hook_fires() {
        let overlay = Arc::new(TextEdit::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let editor = EditorKeys::new(overlay, Key::J).on_mode_change(move |mode| {
            sink.lock().expect("hook lock").push(mode);
        });

        editor.consume_key(Key::J, KeyAction::Press, Modifiers::empty());
        editor.consume_key(Key::Escape, KeyAction::Press, Modifiers::empty());

        assert_eq!(*seen.lock().expect("hook lock"), vec![true, false]);
    }
}
