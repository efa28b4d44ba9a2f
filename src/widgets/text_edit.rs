use {dashr_ui_core::font::Font, std::borrow::Cow};

/// Single-line editing state shared by the text widgets.
///
/// The cursor is a char index (`0..=len`), never a byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    text: String,
    cursor: usize,
    focused: bool,
    blink_timer: f32,
    cursor_visible: bool,
    max_length: usize,
    pub password: bool,
    scroll_x: f32,
}

impl Default for TextEdit {
    fn default() -> Self {
        TextEdit::new("")
    }
}

impl TextEdit {
    pub const DEFAULT_MAX_LENGTH: usize = 100;

    /// Starts with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        let mut edit = TextEdit {
            text: String::new(),
            cursor: 0,
            focused: false,
            blink_timer: 0.0,
            cursor_visible: true,
            max_length: TextEdit::DEFAULT_MAX_LENGTH,
            password: false,
            scroll_x: 0.0,
        };
        edit.set_text(text);
        edit.cursor = edit.len();
        edit
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[inline]
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    #[inline]
    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Changes the limit, truncating the text if needed.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
        let text = self.text.clone();
        self.set_text(&text);
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.cursor_visible = true;
            self.blink_timer = 0.0;
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text.char_indices().nth(cursor).map_or(self.text.len(), |(index, _)| index)
    }

    /// Replaces the text, truncated to the length limit. Returns whether it changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        let truncated: String = text.chars().take(self.max_length).collect();
        if truncated == self.text {
            return false;
        }
        self.text = truncated;
        self.cursor = self.cursor.min(self.len());
        true
    }

    /// Inserts at the cursor; refuses input that would exceed the length limit.
    pub fn insert(&mut self, input: &str) -> bool {
        let count = input.chars().count();
        if count == 0 || self.len() + count > self.max_length {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, input);
        self.cursor += count;
        true
    }

    /// Removes the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Removes the char after the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        self.cursor = target.max(0).min(self.len() as isize) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.len());
    }

    /// Text as shown; masked with `*` in password mode.
    pub fn display_text(&self) -> Cow<'_, str> {
        if self.password {
            Cow::Owned("*".repeat(self.len()))
        } else {
            Cow::Borrowed(&self.text)
        }
    }

    /// Advances the blink timer while focused.
    pub fn update_blink(&mut self, dt: f32, interval: f32) {
        if !self.focused {
            return;
        }
        self.blink_timer += dt;
        if self.blink_timer >= interval {
            self.cursor_visible = !self.cursor_visible;
            self.blink_timer = 0.0;
        }
    }

    /// Distance from the text origin to the caret at char index `cursor`.
    fn offset_of(&self, font: &Font, scale: f32, cursor: usize) -> f32 {
        if cursor == 0 {
            return 0.0;
        }
        let shown = self.display_text();
        let end = shown.char_indices().nth(cursor).map_or(shown.len(), |(index, _)| index);
        font.measure_text(&shown[..end], scale) + font.spacing(scale)
    }

    /// Distance from the text origin to the caret.
    pub fn cursor_offset(&self, font: &Font, scale: f32) -> f32 {
        self.offset_of(font, scale, self.cursor)
    }

    /// Char index whose caret position is closest to `x`, measured from the text origin.
    pub fn index_at(&self, font: &Font, scale: f32, x: f32) -> usize {
        (0..=self.len())
            .map(|cursor| (cursor, (self.offset_of(font, scale, cursor) - x).abs()))
            .fold((0, f32::INFINITY), |best, candidate| if candidate.1 < best.1 { candidate } else { best })
            .0
    }

    /// Scrolls horizontally so the caret lies within `width`.
    pub fn ensure_cursor_visible(&mut self, font: &Font, scale: f32, width: f32) {
        let caret = self.cursor_offset(font, scale);
        if font.measure_text(&self.display_text(), scale) <= width {
            self.scroll_x = 0.0;
        } else if caret - self.scroll_x > width {
            self.scroll_x = caret - width;
        } else if caret < self.scroll_x {
            self.scroll_x = caret;
        }
    }
}
