//! Editable text fields.

use {
    super::text_edit::TextEdit,
    dashr_ui_core::{
        display::{Point, Rect, Size},
        event::{ENTER, TEXT_CHANGE, VALUE_CHANGE},
        input::{InputEvent, Key, MouseButton},
        text::draw_text,
        tree::{DrawCx, FrameCx, NodeCx, Widget},
    },
};

/// Applies focus clicks and editing keys to `edit`.
///
/// `accept` filters committed text before insertion; rejected text is still
/// consumed. Returns whether the event was consumed and, if the text changed,
/// the text before the change.
fn apply_edit(
    edit: &mut TextEdit,
    cx: &mut FrameCx<'_>,
    event: &InputEvent,
    accept: impl Fn(&TextEdit, &str) -> bool,
) -> (bool, Option<String>) {
    let before = edit.text().to_owned();
    let consumed = match event {
        InputEvent::PointerDown { pos, button: MouseButton::Left } => {
            if cx.contains_point(*pos) {
                edit.set_focus(true);
                let bounds = cx.absolute_rect();
                let padding = cx.env.config.metrics.padding * cx.env.ui_scale;
                let x = pos.x - bounds.origin.x - padding + edit.scroll_x();
                let index = edit.index_at(cx.env.font, cx.env.text_scale(), x);
                edit.set_cursor(index);
                true
            } else {
                edit.set_focus(false);
                false
            }
        }
        InputEvent::KeyDown { key, modifiers } if edit.is_focused() => match key {
            Key::Backspace => {
                edit.backspace();
                true
            }
            Key::Delete => {
                edit.delete();
                true
            }
            Key::Left => {
                edit.move_cursor(-1);
                true
            }
            Key::Right => {
                edit.move_cursor(1);
                true
            }
            Key::Home => {
                edit.move_home();
                true
            }
            Key::End => {
                edit.move_end();
                true
            }
            key if key.is_enter() => {
                let event = cx.event(ENTER).with("text", edit.text());
                cx.trigger(event);
                true
            }
            // select-all has no selection to make; it moves to the end
            Key::Char('a') if modifiers.ctrl => {
                edit.move_end();
                true
            }
            _ => false,
        },
        InputEvent::TextInput { text } if edit.is_focused() => {
            if text.is_empty() || text.chars().any(char::is_control) {
                false
            } else {
                if accept(edit, text) {
                    edit.insert(text);
                }
                true
            }
        }
        _ => false,
    };

    let changed = if edit.text() != before { Some(before) } else { None };
    (consumed, changed)
}

/// Draws the field frame, the (scrolled) text or placeholder, and the caret.
fn draw_field(cx: &mut DrawCx<'_>, edit: &TextEdit, placeholder: &str) {
    let theme = cx.env.theme();
    let metrics = &cx.env.config.metrics;
    let padding = metrics.padding * cx.env.ui_scale;
    let scale = cx.env.text_scale();
    let line = cx.env.font.line_height(scale);
    let bounds = cx.absolute_rect();

    cx.display.fill_rect(bounds, theme.surface.color());
    let border = if edit.is_focused() { theme.primary.color() } else { theme.border.color() };
    cx.display.stroke_rect(bounds, border, metrics.border_width * cx.env.ui_scale);

    let inner = Rect::new(
        Point::new(bounds.origin.x + padding, bounds.origin.y),
        Size::new((bounds.size.width - padding * 2.0).max(0.0), bounds.size.height),
    );
    let text_y = bounds.origin.y + ((bounds.size.height - line) / 2.0).floor();
    let origin = Point::new(inner.origin.x - edit.scroll_x(), text_y);

    cx.display.save();
    cx.display.clip(inner);
    if !edit.is_empty() {
        let color = if cx.is_enabled() { theme.text_primary.color() } else { theme.text_disabled.color() };
        draw_text(cx.display, cx.env.font, &edit.display_text(), origin, scale, color);
    } else if !edit.is_focused() {
        draw_text(cx.display, cx.env.font, placeholder, origin, scale, theme.text_secondary.color());
    }
    if edit.is_focused() && edit.is_cursor_visible() && cx.is_enabled() {
        let x = (origin.x + edit.cursor_offset(cx.env.font, scale)).floor();
        cx.display.fill_rect(Rect::new(Point::new(x, text_y), Size::new(1.0, line)), theme.text_primary.color());
    }
    cx.display.restore();
}

fn update_field(edit: &mut TextEdit, cx: &mut FrameCx<'_>, dt: f32) {
    edit.update_blink(dt, cx.env.config.animation.cursor_blink_interval);
    let padding = cx.env.config.metrics.padding * cx.env.ui_scale;
    let width = (cx.rect().size.width - padding * 2.0).max(0.0);
    edit.ensure_cursor_visible(cx.env.font, cx.env.text_scale(), width);
}

fn text_changed(cx: &mut NodeCx<'_>, text: &str, old_text: String) {
    let event = cx.event(TEXT_CHANGE).with("text", text).with("old_text", old_text);
    cx.trigger(event);
}

/// A single-line text field firing `text_change` and `enter`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    edit: TextEdit,
    pub placeholder: String,
}

impl TextInput {
    pub fn new(text: &str) -> Self {
        TextInput { edit: TextEdit::new(text), placeholder: String::new() }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.edit.set_max_length(max_length);
        self
    }

    /// Masks the text with `*`.
    pub fn password(mut self) -> Self {
        self.edit.password = true;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        self.edit.text()
    }

    #[inline]
    pub fn edit(&self) -> &TextEdit {
        &self.edit
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.edit.set_focus(focused);
    }

    pub fn set_text(&mut self, cx: &mut NodeCx<'_>, text: &str) {
        let old = self.edit.text().to_owned();
        if self.edit.set_text(text) {
            text_changed(cx, self.edit.text(), old);
        }
    }
}

impl Widget for TextInput {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        update_field(&mut self.edit, cx, dt);
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        let (consumed, changed) = apply_edit(&mut self.edit, cx, event, |_, _| true);
        if let Some(old) = changed {
            text_changed(cx, self.edit.text(), old);
        }
        consumed
    }

    fn enabled_changed(&mut self, enabled: bool) {
        if !enabled {
            self.edit.set_focus(false);
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        draw_field(cx, &self.edit, &self.placeholder);
    }
}

/// A numeric field. Text is parsed on every change, clamped, and rewritten in
/// canonical form when clamping altered it.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberInput {
    edit: TextEdit,
    value: f64,
    min: Option<f64>,
    max: Option<f64>,
    pub step: f64,
    decimal_places: usize,
}

impl NumberInput {
    /// An integer field.
    pub fn new(value: f64) -> Self {
        NumberInput::decimal(value, 0)
    }

    /// A field showing `places` decimals and accepting a decimal point.
    pub fn decimal(value: f64, places: usize) -> Self {
        let mut input =
            NumberInput { edit: TextEdit::new(""), value, min: None, max: None, step: 1.0, decimal_places: places };
        input.reformat();
        input
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.reformat();
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    fn reformat(&mut self) {
        self.value = self.normalize(self.value);
        let text = self.format(self.value);
        self.edit.set_text(&text);
        self.edit.move_end();
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn text(&self) -> &str {
        self.edit.text()
    }

    #[inline]
    pub fn edit(&self) -> &TextEdit {
        &self.edit
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.edit.set_focus(focused);
    }

    #[inline]
    fn is_float(&self) -> bool {
        self.decimal_places > 0
    }

    pub fn format(&self, value: f64) -> String {
        if self.is_float() {
            format!("{:.*}", self.decimal_places, value)
        } else {
            format!("{}", value.trunc() as i64)
        }
    }

    /// Integers too large for `i64` read as `i64::MAX` (or `MIN`), so they clamp like any other out of range value.
    pub fn parse(&self, text: &str) -> Option<f64> {
        if self.is_float() {
            return text.parse::<f64>().ok().filter(|value| value.is_finite());
        }
        match text.parse::<i64>() {
            Ok(value) => Some(value as f64),
            Err(_) => {
                let digits = text.strip_prefix('-').unwrap_or(text);
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    None
                } else if text.starts_with('-') {
                    Some(i64::MIN as f64)
                } else {
                    Some(i64::MAX as f64)
                }
            }
        }
    }

    pub fn clamp(&self, mut value: f64) -> f64 {
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    fn normalize(&self, value: f64) -> f64 {
        let value = self.clamp(value);
        if self.is_float() {
            value
        } else {
            value.trunc()
        }
    }

    /// Whether `input` may be typed into `text`.
    fn accepts(min: Option<f64>, float: bool, text: &str, input: &str) -> bool {
        let negative_allowed = min.map_or(true, |min| min < 0.0);
        let mut has_point = text.contains('.');
        input.chars().all(|c| match c {
            '0'..='9' => true,
            '.' if float && !has_point => {
                has_point = true;
                true
            }
            '-' => negative_allowed,
            _ => false,
        })
    }

    /// Sets the value (clamped), rewriting the text and firing `value_change`.
    pub fn set_value(&mut self, cx: &mut NodeCx<'_>, value: f64) {
        let value = self.normalize(value);
        let old_text = self.edit.text().to_owned();
        let text = self.format(value);
        if self.edit.set_text(&text) {
            text_changed(cx, self.edit.text(), old_text);
        }
        self.edit.move_end();
        self.commit(cx, value);
    }

    pub fn increment(&mut self, cx: &mut NodeCx<'_>) {
        let value = self.value + self.step;
        self.set_value(cx, value);
    }

    pub fn decrement(&mut self, cx: &mut NodeCx<'_>) {
        let value = self.value - self.step;
        self.set_value(cx, value);
    }

    fn commit(&mut self, cx: &mut NodeCx<'_>, value: f64) {
        let old = std::mem::replace(&mut self.value, value);
        if old != value {
            let event = cx.event(VALUE_CHANGE).with("value", value).with("old_value", old);
            cx.trigger(event);
        }
    }

    /// Re-reads the value after the text was edited.
    fn text_edited(&mut self, cx: &mut NodeCx<'_>) {
        let parsed = match self.parse(self.edit.text()) {
            Some(parsed) => parsed,
            None => return,
        };
        let clamped = self.clamp(parsed);
        if clamped != parsed {
            let text = self.format(clamped);
            self.edit.set_text(&text);
        }
        self.commit(cx, clamped);
    }
}

impl Widget for NumberInput {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        update_field(&mut self.edit, cx, dt);
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown { key: Key::Up, .. } if self.edit.is_focused() => {
                self.increment(cx);
                return true;
            }
            InputEvent::KeyDown { key: Key::Down, .. } if self.edit.is_focused() => {
                self.decrement(cx);
                return true;
            }
            _ => {}
        }

        let (min, float) = (self.min, self.is_float());
        let (consumed, changed) =
            apply_edit(&mut self.edit, cx, event, |edit, input| NumberInput::accepts(min, float, edit.text(), input));
        if let Some(old) = changed {
            self.text_edited(cx);
            if self.edit.text() != old {
                text_changed(cx, self.edit.text(), old);
            }
        }
        consumed
    }

    fn enabled_changed(&mut self, enabled: bool) {
        if !enabled {
            self.edit.set_focus(false);
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        draw_field(cx, &self.edit, "");
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::widgets::testing::{record, rect, Harness},
        dashr_ui_core::{
            event::EventValue,
            input::Modifiers,
            tree::{NodeId, UiTree},
        },
    };

    fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn field(tree: &mut UiTree, widget: impl Widget) -> NodeId {
        tree.insert(widget, rect(0.0, 0.0, 200.0, 28.0))
    }

    #[test]
    fn test_typing_requires_focus() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, TextInput::new(""));
        let changes = record(&mut tree, input, TEXT_CHANGE);

        assert!(!tree.dispatch(input, &InputEvent::text("a"), &env));
        assert!(tree.dispatch(input, &InputEvent::left_down(50.0, 10.0), &env));
        assert!(tree.dispatch(input, &InputEvent::text("ab"), &env));
        assert!(tree.dispatch(input, &key(Key::Left), &env));
        assert!(tree.dispatch(input, &InputEvent::text("c"), &env));
        assert_eq!(tree.widget::<TextInput>(input).unwrap().text(), "acb");

        assert!(tree.dispatch(input, &key(Key::Backspace), &env));
        assert!(tree.dispatch(input, &key(Key::Delete), &env));
        assert_eq!(tree.widget::<TextInput>(input).unwrap().text(), "a");
        // nothing left to delete, but the key is still taken
        assert!(tree.dispatch(input, &key(Key::Delete), &env));

        let changes = changes.borrow();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[1].get("old_text").and_then(EventValue::as_str), Some("ab"));
        assert_eq!(changes[1].get("text").and_then(EventValue::as_str), Some("acb"));
    }

    #[test]
    fn test_click_outside_blurs() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, TextInput::new("abc"));

        tree.dispatch(input, &InputEvent::left_down(50.0, 10.0), &env);
        assert!(tree.widget::<TextInput>(input).unwrap().edit().is_focused());
        assert!(!tree.dispatch(input, &InputEvent::left_down(500.0, 10.0), &env));
        assert!(!tree.widget::<TextInput>(input).unwrap().edit().is_focused());
        assert!(!tree.dispatch(input, &key(Key::Backspace), &env));
    }

    #[test]
    fn test_click_places_cursor() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, TextInput::new("aaaa"));

        // padding 8, caret after the first glyph sits at 5
        tree.dispatch(input, &InputEvent::left_down(14.0, 10.0), &env);
        assert_eq!(tree.widget::<TextInput>(input).unwrap().edit().cursor(), 1);
    }

    #[test]
    fn test_enter_and_select_all() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, TextInput::new("name"));
        let enters = record(&mut tree, input, ENTER);

        tree.dispatch(input, &InputEvent::left_down(10.0, 10.0), &env);
        tree.dispatch(input, &key(Key::Home), &env);
        assert!(tree.dispatch(input, &InputEvent::KeyDown { key: Key::Char('a'), modifiers: Modifiers::CTRL }, &env));
        assert_eq!(tree.widget::<TextInput>(input).unwrap().edit().cursor(), 4);
        assert!(!tree.dispatch(input, &key(Key::Char('a')), &env));

        assert!(tree.dispatch(input, &key(Key::KeypadEnter), &env));
        assert_eq!(enters.borrow().len(), 1);
        assert_eq!(enters.borrow()[0].get("text").and_then(EventValue::as_str), Some("name"));
    }

    #[test]
    fn test_number_set_value_clamps_and_rewrites() {
        let mut tree = UiTree::new();
        let input = field(&mut tree, NumberInput::new(5.0).with_range(Some(0.0), Some(100.0)));
        let values = record(&mut tree, input, VALUE_CHANGE);

        tree.modify_with(input, |input: &mut NumberInput, cx| input.set_value(cx, 150.0));
        let widget = tree.widget::<NumberInput>(input).unwrap();
        assert_eq!(widget.value(), 100.0);
        assert_eq!(widget.text(), "100");
        assert_eq!(values.borrow().len(), 1);
        assert_eq!(values.borrow()[0].get("old_value"), Some(&EventValue::Float(5.0)));
    }

    #[test]
    fn test_number_typing_filters_and_clamps() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, NumberInput::new(1.0).with_range(Some(0.0), Some(100.0)));

        tree.dispatch(input, &InputEvent::left_down(150.0, 10.0), &env);
        // rejected characters are swallowed
        assert!(tree.dispatch(input, &InputEvent::text("x"), &env));
        assert!(tree.dispatch(input, &InputEvent::text("-"), &env));
        assert!(tree.dispatch(input, &InputEvent::text("."), &env));
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().text(), "1");

        tree.dispatch(input, &InputEvent::text("2"), &env);
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().value(), 12.0);
        tree.dispatch(input, &InputEvent::text("5"), &env);
        let widget = tree.widget::<NumberInput>(input).unwrap();
        assert_eq!(widget.value(), 100.0);
        assert_eq!(widget.text(), "100");

        tree.dispatch(input, &key(Key::Down), &env);
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().text(), "99");
    }

    #[test]
    fn test_number_text_change_reports_clamped_text() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, NumberInput::new(1.0).with_range(Some(0.0), Some(100.0)));
        let changes = record(&mut tree, input, TEXT_CHANGE);

        tree.dispatch(input, &InputEvent::left_down(150.0, 10.0), &env);
        tree.dispatch(input, &InputEvent::text("2"), &env);
        tree.dispatch(input, &InputEvent::text("5"), &env);
        // "1000" clamps straight back to "100": no change to report
        tree.dispatch(input, &InputEvent::text("0"), &env);

        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].get("old_text").and_then(EventValue::as_str), Some("12"));
        assert_eq!(changes[1].get("text").and_then(EventValue::as_str), Some("100"));
    }

    #[test]
    fn test_number_overflow_clamps() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, NumberInput::new(1.0).with_range(Some(0.0), Some(100.0)));

        tree.dispatch(input, &InputEvent::left_down(150.0, 10.0), &env);
        tree.dispatch(input, &InputEvent::text("99999999999999999999"), &env);
        let widget = tree.widget::<NumberInput>(input).unwrap();
        assert_eq!(widget.value(), 100.0);
        assert_eq!(widget.text(), "100");

        let unbounded = NumberInput::new(0.0);
        assert_eq!(unbounded.parse("-99999999999999999999"), Some(i64::MIN as f64));
        assert_eq!(unbounded.parse("12-"), None);
    }

    #[test]
    fn test_decimal_number() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let input = field(&mut tree, NumberInput::decimal(0.5, 2).with_step(0.25));
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().text(), "0.50");

        tree.dispatch(input, &InputEvent::left_down(150.0, 10.0), &env);
        tree.dispatch(input, &key(Key::Up), &env);
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().text(), "0.75");
        // a second point is refused, a minus sign is allowed without a minimum
        tree.dispatch(input, &InputEvent::text("."), &env);
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().text(), "0.75");
        tree.dispatch(input, &key(Key::Home), &env);
        tree.dispatch(input, &InputEvent::text("-"), &env);
        assert_eq!(tree.widget::<NumberInput>(input).unwrap().value(), -0.75);
    }
}
