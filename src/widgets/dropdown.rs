use dashr_ui_core::{
    display::{Point, Rect, Size},
    event::SELECTION_CHANGE,
    input::{InputEvent, Key, MouseButton},
    text::draw_text,
    tree::{DrawCx, FrameCx, NodeCx, Widget},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub text: String,
    pub enabled: bool,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        DropdownOption { value: value.into(), text: text.into(), enabled: true }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A header showing the selection that opens into a scrollable option list.
///
/// The list hangs below the node's own bounds, one header height per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    options: Vec<DropdownOption>,
    selected: Option<usize>,
    hovered: Option<usize>,
    open: bool,
    scroll: usize,
    max_visible: usize,
    pub placeholder: String,
}

impl Dropdown {
    pub fn new(options: Vec<DropdownOption>) -> Self {
        Dropdown {
            options,
            selected: None,
            hovered: None,
            open: false,
            scroll: 0,
            max_visible: 8,
            placeholder: "Select...".into(),
        }
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.set_max_visible(max_visible);
        self
    }

    #[inline]
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Rows shown at once when open; at least one.
    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible.max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    #[inline]
    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&DropdownOption> {
        self.selected.and_then(|index| self.options.get(index))
    }

    #[inline]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn add_option(&mut self, option: DropdownOption) {
        self.options.push(option);
    }

    /// Removes the option at `index`, keeping the selection on the same option
    /// (or clearing it if that option was removed).
    pub fn remove_option(&mut self, index: usize) -> Option<DropdownOption> {
        if index >= self.options.len() {
            return None;
        }
        let removed = self.options.remove(index);
        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        self.hovered = None;
        self.scroll = self.scroll.min(self.max_scroll());
        if self.options.is_empty() {
            self.close();
        }
        Some(removed)
    }

    /// Selects `index` (or nothing), firing `selection_change` if it differs.
    /// Out-of-range indices are ignored.
    pub fn set_selected(&mut self, cx: &mut NodeCx<'_>, index: Option<usize>) {
        if matches!(index, Some(index) if index >= self.options.len()) || index == self.selected {
            return;
        }
        let old = std::mem::replace(&mut self.selected, index);

        let mut event = cx.event(SELECTION_CHANGE).with("index", index).with("old_index", old);
        if let Some(option) = self.selected_option() {
            event = event.with("value", option.value.as_str()).with("text", option.text.as_str());
        }
        cx.trigger(event);
    }

    pub fn open(&mut self) {
        if !self.options.is_empty() {
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.hovered = None;
    }

    fn max_scroll(&self) -> usize {
        self.options.len().saturating_sub(self.max_visible)
    }

    fn visible_rows(&self) -> usize {
        self.options.len().min(self.max_visible)
    }

    /// The option list's rectangle for a header at `header`.
    pub fn list_rect(&self, header: Rect) -> Rect {
        Rect::new(
            Point::new(header.origin.x, header.max_y()),
            Size::new(header.size.width, header.size.height * self.visible_rows() as f32),
        )
    }

    fn option_rect(&self, header: Rect, index: usize) -> Rect {
        let row = index as f32 - self.scroll as f32;
        Rect::new(
            Point::new(header.origin.x, header.max_y() + row * header.size.height),
            header.size,
        )
    }

    /// Option under `point`, when open.
    pub fn option_at(&self, header: Rect, point: Point) -> Option<usize> {
        if !self.open || !self.list_rect(header).contains(point) || header.size.height <= 0.0 {
            return None;
        }
        let row = ((point.y - header.max_y()) / header.size.height).floor() as usize;
        Some(self.scroll + row).filter(|&index| index < self.options.len())
    }

    fn scroll_to(&mut self, index: usize) {
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + self.max_visible {
            self.scroll = index + 1 - self.max_visible;
        }
    }

    fn move_hover(&mut self, down: bool) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        let next = if down {
            let start = match self.hovered {
                Some(index) if index + 1 < count => index + 1,
                _ => 0,
            };
            (start..count).find(|&index| self.options[index].enabled)
        } else {
            let start = match self.hovered {
                Some(index) if index > 0 => index - 1,
                _ => count - 1,
            };
            (0..=start).rev().find(|&index| self.options[index].enabled)
        };
        if let Some(index) = next {
            self.hovered = Some(index);
            self.scroll_to(index);
        }
    }

    fn pick(&mut self, cx: &mut NodeCx<'_>, index: Option<usize>) -> bool {
        match index {
            Some(index) if self.options.get(index).map_or(false, |option| option.enabled) => {
                self.set_selected(cx, Some(index));
                self.close();
                true
            }
            _ => false,
        }
    }
}

impl Widget for Dropdown {
    fn update(&mut self, cx: &mut FrameCx<'_>, _dt: f32) {
        if self.open {
            self.hovered = self.option_at(cx.absolute_rect(), cx.env.cursor);
        }
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        let header = cx.absolute_rect();
        match *event {
            InputEvent::PointerDown { pos, button: MouseButton::Left } => {
                if header.contains(pos) {
                    if self.open {
                        self.close();
                    } else {
                        self.open();
                    }
                    true
                } else if self.open {
                    let index = self.option_at(header, pos);
                    if self.pick(cx, index) {
                        true
                    } else {
                        self.close();
                        false
                    }
                } else {
                    false
                }
            }
            InputEvent::KeyDown { key, .. } if self.open => match key {
                Key::Escape => {
                    self.close();
                    true
                }
                Key::Enter | Key::KeypadEnter | Key::Space => {
                    let index = self.hovered;
                    self.pick(cx, index)
                }
                Key::Up | Key::Down => {
                    self.move_hover(key == Key::Down);
                    true
                }
                _ => false,
            },
            InputEvent::KeyDown { key, .. } if key.is_enter() || key == Key::Space => {
                if header.contains(cx.env.cursor) && !self.options.is_empty() {
                    self.open();
                    true
                } else {
                    false
                }
            }
            InputEvent::Wheel { delta } if self.open && self.list_rect(header).contains(cx.env.cursor) => {
                let old = self.scroll;
                let scrolled = self.scroll as f32 - delta.round();
                self.scroll = (scrolled.max(0.0) as usize).min(self.max_scroll());
                old != self.scroll
            }
            _ => false,
        }
    }

    fn enabled_changed(&mut self, enabled: bool) {
        if !enabled {
            self.close();
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let theme = cx.env.theme();
        let metrics = &cx.env.config.metrics;
        let padding = metrics.padding * cx.env.ui_scale;
        let border = metrics.border_width * cx.env.ui_scale;
        let scale = cx.env.text_scale();
        let line = cx.env.font.line_height(scale);
        let header = cx.absolute_rect();

        let background = if !cx.is_enabled() {
            theme.button_disabled.color()
        } else if self.open || cx.is_hovered() {
            theme.button_hover.color()
        } else {
            theme.button_normal.color()
        };
        cx.display.fill_rect(header, background);
        cx.display.stroke_rect(header, theme.border.color(), border);

        let (text, color) = match self.selected_option() {
            Some(option) => (option.text.as_str(), theme.text_primary.color()),
            None => (self.placeholder.as_str(), theme.text_secondary.color()),
        };
        let text_y = header.origin.y + ((header.size.height - line) / 2.0).floor();
        draw_text(cx.display, cx.env.font, text, Point::new(header.origin.x + padding, text_y), scale, color);

        // arrow, pointing down when closed
        let arrow_x = header.max_x() - padding - 6.0;
        let arrow_y = header.origin.y + (header.size.height / 2.0).floor() - 2.0;
        for row in 0..3 {
            let inset = row as f32;
            let y = if self.open { arrow_y + 2.0 - inset } else { arrow_y + inset };
            cx.display.fill_rect(
                Rect::new(Point::new(arrow_x + inset, y), Size::new(6.0 - inset * 2.0, 1.0)),
                theme.text_secondary.color(),
            );
        }
    }

    fn draw_over(&self, cx: &mut DrawCx<'_>) {
        if !self.open {
            return;
        }
        let theme = cx.env.theme();
        let padding = cx.env.config.metrics.padding * cx.env.ui_scale;
        let scale = cx.env.text_scale();
        let line = cx.env.font.line_height(scale);
        let header = cx.absolute_rect();
        let list = self.list_rect(header);

        cx.display.fill_rect(list, theme.surface.color());
        cx.display.stroke_rect(list, theme.border.color(), cx.env.config.metrics.border_width * cx.env.ui_scale);

        let end = (self.scroll + self.max_visible).min(self.options.len());
        for index in self.scroll..end {
            let option = &self.options[index];
            let row = self.option_rect(header, index);
            if self.hovered == Some(index) {
                cx.display.fill_rect(row, theme.button_hover.color());
            } else if self.selected == Some(index) {
                cx.display.fill_rect(row, theme.primary.color());
            }
            let color = if option.enabled { theme.text_primary.color() } else { theme.text_disabled.color() };
            let y = row.origin.y + ((row.size.height - line) / 2.0).floor();
            draw_text(cx.display, cx.env.font, &option.text, Point::new(row.origin.x + padding, y), scale, color);
        }

        if self.options.len() > self.max_visible {
            let track = Rect::new(Point::new(list.max_x() - 5.0, list.origin.y), Size::new(4.0, list.size.height));
            let thumb_height =
                (list.size.height * self.max_visible as f32 / self.options.len() as f32).trunc().max(20.0);
            let thumb_y = list.origin.y
                + ((list.size.height - thumb_height) * self.scroll as f32 / self.max_scroll() as f32).trunc();
            cx.display.fill_rect(track, theme.border.color());
            cx.display.fill_rect(
                Rect::new(Point::new(track.origin.x, thumb_y), Size::new(4.0, thumb_height)),
                theme.text_secondary.color(),
            );
        }
    }
}
