use dashr_ui_core::{
    display::{Point, Rect, Size},
    event::VALUE_CHANGE,
    input::{InputEvent, Key, MouseButton},
    tree::{DrawCx, FrameCx, NodeCx, Widget},
};

/// A value constrained to `[min, max]` and snapped to `step` increments from `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    value: f32,
}

impl DragRange {
    /// A range starting at `min`. `max` below `min` is raised to `min`.
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        DragRange { min, max: max.max(min), step, value: min }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.set_value(value);
        self
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamps and snaps `value`; returns whether the stored value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let mut value = value.max(self.min).min(self.max);
        if self.step > 0.0 {
            value = self.min + ((value - self.min) / self.step).round() * self.step;
            value = value.max(self.min).min(self.max);
        }
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Position of the value within the range, `0.0..=1.0`.
    pub fn ratio(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }

    /// Unsnapped value at `ratio` of the range.
    pub fn value_at(&self, ratio: f32) -> f32 {
        self.min + ratio.max(0.0).min(1.0) * (self.max - self.min)
    }

    /// Offset of a `knob`-long handle along a `track`-long axis.
    pub fn knob_offset(&self, track: f32, knob: f32) -> f32 {
        (self.ratio() * (track - knob).max(0.0)).trunc()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    /// Minimum at the bottom.
    Vertical,
}

/// A draggable value picker.
///
/// Arrow keys nudge by one step while the pointer hovers the slider, which
/// also means a slider never needs keyboard focus.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    range: DragRange,
    orientation: Orientation,
    dragging: bool,
    /// Pointer position within the knob when the drag began.
    drag_offset: f32,
}

impl Slider {
    pub fn new(range: DragRange) -> Self {
        Slider { range, orientation: Orientation::Horizontal, dragging: false, drag_offset: 0.0 }
    }

    pub fn vertical(range: DragRange) -> Self {
        Slider { orientation: Orientation::Vertical, ..Slider::new(range) }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.range.value()
    }

    #[inline]
    pub fn range(&self) -> &DragRange {
        &self.range
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Sets the value, firing `value_change` if the snapped value differs.
    pub fn set_value(&mut self, cx: &mut NodeCx<'_>, value: f32) {
        let old = self.range.value();
        if self.range.set_value(value) {
            let event = cx.event(VALUE_CHANGE).with("value", self.range.value()).with("old_value", old);
            cx.trigger(event);
        }
    }

    /// Knob side length for a slider of `size`.
    fn knob(&self, size: Size) -> f32 {
        let cross = match self.orientation {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        };
        (cross - 4.0).max(1.0)
    }

    fn track(&self, size: Size) -> f32 {
        match self.orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Knob rectangle within absolute `bounds`.
    pub fn knob_rect(&self, bounds: Rect) -> Rect {
        let knob = self.knob(bounds.size);
        let travel = self.range.knob_offset(self.track(bounds.size), knob);
        match self.orientation {
            Orientation::Horizontal => Rect::new(
                Point::new(bounds.origin.x + travel, bounds.origin.y + 2.0),
                Size::new(knob, knob),
            ),
            Orientation::Vertical => {
                let free = (bounds.size.height - knob).max(0.0);
                Rect::new(
                    Point::new(bounds.origin.x + 2.0, bounds.origin.y + free - travel),
                    Size::new(knob, knob),
                )
            }
        }
    }

    fn along(&self, point: Point, bounds: Rect) -> f32 {
        match self.orientation {
            Orientation::Horizontal => point.x - bounds.origin.x,
            Orientation::Vertical => point.y - bounds.origin.y,
        }
    }

    fn drag_to(&mut self, cx: &mut NodeCx<'_>, pointer: Point) {
        let bounds = cx.absolute_rect();
        let knob = self.knob(bounds.size);
        let free = self.track(bounds.size) - knob;
        if free <= 0.0 {
            return;
        }
        let ratio = (self.along(pointer, bounds) - self.drag_offset) / free;
        let ratio = match self.orientation {
            Orientation::Horizontal => ratio,
            Orientation::Vertical => 1.0 - ratio,
        };
        let value = self.range.value_at(ratio);
        self.set_value(cx, value);
    }

    fn nudge(&mut self, cx: &mut NodeCx<'_>, key: Key) -> bool {
        let range = self.range;
        let (first, last) = match self.orientation {
            Orientation::Horizontal => (range.min, range.max),
            Orientation::Vertical => (range.max, range.min),
        };
        let value = match key {
            Key::Left | Key::Down => range.value() - range.step,
            Key::Right | Key::Up => range.value() + range.step,
            Key::Home => first,
            Key::End => last,
            _ => return false,
        };
        self.set_value(cx, value);
        true
    }
}

impl Widget for Slider {
    fn update(&mut self, cx: &mut FrameCx<'_>, _dt: f32) {
        if self.dragging {
            let cursor = cx.env.cursor;
            self.drag_to(cx, cursor);
        }
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { pos, button: MouseButton::Left } if cx.contains_point(pos) => {
                let bounds = cx.absolute_rect();
                let knob = self.knob_rect(bounds);
                self.dragging = true;
                if knob.contains(pos) {
                    self.drag_offset = self.along(pos, bounds) - self.along(knob.origin, bounds);
                } else {
                    self.drag_offset = self.knob(bounds.size) / 2.0;
                    self.drag_to(cx, pos);
                }
                true
            }
            InputEvent::PointerMove { pos } if self.dragging => {
                self.drag_to(cx, pos);
                true
            }
            InputEvent::PointerUp { button: MouseButton::Left, .. } if self.dragging => {
                self.dragging = false;
                true
            }
            InputEvent::KeyDown { key, .. } if cx.contains_point(cx.env.cursor) => self.nudge(cx, key),
            _ => false,
        }
    }

    fn enabled_changed(&mut self, enabled: bool) {
        if !enabled {
            self.dragging = false;
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let theme = cx.env.theme();
        let bounds = cx.absolute_rect();
        let knob = self.knob_rect(bounds);
        let center = knob.center();

        let (track, filled) = match self.orientation {
            Orientation::Horizontal => {
                let y = bounds.origin.y + (bounds.size.height / 2.0).floor() - 2.0;
                (
                    Rect::new(Point::new(bounds.origin.x, y), Size::new(bounds.size.width, 4.0)),
                    Rect::new(Point::new(bounds.origin.x, y), Size::new(center.x - bounds.origin.x, 4.0)),
                )
            }
            Orientation::Vertical => {
                let x = bounds.origin.x + (bounds.size.width / 2.0).floor() - 2.0;
                (
                    Rect::new(Point::new(x, bounds.origin.y), Size::new(4.0, bounds.size.height)),
                    Rect::new(Point::new(x, center.y), Size::new(4.0, bounds.max_y() - center.y)),
                )
            }
        };

        cx.display.fill_rect(track, theme.button_normal.color());
        if cx.is_enabled() {
            cx.display.fill_rect(filled, theme.primary.color());
        }
        let handle = if self.dragging {
            theme.button_pressed.color()
        } else if cx.is_hovered() {
            theme.button_hover.color()
        } else {
            theme.text_secondary.color()
        };
        cx.display.fill_rect(knob, handle);
        cx.display.stroke_rect(knob, theme.border.color(), cx.env.config.metrics.border_width * cx.env.ui_scale);
    }
}
