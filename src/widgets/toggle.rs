//! Two-state widgets: checkbox, switch and radio button.

use {
    dashr_ui_core::{
        display::{inset, Point, Rect, Size},
        event::{Command, SELECT, TOGGLE},
        input::{InputEvent, MouseButton},
        text::draw_text,
        tree::{DrawCx, FrameCx, NodeCx, NodeId, UiTree, Widget},
    },
    tracing::debug,
};

fn is_left_press_inside(cx: &FrameCx<'_>, event: &InputEvent) -> bool {
    match *event {
        InputEvent::PointerDown { pos, button: MouseButton::Left } => cx.contains_point(pos),
        _ => false,
    }
}

/// Draws the square indicator at the left of `bounds` and the label after it.
fn draw_indicator(cx: &mut DrawCx<'_>, label: Option<&str>, fill: Option<f32>) {
    let theme = cx.env.theme();
    let bounds = cx.absolute_rect();
    let side = bounds.size.height;
    let indicator = Rect::new(bounds.origin, Size::new(side, side));

    cx.display.fill_rect(indicator, theme.surface.color());
    cx.display.stroke_rect(indicator, theme.border.color(), cx.env.config.metrics.border_width * cx.env.ui_scale);
    if let Some(amount) = fill {
        cx.display.fill_rect(inset(indicator, amount), theme.primary.color());
    }

    if let Some(label) = label {
        let scale = cx.env.text_scale();
        let color = if cx.is_enabled() { theme.text_primary.color() } else { theme.text_disabled.color() };
        let x = indicator.max_x() + cx.env.config.metrics.padding * cx.env.ui_scale / 2.0;
        let y = bounds.origin.y + (side - cx.env.font.line_height(scale)) / 2.0;
        draw_text(cx.display, cx.env.font, label, Point::new(x, y), scale, color);
    }
}

/// A checkbox.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Toggle {
    checked: bool,
    pub label: Option<String>,
}

impl Toggle {
    pub fn new(checked: bool) -> Self {
        Toggle { checked, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Sets the state, firing `toggle` if it changed.
    pub fn set_checked(&mut self, cx: &mut NodeCx<'_>, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            let event = cx.event(TOGGLE).with("checked", checked);
            cx.trigger(event);
        }
    }
}

impl Widget for Toggle {
    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        if !is_left_press_inside(cx, event) {
            return false;
        }
        let checked = !self.checked;
        self.set_checked(cx, checked);
        true
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let side = cx.absolute_rect().size.height;
        draw_indicator(cx, self.label.as_deref(), if self.checked { Some((side / 5.0).floor().max(2.0)) } else { None });
    }
}

/// A sliding on/off switch. The knob moves linearly toward its resting place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Switch {
    checked: bool,
    /// Knob offset from the left edge; `None` until first laid out.
    knob_x: Option<f32>,
}

impl Switch {
    pub fn new(checked: bool) -> Self {
        Switch { checked, knob_x: None }
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    #[inline]
    pub fn knob_x(&self) -> Option<f32> {
        self.knob_x
    }

    /// Resting knob offset for the current state within `size`.
    pub fn knob_target(&self, size: Size) -> f32 {
        if self.checked {
            (size.width - size.height + 2.0).max(2.0)
        } else {
            2.0
        }
    }

    pub fn set_checked(&mut self, cx: &mut NodeCx<'_>, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            let event = cx.event(TOGGLE).with("checked", checked);
            cx.trigger(event);
        }
    }
}

impl Widget for Switch {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        let target = self.knob_target(cx.rect().size);
        let step = cx.env.config.animation.switch_knob_speed * cx.env.ui_scale * dt;
        self.knob_x = Some(match self.knob_x {
            None => target,
            Some(x) if x < target => (x + step).min(target),
            Some(x) => (x - step).max(target),
        });
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        if !is_left_press_inside(cx, event) {
            return false;
        }
        let checked = !self.checked;
        self.set_checked(cx, checked);
        true
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let theme = cx.env.theme();
        let bounds = cx.absolute_rect();
        let knob = (bounds.size.height - 4.0).max(0.0);
        let knob_x = self.knob_x.unwrap_or_else(|| self.knob_target(bounds.size));

        let track = if self.checked { theme.primary.color() } else { theme.button_normal.color() };
        cx.display.fill_rect(bounds, track);
        cx.display.stroke_rect(bounds, theme.border.color(), cx.env.config.metrics.border_width * cx.env.ui_scale);
        cx.display.fill_rect(
            Rect::new(Point::new(bounds.origin.x + knob_x, bounds.origin.y + 2.0), Size::new(knob, knob)),
            theme.text_primary.color(),
        );
    }
}

/// One option of a radio group. Exclusivity is enforced by [`RadioGroup`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadioButton {
    selected: bool,
    group: String,
    pub value: String,
    pub label: Option<String>,
}

impl RadioButton {
    pub fn new(value: impl Into<String>) -> Self {
        RadioButton { selected: false, group: String::new(), value: value.into(), label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Selects or deselects; becoming selected fires `select` with the group and value.
    pub fn set_selected(&mut self, cx: &mut NodeCx<'_>, selected: bool) {
        let was = std::mem::replace(&mut self.selected, selected);
        if selected && !was {
            let event = cx.event(SELECT).with("group", self.group.as_str()).with("value", self.value.as_str());
            cx.trigger(event);
        }
    }

    pub fn set_selected_silently(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl Widget for RadioButton {
    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        if !is_left_press_inside(cx, event) {
            return false;
        }
        self.set_selected(cx, true);
        true
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let side = cx.absolute_rect().size.height;
        draw_indicator(cx, self.label.as_deref(), if self.selected { Some((side / 4.0).floor()) } else { None });
    }
}

/// Keeps at most one [`RadioButton`] of a named group selected.
///
/// Members post a [`Command::SelectRadio`] when picked; whoever drains the
/// tree's commands passes it to [`apply_selection`](RadioGroup::apply_selection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioGroup {
    name: String,
    members: Vec<NodeId>,
}

impl RadioGroup {
    pub fn new(name: impl Into<String>) -> Self {
        RadioGroup { name: name.into(), members: Vec::new() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Adopts `radio`. Returns `false` if it is not a radio button or already a member.
    pub fn add(&mut self, tree: &mut UiTree, radio: NodeId) -> bool {
        if self.members.contains(&radio) {
            return false;
        }
        let name = self.name.clone();
        if tree.modify(radio, |button: &mut RadioButton| button.group = name).is_none() {
            return false;
        }

        let group = self.name.clone();
        tree.add_handler(radio, SELECT, move |event| {
            Ok(Some(Command::SelectRadio { group: group.clone(), node: event.source }))
        });
        self.members.push(radio);
        true
    }

    pub fn remove(&mut self, radio: NodeId) -> bool {
        let before = self.members.len();
        self.members.retain(|&member| member != radio);
        self.members.len() != before
    }

    /// Deselects every member except `node`.
    pub fn apply_selection(&self, tree: &mut UiTree, node: NodeId) {
        if !self.members.contains(&node) {
            return;
        }
        debug!(group = %self.name, ?node, "radio selection");
        for &member in self.members.iter().filter(|&&member| member != node) {
            tree.modify(member, |button: &mut RadioButton| button.set_selected_silently(false));
        }
    }

    pub fn selected(&self, tree: &UiTree) -> Option<NodeId> {
        self.members
            .iter()
            .copied()
            .find(|&member| tree.widget::<RadioButton>(member).map_or(false, RadioButton::is_selected))
    }

    pub fn selected_value<'t>(&self, tree: &'t UiTree) -> Option<&'t str> {
        self.selected(tree).and_then(|node| tree.widget::<RadioButton>(node)).map(|button| button.value.as_str())
    }
}
