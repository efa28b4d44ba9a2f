use {
    super::content::ButtonContent,
    dashr_ui_core::{
        display::{Color, Size},
        event::CLICK,
        font::Font,
        input::{InputEvent, MouseButton},
        tree::{DrawCx, FrameCx, Widget},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Normal,
    Hover,
    Pressed,
    Disabled,
}

/// A push button firing `click` when pressed and released inside its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    content: ButtonContent,
    state: ButtonState,
    /// Overrides the theme's idle background.
    pub background: Option<Color>,
}

impl Button {
    pub fn new(content: impl Into<ButtonContent>) -> Self {
        Button { content: content.into(), state: ButtonState::Normal, background: None }
    }

    pub fn icon(icon: impl Into<String>) -> Self {
        Button::new(ButtonContent::Icon(icon.into()))
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    #[inline]
    pub fn content(&self) -> &ButtonContent {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<ButtonContent>) {
        self.content = content.into();
    }

    /// Content size plus `padding` on each side, at least `height` tall.
    pub fn preferred_size(&self, font: &Font, scale: f32, padding: f32, height: f32) -> Size {
        let content = self.content.measure(font, scale);
        Size::new(content.width + padding * 2.0, height.max(content.height + padding * 2.0))
    }

    fn hover(&mut self, inside: bool) {
        if let ButtonState::Normal | ButtonState::Hover = self.state {
            self.state = if inside { ButtonState::Hover } else { ButtonState::Normal };
        }
    }
}

impl Widget for Button {
    fn update(&mut self, cx: &mut FrameCx<'_>, _dt: f32) {
        if !cx.is_enabled() {
            self.state = ButtonState::Disabled;
            return;
        }
        if self.state == ButtonState::Disabled {
            self.state = ButtonState::Normal;
        }
        let inside = cx.contains_point(cx.env.cursor);
        self.hover(inside);
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        if self.state == ButtonState::Disabled {
            return false;
        }

        match *event {
            InputEvent::PointerMove { pos } => {
                let inside = cx.contains_point(pos);
                self.hover(inside);
                false
            }
            InputEvent::PointerDown { pos, button: MouseButton::Left } if cx.contains_point(pos) => {
                self.state = ButtonState::Pressed;
                true
            }
            InputEvent::PointerUp { pos, button: MouseButton::Left } if self.state == ButtonState::Pressed => {
                if cx.contains_point(pos) {
                    self.state = ButtonState::Hover;
                    let click = cx.event(CLICK);
                    cx.trigger(click);
                    true
                } else {
                    self.state = ButtonState::Normal;
                    false
                }
            }
            _ => false,
        }
    }

    fn enabled_changed(&mut self, enabled: bool) {
        self.state = if enabled { ButtonState::Normal } else { ButtonState::Disabled };
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        self.draw_as(cx, self.state);
    }
}

impl Button {
    /// Draws the button as if it were in `state`.
    pub(crate) fn draw_as(&self, cx: &mut DrawCx<'_>, state: ButtonState) {
        let theme = cx.env.theme();
        let bounds = cx.absolute_rect();

        let background = match state {
            ButtonState::Normal => self.background.unwrap_or_else(|| theme.button_normal.color()),
            ButtonState::Hover => theme.button_hover.color(),
            ButtonState::Pressed => theme.button_pressed.color(),
            ButtonState::Disabled => theme.button_disabled.color(),
        };
        let text = match state {
            ButtonState::Disabled => theme.text_disabled.color(),
            _ => theme.text_primary.color(),
        };

        cx.display.fill_rect(bounds, background);
        cx.display.stroke_rect(bounds, theme.border.color(), cx.env.config.metrics.border_width * cx.env.ui_scale);
        self.content.draw(cx.display, cx.env.font, bounds, cx.env.text_scale(), text);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::widgets::testing::{record, rect, Harness},
        dashr_ui_core::{
            display::{DisplayCommand, DisplayListBuilder},
            input::InputEvent,
            tree::UiTree,
        },
    };

    fn setup() -> (UiTree, dashr_ui_core::tree::NodeId) {
        let mut tree = UiTree::new();
        let button = tree.insert(Button::new("ok"), rect(10.0, 10.0, 40.0, 20.0));
        (tree, button)
    }

    fn state(tree: &UiTree, button: dashr_ui_core::tree::NodeId) -> ButtonState {
        tree.widget::<Button>(button).unwrap().state()
    }

    #[test]
    fn test_click_inside_fires_once() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let (mut tree, button) = setup();
        let clicks = record(&mut tree, button, CLICK);

        assert!(tree.dispatch(button, &InputEvent::left_down(20.0, 20.0), &env));
        assert_eq!(state(&tree, button), ButtonState::Pressed);
        assert!(tree.dispatch(button, &InputEvent::left_up(25.0, 15.0), &env));
        assert_eq!(state(&tree, button), ButtonState::Hover);
        assert_eq!(clicks.borrow().len(), 1);
        assert_eq!(clicks.borrow()[0].source, button);
    }

    #[test]
    fn test_release_outside_cancels() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let (mut tree, button) = setup();
        let clicks = record(&mut tree, button, CLICK);

        assert!(tree.dispatch(button, &InputEvent::left_down(20.0, 20.0), &env));
        assert!(!tree.dispatch(button, &InputEvent::left_up(100.0, 100.0), &env));
        assert_eq!(state(&tree, button), ButtonState::Normal);
        assert!(clicks.borrow().is_empty());

        // a release with no press is ignored
        assert!(!tree.dispatch(button, &InputEvent::left_up(20.0, 20.0), &env));
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn test_hover_tracks_cursor() {
        let harness = Harness::new();
        let (mut tree, button) = setup();

        tree.update(button, 0.016, &harness.env(15.0, 15.0));
        assert_eq!(state(&tree, button), ButtonState::Hover);
        tree.update(button, 0.016, &harness.env(0.0, 0.0));
        assert_eq!(state(&tree, button), ButtonState::Normal);

        assert!(!tree.dispatch(button, &InputEvent::pointer_move(12.0, 12.0), &harness.env(0.0, 0.0)));
        assert_eq!(state(&tree, button), ButtonState::Hover);
    }

    #[test]
    fn test_disabled_is_a_sink() {
        let harness = Harness::new();
        let (mut tree, button) = setup();

        tree.set_enabled(button, false);
        assert_eq!(state(&tree, button), ButtonState::Disabled);
        tree.update(button, 0.016, &harness.env(15.0, 15.0));
        assert_eq!(state(&tree, button), ButtonState::Disabled);
        assert!(!tree.dispatch(button, &InputEvent::left_down(20.0, 20.0), &harness.env(0.0, 0.0)));

        tree.set_enabled(button, true);
        assert_eq!(state(&tree, button), ButtonState::Normal);
    }

    #[test]
    fn test_draw_uses_state_color() {
        let harness = Harness::new();
        let (mut tree, button) = setup();
        tree.update(button, 0.016, &harness.env(15.0, 15.0));

        let mut display = DisplayListBuilder::new();
        tree.draw(button, &mut display, &harness.env(15.0, 15.0));
        match &display.commands()[0] {
            DisplayCommand::FillRect { rect: bounds, color } => {
                assert_eq!(*bounds, rect(10.0, 10.0, 40.0, 20.0));
                assert_eq!(*color, harness.config.theme.button_hover.color());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
