use {
    dashr_ui_core::{
        config::Theme,
        display::{Color, Point, Rect, Size},
        event::{Severity, EXPIRED},
        input::{InputEvent, MouseButton},
        text::draw_text,
        tree::{DrawCx, FrameCx, Widget},
    },
    tracing::trace,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationPhase {
    /// Sliding in from the right.
    Entering,
    Showing,
    /// Sliding back out.
    Leaving,
    /// Off-screen and hidden; `expired` has fired.
    Expired,
}

fn severity_color(theme: &Theme, severity: Severity) -> Color {
    match severity {
        Severity::Info => theme.info.color(),
        Severity::Success => theme.success.color(),
        Severity::Warning => theme.warning.color(),
        Severity::Error => theme.danger.color(),
    }
}

/// A toast that slides in, counts down, slides out and fires `expired`.
///
/// The node's position when first updated is its resting place; it starts one
/// width to the right of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    duration: f32,
    time_remaining: f32,
    pub auto_dismiss: bool,
    home_x: Option<f32>,
    phase: NotificationPhase,
}

impl Notification {
    pub const DEFAULT_DURATION: f32 = 3.0;

    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Notification {
            message: message.into(),
            severity,
            duration: Notification::DEFAULT_DURATION,
            time_remaining: Notification::DEFAULT_DURATION,
            auto_dismiss: true,
            home_x: None,
            phase: NotificationPhase::Entering,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self.time_remaining = self.duration;
        self
    }

    /// Stays until clicked or hidden.
    pub fn sticky(mut self) -> Self {
        self.auto_dismiss = false;
        self
    }

    #[inline]
    pub fn phase(&self) -> NotificationPhase {
        self.phase
    }

    #[inline]
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Starts sliding out.
    pub fn hide(&mut self) {
        if let NotificationPhase::Entering | NotificationPhase::Showing = self.phase {
            self.phase = NotificationPhase::Leaving;
        }
    }

    /// Fraction of the countdown left, for the progress bar.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.time_remaining / self.duration).max(0.0)
        } else {
            0.0
        }
    }
}

impl Widget for Notification {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        let rect = cx.rect();
        let width = rect.size.width;
        let home = match self.home_x {
            Some(home) => home,
            None => {
                self.home_x = Some(rect.origin.x);
                cx.set_rect(Rect::new(Point::new(rect.origin.x + width, rect.origin.y), rect.size));
                rect.origin.x
            }
        };
        let mut x = cx.rect().origin.x;

        let target = match self.phase {
            NotificationPhase::Entering | NotificationPhase::Showing => home,
            NotificationPhase::Leaving => home + width,
            NotificationPhase::Expired => return,
        };
        if (x - target).abs() > 1.0 {
            let step = cx.env.config.animation.notification_slide_speed * width * dt;
            x = if target > x { (x + step).min(target) } else { (x - step).max(target) };
        } else {
            x = target;
        }
        cx.set_rect(Rect::new(Point::new(x, rect.origin.y), rect.size));

        if self.phase == NotificationPhase::Entering && x == home {
            self.phase = NotificationPhase::Showing;
        }
        if self.auto_dismiss && self.phase != NotificationPhase::Leaving {
            self.time_remaining -= dt;
            if self.time_remaining <= 0.0 {
                self.hide();
            }
        }
        if self.phase == NotificationPhase::Leaving && x >= home + width {
            trace!(message = %self.message, "notification expired");
            self.phase = NotificationPhase::Expired;
            cx.set_visible(false);
            let expired = cx.event(EXPIRED);
            cx.trigger(expired);
        }
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { pos, button: MouseButton::Left } if cx.contains_point(pos) => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let theme = cx.env.theme();
        let bounds = cx.absolute_rect();
        let scale = cx.env.ui_scale;

        cx.display.fill_rect(bounds, severity_color(theme, self.severity));
        cx.display.stroke_rect(bounds, theme.border.color(), cx.env.config.metrics.border_width * scale);

        if !self.message.is_empty() {
            let x = (bounds.origin.x + cx.env.config.metrics.padding * scale).trunc();
            let y = bounds.origin.y + ((bounds.size.height - cx.env.font.line_height(scale)) / 2.0).floor();
            draw_text(cx.display, cx.env.font, &self.message, Point::new(x, y), scale, theme.text_primary.color());
        }

        if self.auto_dismiss {
            let width = (bounds.size.width * self.progress()).trunc();
            if width > 0.0 {
                cx.display.fill_rect(
                    Rect::new(Point::new(bounds.origin.x, bounds.max_y() - 3.0), Size::new(width, 3.0)),
                    theme.text_primary.color(),
                );
            }
        }
    }
}
