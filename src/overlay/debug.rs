use {
    dashr_ui_core::{
        display::{rgb, Color, Point, Rect, Size},
        input::Key,
        text::draw_text,
        tree::{DrawCx, FrameCx, NodeId, Widget},
    },
    std::collections::VecDeque,
};

use super::Overlay;

/// Frame timing over the sampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub current: f32,
    pub average: f32,
    pub min: f32,
    pub max: f32,
    /// Milliseconds per frame at the current rate, or the average when unknown.
    pub ms_per_frame: f32,
}

/// Frame rate and version readout in the top-right corner.
///
/// Frame times come from the `dt` passed to update; versions are supplied
/// already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    /// `(timestamp, fps)` for roughly the last second.
    samples: VecDeque<(f64, f32)>,
    clock: f64,
    current_fps: f32,
    current_version: String,
    upstream_version: String,
    pub box_color: Color,
    pub text_color: Color,
}

impl Default for DebugOverlay {
    fn default() -> Self {
        DebugOverlay::new("unknown", "unknown")
    }
}

impl DebugOverlay {
    pub const ID: &'static str = "debug";
    pub const TOGGLE_KEY: Key = Key::F(3);
    /// Seconds of samples kept.
    pub const WINDOW: f64 = 1.0;

    pub fn new(current_version: impl Into<String>, upstream_version: impl Into<String>) -> Self {
        DebugOverlay {
            samples: VecDeque::new(),
            clock: 0.0,
            current_fps: 0.0,
            current_version: current_version.into(),
            upstream_version: upstream_version.into(),
            box_color: rgb(255, 255, 255),
            text_color: rgb(0, 0, 0),
        }
    }

    /// The overlay entry for a node holding this widget, bound to F3.
    pub fn overlay(root: NodeId) -> Overlay {
        Overlay::new(DebugOverlay::ID, root).with_toggle_key(DebugOverlay::TOGGLE_KEY)
    }

    pub fn set_versions(&mut self, current: impl Into<String>, upstream: impl Into<String>) {
        self.current_version = current.into();
        self.upstream_version = upstream.into();
    }

    /// Records one frame that took `dt` seconds.
    pub fn record_frame(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        self.current_fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        self.samples.push_back((self.clock, self.current_fps));
        while let Some(&(at, _)) = self.samples.front() {
            if self.clock - at > DebugOverlay::WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// `None` until a frame with a positive rate was recorded.
    pub fn stats(&self) -> Option<FrameStats> {
        let rates: Vec<f32> = self.samples.iter().map(|&(_, fps)| fps).filter(|&fps| fps > 0.0).collect();
        if rates.is_empty() {
            return None;
        }
        let average = rates.iter().sum::<f32>() / rates.len() as f32;
        let min = rates.iter().copied().fold(f32::INFINITY, f32::min);
        let max = rates.iter().copied().fold(0.0, f32::max);
        let selected = if self.current_fps > 0.0 { self.current_fps } else { average };
        Some(FrameStats { current: self.current_fps, average, min, max, ms_per_frame: 1000.0 / selected })
    }

    /// The readout, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = match self.stats() {
            Some(stats) => vec![
                format!("- fps: {:.1}", stats.current),
                format!("| avg: {:.1}", stats.average),
                format!("| min: {:.1}", stats.min),
                format!("| max: {:.1}", stats.max),
                format!("| mspf: {:.1} ms", stats.ms_per_frame),
            ],
            None => vec![format!("- fps: {:.1}", self.current_fps), "| mspf: 0.0 ms".to_owned()],
        };
        lines.push(String::new());
        lines.push(format!("- ver: {}", self.current_version));
        lines.push(format!("| up: {}", self.upstream_version));
        lines
    }

    /// Box rectangle for `lines` on a surface `surface_width` wide.
    fn layout(&self, cx: &DrawCx<'_>, lines: &[String], surface_width: f32) -> Rect {
        let scale = cx.env.ui_scale;
        let margin = 5.0 * scale;
        let line_height = 10.0 * scale;
        let text_width = lines.iter().map(|line| cx.env.font.measure_text(line, scale)).fold(0.0, f32::max);
        let size = Size::new(text_width + margin * 2.0, lines.len() as f32 * line_height + margin * 2.0);
        Rect::new(Point::new(surface_width - size.width - margin, margin), size)
    }
}

impl Widget for DebugOverlay {
    fn update(&mut self, _cx: &mut FrameCx<'_>, dt: f32) {
        self.record_frame(dt);
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let lines = self.lines();
        let surface_width = cx.display.surface_size().width;
        let bounds = self.layout(cx, &lines, surface_width);
        let scale = cx.env.ui_scale;
        let margin = 5.0 * scale;

        cx.display.fill_rect(bounds, self.box_color);
        for (i, line) in lines.iter().enumerate() {
            let origin = Point::new(bounds.origin.x + margin, bounds.origin.y + margin + i as f32 * 10.0 * scale);
            draw_text(cx.display, cx.env.font, line, origin, scale, self.text_color);
        }
    }
}
