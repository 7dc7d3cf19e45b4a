use super::animation::{AnimationHandle, AnimationStep};
use super::geometry::{Layout, Point, Size};
use super::model::{DialState, DisplayText, HostRequests};
use super::view::{self, DialStyle};
use super::DEFAULT_TIME_TEXT;
use cairo::Context;
use std::time::Duration;

/// The circular countdown dial. Owns its state exclusively; the host feeds it
/// bounds and pointer events, paints it, and drains [`HostRequests`] after
/// each call.
pub struct TimerDial {
    state: DialState,
    layout: Layout,
    style: DialStyle,
    bounds: Size,
    padding: f64,
    armed: Option<Duration>,
    pending: HostRequests,
}

impl TimerDial {
    pub fn new(bounds: Size, padding: f64, style: DialStyle) -> Self {
        let layout = Layout::from_size(bounds, padding);
        Self {
            state: DialState::new(&layout),
            layout,
            style,
            bounds,
            padding,
            armed: None,
            pending: HostRequests::default(),
        }
    }

    pub fn state(&self) -> &DialState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn armed_duration(&self) -> Option<Duration> {
        self.armed
    }

    pub fn set_display_text(&mut self, text: impl Into<String>) {
        self.state.time_text = DisplayText::new(text);
        self.pending.merge(HostRequests::redraw());
    }

    pub fn set_style(&mut self, style: DialStyle) {
        self.style = style;
        self.pending.merge(HostRequests::redraw());
    }

    pub fn set_padding(&mut self, padding: f64) {
        if padding != self.padding {
            self.padding = padding;
            self.relayout();
        }
    }

    /// Rebuilds the layout, but only when the bounds actually changed.
    pub fn on_bounds_changed(&mut self, bounds: Size) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        self.layout = Layout::from_size(self.bounds, self.padding);
        self.state.reset_geometry(&self.layout);
        self.pending.merge(HostRequests::redraw());
    }

    pub fn on_pointer_down(&mut self, pointer: Point) -> bool {
        let requests = self
            .state
            .pointer_down(pointer, &self.layout, &self.style.handle);
        self.pending.merge(requests);
        true
    }

    pub fn on_pointer_move(&mut self, pointer: Point) -> bool {
        let requests = self.state.pointer_move(pointer, &self.layout);
        self.pending.merge(requests);
        true
    }

    pub fn on_pointer_up(&mut self, pointer: Point) -> bool {
        let requests = self.state.pointer_up(pointer, &self.layout);
        self.pending.merge(requests);
        true
    }

    pub fn render(&self, cr: &Context) -> Result<(), cairo::Error> {
        view::draw(cr, &self.state, &self.layout, &self.style)
    }

    /// One frame of the tilt-return animation. `frame_time_us` comes from the
    /// host's frame clock.
    pub fn advance_return(&mut self, handle: AnimationHandle, frame_time_us: i64) -> AnimationStep {
        self.state.advance_return(handle, frame_time_us, &self.layout)
    }

    /// Shows the requested duration on the face. Counting down is up to the
    /// caller.
    pub fn start_timer(&mut self, duration: Duration) {
        log::info!("Timer started for {}s", duration.as_secs());
        self.armed = Some(duration);
        self.set_display_text(format_duration(duration));
    }

    pub fn cancel_timer(&mut self) {
        if self.armed.take().is_some() {
            log::info!("Timer cancelled");
        }
        self.set_display_text(DEFAULT_TIME_TEXT);
    }

    pub fn take_requests(&mut self) -> HostRequests {
        std::mem::take(&mut self.pending)
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
