use super::animation::{AnimationHandle, AnimationStep, ReturnAnimation};
use super::geometry::{Layout, Point};
use super::{DEFAULT_HANDLE_SIZE, DEFAULT_TIME_TEXT, MAX_TILT_DEGREES};
use derive_more::{AsRef, Deref, Display, From, Into};
use gdk_pixbuf::Pixbuf;
use std::path::Path;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct DisplayText(String);

crate::impl_string_newtype!(DisplayText);

impl Default for DisplayText {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_TEXT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
}

/// Simulated camera rotation (degrees) and the translation paired with it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub parallax_x: f64,
    pub parallax_y: f64,
}

impl Tilt {
    pub const NEUTRAL: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
        parallax_x: 0.0,
        parallax_y: 0.0,
    };

    /// Tilt for a pointer at `pointer`. Each axis of the offset from the
    /// center is normalised by the radius and clamped to [-1, 1]. Pointer
    /// moving down tips the top of the face away, hence the sign flip on X.
    pub fn from_pointer(pointer: Point, layout: &Layout) -> Self {
        if layout.is_degenerate() {
            return Self::NEUTRAL;
        }
        let percent_x = ((pointer.x - layout.center.x) / layout.radius).clamp(-1.0, 1.0);
        let percent_y = ((pointer.y - layout.center.y) / layout.radius).clamp(-1.0, 1.0);

        Self {
            rotate_x: -percent_y * MAX_TILT_DEGREES,
            rotate_y: percent_x * MAX_TILT_DEGREES,
            parallax_x: percent_x * layout.max_parallax,
            parallax_y: percent_y * layout.max_parallax,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rotate_x: self.rotate_x * factor,
            rotate_y: self.rotate_y * factor,
            parallax_x: self.parallax_x * factor,
            parallax_y: self.parallax_y * factor,
        }
    }

    pub fn clamped(&self, layout: &Layout) -> Self {
        let (t, p) = (MAX_TILT_DEGREES, layout.max_parallax);
        Self {
            rotate_x: self.rotate_x.clamp(-t, t),
            rotate_y: self.rotate_y.clamp(-t, t),
            parallax_x: self.parallax_x.clamp(-p, p),
            parallax_y: self.parallax_y.clamp(-p, p),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[derive(Clone)]
pub struct HandleIcon {
    pub pixbuf: Option<Pixbuf>,
    pub size: f64,
}

impl HandleIcon {
    pub fn load(path: Option<&Path>, size: f64) -> Self {
        let pixbuf = path.and_then(|p| {
            Pixbuf::from_file_at_scale(p, size as i32, size as i32, true)
                .inspect_err(|e| log::warn!("Failed to load handle icon {}: {}", p.display(), e))
                .ok()
        });
        Self { pixbuf, size }
    }

    pub fn fallback(size: f64) -> Self {
        Self { pixbuf: None, size }
    }

    pub fn extent(&self) -> (f64, f64) {
        self.pixbuf
            .as_ref()
            .map(|p| (p.width() as f64, p.height() as f64))
            .unwrap_or((self.size, self.size))
    }

    /// Bounding-box hit test around the handle's current center.
    pub fn contains(&self, handle: Point, pointer: Point) -> bool {
        let (w, h) = self.extent();
        (pointer.x - handle.x).abs() <= w / 2.0 && (pointer.y - handle.y).abs() <= h / 2.0
    }
}

impl Default for HandleIcon {
    fn default() -> Self {
        Self::fallback(DEFAULT_HANDLE_SIZE)
    }
}

/// Fire-and-forget signals for the host, drained after every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostRequests {
    pub should_redraw: bool,
    pub start_return: Option<AnimationHandle>,
}

impl HostRequests {
    pub fn new(should_redraw: bool, start_return: Option<AnimationHandle>) -> Self {
        Self {
            should_redraw,
            start_return,
        }
    }

    pub fn redraw() -> Self {
        Self::new(true, None)
    }

    pub fn merge(&mut self, other: HostRequests) {
        self.should_redraw |= other.should_redraw;
        if other.start_return.is_some() {
            self.start_return = other.start_return;
        }
    }
}

pub struct DialState {
    pub time_text: DisplayText,
    pub handle: Point,
    pub mode: InteractionMode,
    pub tilt: Tilt,
    pub active_return: Option<ReturnAnimation>,
    next_animation_id: u64,
}

impl DialState {
    pub fn new(layout: &Layout) -> Self {
        Self {
            time_text: DisplayText::default(),
            handle: layout.default_handle(),
            mode: InteractionMode::Idle,
            tilt: Tilt::NEUTRAL,
            active_return: None,
            next_animation_id: 0,
        }
    }

    /// Called after the layout was rebuilt for new bounds.
    pub fn reset_geometry(&mut self, layout: &Layout) {
        self.handle = layout.default_handle();
        self.mode = InteractionMode::Idle;
        self.tilt = self.tilt.clamped(layout);
    }

    pub fn pointer_down(
        &mut self,
        pointer: Point,
        layout: &Layout,
        icon: &HandleIcon,
    ) -> HostRequests {
        self.cancel_return();
        if layout.is_degenerate() {
            return HostRequests::default();
        }

        if icon.contains(self.handle, pointer) {
            self.mode = InteractionMode::Dragging;
            log::debug!("Handle grabbed at ({:.1}, {:.1})", pointer.x, pointer.y);
            HostRequests::default()
        } else {
            self.mode = InteractionMode::Idle;
            self.track_tilt(pointer, layout)
        }
    }

    pub fn pointer_move(&mut self, pointer: Point, layout: &Layout) -> HostRequests {
        if layout.is_degenerate() {
            return HostRequests::default();
        }

        match self.mode {
            InteractionMode::Dragging => {
                let handle = project_onto_seek_circle(pointer, layout);
                let changed = handle != self.handle;
                self.handle = handle;
                HostRequests::new(changed, None)
            }
            InteractionMode::Idle => self.track_tilt(pointer, layout),
        }
    }

    pub fn pointer_up(&mut self, _pointer: Point, layout: &Layout) -> HostRequests {
        match self.mode {
            InteractionMode::Dragging => {
                self.mode = InteractionMode::Idle;
                log::debug!(
                    "Handle released at ({:.1}, {:.1})",
                    self.handle.x,
                    self.handle.y
                );
                HostRequests::default()
            }
            InteractionMode::Idle if !layout.is_degenerate() && !self.tilt.is_neutral() => {
                let handle = self.start_return();
                HostRequests::new(true, Some(handle))
            }
            InteractionMode::Idle => HostRequests::default(),
        }
    }

    fn track_tilt(&mut self, pointer: Point, layout: &Layout) -> HostRequests {
        let tilt = Tilt::from_pointer(pointer, layout);
        let changed = tilt != self.tilt;
        self.tilt = tilt;
        HostRequests::new(changed, None)
    }

    /// Captures the current tilt as the starting point and replaces any
    /// animation already in flight.
    pub fn start_return(&mut self) -> AnimationHandle {
        self.next_animation_id += 1;
        let handle = AnimationHandle::new(self.next_animation_id);
        self.active_return = Some(ReturnAnimation::new(handle, self.tilt));
        log::debug!("Return animation {} started", handle.id());
        handle
    }

    pub fn cancel_return(&mut self) {
        self.active_return = None;
    }

    pub fn advance_return(
        &mut self,
        handle: AnimationHandle,
        now_us: i64,
        layout: &Layout,
    ) -> AnimationStep {
        let Some(anim) = self
            .active_return
            .as_mut()
            .filter(|a| a.handle() == handle)
        else {
            return AnimationStep::Superseded;
        };

        let (tilt, finished) = anim.sample(now_us);
        self.tilt = tilt.clamped(layout);

        if finished {
            self.active_return = None;
            AnimationStep::Finished
        } else {
            AnimationStep::Running
        }
    }
}

/// Solves the seek circle for the pointer's horizontal coordinate. Pointers
/// above the center land on the upper arc, everything else on the lower arc.
pub fn project_onto_seek_circle(pointer: Point, layout: &Layout) -> Point {
    let (cx, cy, r) = (layout.center.x, layout.center.y, layout.seek_radius);
    let x = if pointer.x.is_finite() {
        pointer.x.clamp(cx - r, cx + r)
    } else {
        cx
    };
    let dx = x - cx;
    let dy = (r * r - dx * dx).max(0.0).sqrt();

    let is_top = pointer.y < cy;
    Point::new(x, if is_top { cy - dy } else { cy + dy })
}
