use super::geometry::{Layout, Point};
use super::model::{DialState, HandleIcon, Tilt};
use super::{DEFAULT_TEXT_SIZE, TICK_COUNT, TICK_STEP_DEGREES};
use crate::gui::theme::ThemeColors;
use cairo::{Antialias, Context, FontSlant, FontWeight, Matrix};
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

/// Absorbs the rounding of `asin` so a handle exactly on a tick boundary
/// lights that tick.
const TICK_EPSILON: f64 = 1e-9;

/// Host-supplied assets: colors, the handle icon and the readout font size.
#[derive(Clone)]
pub struct DialStyle {
    pub colors: ThemeColors,
    pub handle: HandleIcon,
    pub text_size: f64,
}

impl DialStyle {
    pub fn new(colors: ThemeColors, handle: HandleIcon, text_size: f64) -> Self {
        Self {
            colors,
            handle,
            text_size,
        }
    }
}

impl Default for DialStyle {
    fn default() -> Self {
        Self::new(ThemeColors::default(), HandleIcon::default(), DEFAULT_TEXT_SIZE)
    }
}

/// Number of ring ticks to light for the handle's horizontal deviation from
/// the vertical axis. Always in `[0, TICK_COUNT)`.
pub fn lit_tick_count(handle: Point, layout: &Layout) -> usize {
    if layout.is_degenerate() {
        return 0;
    }
    let ratio = ((handle.x - layout.center.x) / layout.seek_radius).clamp(-1.0, 1.0);
    let degrees = ratio.asin().to_degrees();
    let count = (degrees / TICK_STEP_DEGREES + TICK_EPSILON).floor();

    if count.is_finite() {
        (count.max(0.0) as usize).min(TICK_COUNT - 1)
    } else {
        0
    }
}

/// Orthographic projection of a rotation about X (`rotate_x`) followed by Y
/// (`rotate_y`), restricted to the face plane.
pub fn camera_projection(tilt: &Tilt) -> Matrix {
    let (alpha, beta) = (tilt.rotate_x.to_radians(), tilt.rotate_y.to_radians());
    Matrix::new(beta.cos(), 0.0, alpha.sin() * beta.sin(), alpha.cos(), 0.0, 0.0)
}

/// The radial line every tick is stamped from, at twelve o'clock.
pub fn tick_segment(layout: &Layout, text_height: f64) -> (Point, Point) {
    let x = layout.width / 2.0;
    let top = layout.ring_top() + layout.tick_length + text_height / 2.0;
    (Point::new(x, top), Point::new(x, top + layout.tick_length))
}

pub fn draw(
    cr: &Context,
    state: &DialState,
    layout: &Layout,
    style: &DialStyle,
) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.set_antialias(Antialias::Best);
    apply_tilt(cr, &state.tilt, layout);
    draw_background(cr, &style.colors)?;

    if !layout.is_degenerate() {
        draw_face(cr, state, layout, style)?;
    }
    cr.restore()
}

fn draw_face(
    cr: &Context,
    state: &DialState,
    layout: &Layout,
    style: &DialStyle,
) -> Result<(), cairo::Error> {
    let text_height = draw_time_text(cr, state, layout, style)?;

    cr.save()?;
    cr.translate(state.tilt.parallax_x, state.tilt.parallax_y);

    let segment = tick_segment(layout, text_height);
    draw_ticks(cr, layout, segment, TICK_COUNT, style.colors.dark)?;
    draw_ticks(
        cr,
        layout,
        segment,
        lit_tick_count(state.handle, layout),
        style.colors.light,
    )?;
    draw_seek_track(cr, layout, style.colors.dark)?;
    draw_handle(cr, state.handle, &style.handle, style.colors.light)?;

    cr.restore()
}

/// Pivots the camera projection on the widget center instead of the origin.
fn apply_tilt(cr: &Context, tilt: &Tilt, layout: &Layout) {
    let (px, py) = (layout.width / 2.0, layout.height / 2.0);
    cr.translate(px, py);
    cr.transform(camera_projection(tilt));
    cr.translate(-px, -py);
}

fn draw_background(cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_source(cr, colors.background);
    cr.paint()
}

/// Returns the height of the rendered text's ink box.
fn draw_time_text(
    cr: &Context,
    state: &DialState,
    layout: &Layout,
    style: &DialStyle,
) -> Result<f64, cairo::Error> {
    set_source(cr, style.colors.light);
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
    cr.set_font_size(style.text_size);

    let ext = cr.text_extents(&state.time_text)?;
    cr.move_to(
        layout.center.x - ext.width() / 2.0 - ext.x_bearing(),
        layout.center.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(&state.time_text)?;
    cr.new_path();
    Ok(ext.height())
}

/// Stamps the same segment `count` times, rotating the canvas one tick step
/// about the center between stamps.
fn draw_ticks(
    cr: &Context,
    layout: &Layout,
    (start, end): (Point, Point),
    count: usize,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    cr.save()?;
    set_source(cr, color);
    cr.set_line_width(layout.stroke_width);

    let step = TICK_STEP_DEGREES.to_radians();
    for _ in 0..count {
        cr.move_to(start.x, start.y);
        cr.line_to(end.x, end.y);
        cr.stroke()?;

        cr.translate(layout.center.x, layout.center.y);
        cr.rotate(step);
        cr.translate(-layout.center.x, -layout.center.y);
    }
    cr.restore()
}

fn draw_seek_track(cr: &Context, layout: &Layout, color: Srgba<f64>) -> Result<(), cairo::Error> {
    set_source(cr, color);
    cr.set_line_width(layout.stroke_width);
    cr.arc(
        layout.center.x,
        layout.center.y,
        layout.seek_radius,
        0.0,
        2.0 * PI,
    );
    cr.stroke()
}

fn draw_handle(
    cr: &Context,
    position: Point,
    icon: &HandleIcon,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    if let Some(pixbuf) = &icon.pixbuf {
        let (w, h) = icon.extent();
        let (x, y) = (position.x - w / 2.0, position.y - h / 2.0);
        cr.save()?;
        cr.set_source_pixbuf(pixbuf, x, y);
        cr.rectangle(x, y, w, h);
        cr.fill()?;
        cr.restore()
    } else {
        set_source(cr, color);
        cr.arc(position.x, position.y, icon.size / 2.0, 0.0, 2.0 * PI);
        cr.fill()
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorConfig;
    use cairo::{Format, ImageSurface};

    const EPS: f64 = 1e-9;

    fn layout() -> Layout {
        Layout::recompute(400.0, 400.0, 0.0)
    }

    fn render(state: &DialState, layout: &Layout, style: &DialStyle, size: i32) -> Vec<u8> {
        let mut surface = ImageSurface::create(Format::ARgb32, size, size).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, state, layout, style).unwrap();
        }
        surface.flush();
        surface.data().unwrap().to_vec()
    }

    #[test]
    fn test_ring_covers_full_revolution() {
        assert!((TICK_COUNT as f64 * TICK_STEP_DEGREES - 360.0).abs() < EPS);
    }

    #[test]
    fn test_no_lit_ticks_with_handle_at_top() {
        let layout = layout();
        assert_eq!(lit_tick_count(layout.default_handle(), &layout), 0);
    }

    #[test]
    fn test_quarter_turn_lights_fifty_ticks() {
        let layout = layout();
        assert_eq!(lit_tick_count(Point::new(370.0, 200.0), &layout), 50);
    }

    #[test]
    fn test_left_half_lights_nothing() {
        let layout = layout();
        assert_eq!(lit_tick_count(Point::new(30.0, 200.0), &layout), 0);
        assert_eq!(lit_tick_count(Point::new(110.0, 60.0), &layout), 0);
    }

    #[test]
    fn test_lit_count_is_monotonic_and_bounded() {
        let layout = layout();
        let mut previous = 0;
        for x in 200..=400 {
            let count = lit_tick_count(Point::new(x as f64, 0.0), &layout);
            assert!(count >= previous);
            assert!(count < TICK_COUNT);
            previous = count;
        }
        assert_eq!(previous, 50);
    }

    #[test]
    fn test_degenerate_layout_lights_nothing() {
        let layout = Layout::recompute(0.0, 0.0, 0.0);
        assert_eq!(lit_tick_count(Point::new(5.0, 5.0), &layout), 0);
    }

    #[test]
    fn test_tick_segment_sits_below_ring_top() {
        let (start, end) = tick_segment(&layout(), 20.0);

        assert_eq!(start.x, 200.0);
        assert!((start.y - 58.0).abs() < 1e-6);
        assert!((end.y - 82.0).abs() < 1e-6);
    }

    #[test]
    fn test_neutral_projection_is_identity() {
        let m = camera_projection(&Tilt::NEUTRAL);
        assert_eq!(m.transform_point(13.0, -7.0), (13.0, -7.0));
    }

    #[test]
    fn test_tilt_pivots_on_widget_center() {
        let layout = layout();
        let surface = ImageSurface::create(Format::ARgb32, 400, 400).unwrap();
        let cr = Context::new(&surface).unwrap();
        let tilt = Tilt {
            rotate_x: -5.0,
            rotate_y: 5.0,
            parallax_x: 0.0,
            parallax_y: 0.0,
        };

        apply_tilt(&cr, &tilt, &layout);

        let (x, y) = cr.user_to_device(200.0, 200.0);
        assert!((x - 200.0).abs() < 1e-6);
        assert!((y - 200.0).abs() < 1e-6);

        let (x, _) = cr.user_to_device(400.0, 200.0);
        assert!(x < 400.0);
    }

    #[test]
    fn test_background_fills_corners() {
        let layout = layout();
        let state = DialState::new(&layout);
        let colors = ThemeColors::from_config(&ColorConfig {
            background: Some("#ff0000".parse().unwrap()),
            light: None,
            dark: None,
        });
        let style = DialStyle::new(colors, HandleIcon::default(), DEFAULT_TEXT_SIZE);

        let data = render(&state, &layout, &style, 400);
        let pixel = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);

        assert_eq!(pixel, 0xffff0000);
    }

    #[test]
    fn test_render_is_idempotent() {
        let layout = layout();
        let mut state = DialState::new(&layout);
        state.handle = Point::new(370.0, 200.0);
        state.tilt = Tilt::from_pointer(Point::new(300.0, 300.0), &layout);
        let style = DialStyle::default();

        assert_eq!(
            render(&state, &layout, &style, 400),
            render(&state, &layout, &style, 400)
        );
    }

    #[test]
    fn test_lit_ticks_change_the_frame() {
        let layout = layout();
        let style = DialStyle::default();
        let mut state = DialState::new(&layout);
        let idle = render(&state, &layout, &style, 400);

        state.handle = Point::new(370.0, 200.0);

        assert_ne!(idle, render(&state, &layout, &style, 400));
    }

    #[test]
    fn test_zero_sized_layout_still_draws_background() {
        let layout = Layout::recompute(0.0, 0.0, 0.0);
        let state = DialState::new(&layout);

        let data = render(&state, &layout, &DialStyle::default(), 8);

        assert!(data.chunks(4).all(|px| px[0..4] == data[0..4]));
    }
}
