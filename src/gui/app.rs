use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::dial::{
    AnimationHandle, AnimationStep, DialStyle, HandleIcon, Point, Size, TimerDial,
};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub dial: Rc<RefCell<TimerDial>>,
    pub config: Config,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(i32, i32),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    StartTimer(u64),
    CancelTimer,
    SetText(String),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::StartTimer(secs) => AppMsg::StartTimer(secs),
            AppEvent::CancelTimer => AppMsg::CancelTimer,
            AppEvent::SetText(text) => AppMsg::SetText(text),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            add_css_class: "ringtimer-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::CancelTimer);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "ringtimer-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerDown(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::PointerMove(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::PointerUp(Point::new(x + dx, y + dy)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_window(&root, &config.dial);

        let dial = TimerDial::new(Size::default(), config.dial.padding, DialStyle::default());

        let model = AppModel {
            dial: Rc::new(RefCell::new(dial)),
            config,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.apply_config();

        let dial_draw = model.dial.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                if let Err(e) = dial_draw.borrow().render(cr) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.config = new_config;
                    self.apply_config();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            msg => self.dispatch(msg),
        }
        self.flush_requests();
    }
}

impl AppModel {
    fn dispatch(&self, msg: AppMsg) {
        let mut dial = self.dial.borrow_mut();
        match msg {
            AppMsg::Resize(width, height) => {
                dial.on_bounds_changed(Size::new(width as f64, height as f64));
            }
            AppMsg::PointerDown(point) => {
                dial.on_pointer_down(point);
            }
            AppMsg::PointerMove(point) => {
                dial.on_pointer_move(point);
            }
            AppMsg::PointerUp(point) => {
                dial.on_pointer_up(point);
            }
            AppMsg::StartTimer(secs) => dial.start_timer(Duration::from_secs(secs)),
            AppMsg::CancelTimer => dial.cancel_timer(),
            AppMsg::SetText(text) => dial.set_display_text(text),
            AppMsg::ConfigReload => {}
        }
    }

    /// Resolves theme colors against the live style context and pushes the
    /// current config into the dial.
    fn apply_config(&self) {
        let colors =
            ThemeColors::from_context(&self.drawing_area.style_context(), &self.config.colors);
        let style = DialStyle::new(
            colors,
            HandleIcon::load(
                self.config.dial.handle_icon.as_deref(),
                self.config.dial.handle_size,
            ),
            self.config.dial.text_size,
        );

        let mut dial = self.dial.borrow_mut();
        dial.set_style(style);
        dial.set_padding(self.config.dial.padding);
    }

    fn flush_requests(&self) {
        let requests = self.dial.borrow_mut().take_requests();
        if let Some(handle) = requests.start_return {
            self.drive_return(handle);
        }
        if requests.should_redraw {
            self.drawing_area.queue_draw();
        }
    }

    /// Steps the return animation once per frame until it finishes or a newer
    /// animation takes over the slot.
    fn drive_return(&self, handle: AnimationHandle) {
        let dial = self.dial.clone();
        self.drawing_area.add_tick_callback(move |area, clock| {
            let step = dial.borrow_mut().advance_return(handle, clock.frame_time());
            if step.should_continue() {
                area.queue_draw();
                return glib::ControlFlow::Continue;
            }
            if step == AnimationStep::Finished {
                area.queue_draw();
            }
            glib::ControlFlow::Break
        });
    }
}
