use crate::config::DialConfig;
use gtk::prelude::*;
use gtk4 as gtk;

pub fn init_window(window: &gtk::ApplicationWindow, config: &DialConfig) {
    window.set_title(Some("Ring Timer"));
    window.set_default_size(config.width.max(1), config.height.max(1));
    window.set_resizable(true);
}
