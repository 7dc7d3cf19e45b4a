use relm4::prelude::*;
use ringtimer::config;
use ringtimer::gui::app::AppModel;
use ringtimer::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.ringtimer");

    app.run::<AppModel>((config, rx));
}
