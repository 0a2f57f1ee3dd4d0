mod map_view;
mod sheet_view;

use std::{
    sync::mpsc::Receiver,
    time::{Duration, SystemTime},
};

use egui::Visuals;
use log::error;

use homebound::{AppConfig, LocationWatcher, NavigationEvent, Navigator};

const REFRESH_RATE_MS: u64 = 100;
const MAX_EVENTS_PER_REFRESH: usize = 10;
const MAX_TIME_PER_REFRESH_MS: u128 = 50;

/// `NavigationApp` shows the live route, ETA and directions in a window.
///
/// # Fields
///
/// * `navigator` - Owns the navigation state and issues route requests.
/// * `event_receiver` - Location fixes and route results to apply.
/// * `watcher` - The location subscription, released on exit.
/// * `app_config` - Persisted settings, saved on exit with the last zoom level.
pub struct NavigationApp {
    navigator: Navigator,
    event_receiver: Receiver<NavigationEvent>,
    watcher: LocationWatcher,
    app_config: AppConfig,
}

impl NavigationApp {
    pub fn new(
        navigator: Navigator,
        event_receiver: Receiver<NavigationEvent>,
        watcher: LocationWatcher,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        cc.egui_ctx.set_visuals(Visuals::light());
        egui_extras::install_image_loaders(&cc.egui_ctx);

        Self {
            navigator,
            event_receiver,
            watcher,
            app_config,
        }
    }

    fn process_events(&mut self) {
        let start_refresh = SystemTime::now();
        // apply a few events and then yield so the UI stays responsive
        let mut events_processed = 0;
        while let Ok(event) = self.event_receiver.try_recv() {
            self.navigator.handle_event(event);
            events_processed += 1;

            let elapsed_ms = SystemTime::now()
                .duration_since(start_refresh)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            if events_processed >= MAX_EVENTS_PER_REFRESH || elapsed_ms >= MAX_TIME_PER_REFRESH_MS {
                break;
            }
        }
    }
}

impl eframe::App for NavigationApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.watcher.teardown();
        self.navigator.shutdown();
        self.navigator.stop_recording();

        self.app_config.zoom = self.navigator.state().zoom();
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();

        let render = self.navigator.render();
        self.sheet_view(ctx, &render);
        self.map_view(ctx, &render);

        ctx.request_repaint_after(Duration::from_millis(REFRESH_RATE_MS));
    }
}
