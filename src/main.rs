#![windows_subsystem = "windows"]
//! ISCV Consulta - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod currency;
mod loader;
mod pagination;
mod search;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::{error, info};
use utils::{get_cache_dir, get_data_dir};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "iscv-consulta.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,iscv_consulta=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    let cache_dir = get_cache_dir();

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "ISCV Consulta starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            panic!("Failed to start async runtime: {}", e);
        }
    };

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1280.0, 800.0)))
        .with_min_inner_size([1024.0, 640.0])
        .with_title(APP_NAME);

    // Window/taskbar icon from the rasterized logo
    if let Some((rgba, width, height)) = utils::rasterize_logo(64) {
        let icon = egui::IconData { rgba, width, height };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, runtime, settings, data_dir, cache_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Start loading on first frame
        if !self.load_started {
            self.load_started = true;
            self.start_load(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.poll_load();
        self.update_intro_timer(ctx);

        if self.data.is_some() && !self.any_modal_open() && !ctx.wants_keyboard_input() {
            self.handle_global_keys(ctx);
        }

        // Panels must be added before the CentralPanel
        self.render_header(ctx);
        self.render_footer(ctx);
        self.render_sidebar(ctx);
        self.render_central(ctx);

        self.render_detail_modal(ctx);
        self.render_tutorial_modal(ctx);
        self.render_intro_modal(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

impl App {
    /// Type anywhere to search; arrows, PageUp/PageDown and Home/End page through results
    fn handle_global_keys(&mut self, ctx: &egui::Context) {
        let mut typed_text = String::new();
        let mut backspace = false;
        let mut page_step = 0i32;
        let mut jump: Option<bool> = None;
        ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::Text(text) => {
                        if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
                            typed_text.push_str(text);
                        }
                    }
                    egui::Event::Key { key, pressed: true, .. } => match key {
                        egui::Key::Backspace => backspace = true,
                        egui::Key::ArrowLeft | egui::Key::PageUp => page_step -= 1,
                        egui::Key::ArrowRight | egui::Key::PageDown => page_step += 1,
                        egui::Key::Home => jump = Some(false),
                        egui::Key::End => jump = Some(true),
                        _ => {}
                    },
                    _ => {}
                }
            }
        });

        if !typed_text.is_empty() {
            self.view.filter.term.push_str(&typed_text);
            self.focus_search = true;
            self.on_filters_changed();
        }
        if backspace && !self.view.filter.term.is_empty() {
            self.view.filter.term.pop();
            self.focus_search = true;
            self.on_filters_changed();
        }

        let count = self.view.count();
        let paginator = &mut self.view.paginator;
        if page_step < 0 {
            paginator.prev(count);
        } else if page_step > 0 {
            paginator.next(count);
        }
        match jump {
            Some(true) => paginator.set_page(paginator.total_pages(count), count),
            Some(false) => paginator.set_page(1, count),
            None => {}
        }
    }
}
