use anyhow::{anyhow, Result};
use forcecue_playback::{DatasetRegistry, PlaybackSession, SettingsStore};
use forcecue_render::{bar_color, find_font, FontVec, FrameStats, SkiaRenderer};
use forcecue_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Icon, Window, WindowId},
};

use crate::config::AppConfig;
use crate::controls::{command_for, Command};
use crate::feedback::{AppPlayer, TracingHaptics};
use crate::headless::log_event;

type Session = PlaybackSession<HighPrecisionTimer, TracingHaptics, AppPlayer>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    font: Option<FontVec>,
    session: Session,
    store: SettingsStore,
    config: AppConfig,
    frame_timer: HighPrecisionTimer,
    icon: Option<Icon>,
    current_size: Option<PhysicalSize<u32>>,
    scale_factor: f64,
    frames: u64,

    should_exit: bool,
}

impl App {
    pub fn new(config: AppConfig, registry: Arc<DatasetRegistry>) -> Result<Self> {
        let mut store = SettingsStore::new(config.settings.clone());
        let timer = HighPrecisionTimer::new();
        let session = PlaybackSession::new(
            config.playback.clone(),
            registry,
            store.subscribe(),
            timer.clone(),
            TracingHaptics::default(),
            AppPlayer::detect(),
        )?;
        let font = find_font(config.display.font_path.as_deref());
        let icon = match Self::build_icon(32) {
            Ok(icon) => Some(icon),
            Err(e) => {
                tracing::warn!(error = %e, "window icon unavailable");
                None
            }
        };

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            font,
            session,
            store,
            config,
            frame_timer: timer,
            icon,
            current_size: None,
            scale_factor: 1.0,
            frames: 0,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        tracing::info!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "press SPACE to start, ESC to quit"
        );
        event_loop.run_app(&mut self).map_err(Into::into)
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let display = &self.config.display;
        let mut attributes = Window::default_attributes()
            .with_title("ForceCue")
            .with_inner_size(LogicalSize::new(display.width, display.height))
            .with_min_inner_size(LogicalSize::new(480, 360))
            .with_window_icon(self.icon.clone());
        if display.fullscreen {
            let monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next())
                .ok_or_else(|| anyhow!("no monitor available"))?;
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        self.current_size = Some(size);
        self.scale_factor = window.scale_factor();
        tracing::info!(
            width = size.width,
            height = size.height,
            scale = self.scale_factor,
            "window created"
        );

        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);
        self.renderer = Some(SkiaRenderer::new(size.width, size.height, self.font.take())?);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let view = self.session.view();
        let stats: FrameStats = renderer.render_frame(
            &view,
            self.session.settings(),
            pixels.frame_mut(),
            &mut self.frame_timer,
        )?;
        let t = self.frame_timer.now();
        pixels.render()?;
        let present = self.frame_timer.elapsed(t);

        self.frames += 1;
        tracing::trace!(
            present_ms = present.as_secs_f64() * 1e3,
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            text = stats.text_blits,
            "frame"
        );
        if self.frames % 600 == 0 {
            let cal = self.frame_timer.calibration_stats();
            tracing::debug!(?cal, "frame timing");
        }
        Ok(())
    }

    fn update(&mut self) {
        for event in self.session.update() {
            log_event(&event);
        }
    }

    fn handle_input(&mut self, key: PhysicalKey, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(command) = command_for(code, &self.store.current()) else {
            return;
        };
        match command {
            Command::TogglePlay => self.session.toggle_play().iter().for_each(log_event),
            Command::Reset => self.session.reset().iter().for_each(log_event),
            Command::Update(update) => {
                let settings = self.store.update(update);
                tracing::debug!(?settings, "settings changed");
            }
            Command::TestSound => {
                if let Err(e) = self.session.test_sound() {
                    tracing::warn!(error = %e, "test sound failed");
                }
            }
            Command::Quit => self.cleanup_and_exit(event_loop),
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize renderer");
            }
        }
        tracing::debug!(width = new_size.width, height = new_size.height, "resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.session.reset();
        tracing::info!(frames = self.frames, "exiting");
        self.should_exit = true;
        event_loop.exit();
    }

    /// A small force-bar glyph using the bar gradient.
    fn build_icon(size: u32) -> Result<Icon> {
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            let force = 0.1 * (size - 1 - y) as f64 / (size - 1).max(1) as f64;
            let fill = bar_color(force).to_rgba();
            for x in 0..size {
                let inside = x >= size / 4 && x < size - size / 4;
                rgba.extend_from_slice(if inside { &fill } else { &[0, 0, 0, 0] });
            }
        }
        Icon::from_rgba(rgba, size, size).map_err(Into::into)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                tracing::error!(error = %e, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    tracing::error!(error = %e, "render failed");
                    self.cleanup_and_exit(event_loop);
                    return;
                }
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                self.handle_input(event.physical_key, event_loop);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_builds() {
        assert!(App::build_icon(32).is_ok());
        assert!(App::build_icon(1).is_ok());
    }
}
