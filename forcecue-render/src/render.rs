use ab_glyph::FontVec;
use anyhow::{bail, Result};
use bytemuck::{cast_slice, cast_slice_mut};
use forcecue_cache::{get_text, intern_text};
use forcecue_core::thresholds::{scale_max, SCALE_TICKS};
use forcecue_core::{Band, Settings};
use forcecue_playback::PlaybackView;
use forcecue_timing::Timer;
use std::sync::Arc;
use std::time::Duration;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

use crate::palette::{self, Rgb};
use crate::text::TextCache;

pub const TITLE: &str = "Force Feedback Monitor";
pub const IDLE_PROMPT: &str = "Press play to start monitoring";
pub const HELP: &str =
    "Space play/pause   R reset   1-7 trial   V vibration   A audio   S sound   Up/Down volume   T test";
const FORCE_CAPTION: &str = "Current force";
const NO_READING: &str = "-- N";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Body,
    Title,
    Readout,
}

impl TextSize {
    const ALL: [TextSize; 4] = [TextSize::Small, TextSize::Body, TextSize::Title, TextSize::Readout];

    fn px(self) -> f32 {
        match self {
            TextSize::Small => 13.0,
            TextSize::Body => 18.0,
            TextSize::Title => 28.0,
            TextSize::Readout => 44.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub clear: Duration,
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
    pub text_blits: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub bar: Rect,
    pub panel_x: f32,
    pub banner: Rect,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let (w, h) = (width as f32, height as f32);
        let bar_top = 100.0;
        let bar_bottom = (h - 110.0).max(bar_top + 20.0);
        let bar = Rect::from_ltrb(90.0, bar_top, 170.0, bar_bottom)?;
        let panel_x = bar.right() + 90.0;
        let banner = Rect::from_xywh(panel_x, 200.0, (w - panel_x - 30.0).max(40.0), 56.0)?;
        Some(Self {
            width: w,
            height: h,
            bar,
            panel_x,
            banner,
        })
    }

    /// Vertical position of `force` on the bar for the given scale ceiling.
    pub fn bar_y(&self, force: f64, scale: f64) -> f32 {
        let frac = (force / scale).clamp(0.0, 1.0) as f32;
        self.bar.bottom() - frac * self.bar.height()
    }
}

pub struct SkiaRenderer {
    width: u32,
    height: u32,
    layout: Layout,
    canvas: Pixmap,
    text: Option<Vec<TextCache>>,
    text_blits: usize,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Result<Self> {
        Self::pre_intern_labels();
        let Some(layout) = Layout::new(width, height) else {
            bail!("invalid canvas size {width}x{height}");
        };
        let Some(canvas) = Pixmap::new(width, height) else {
            bail!("invalid canvas size {width}x{height}");
        };
        let text = font.map(|font| {
            let font = Arc::new(font);
            TextSize::ALL
                .iter()
                .map(|s| TextCache::new(Arc::clone(&font), s.px()))
                .collect()
        });
        Ok(Self {
            width,
            height,
            layout,
            canvas,
            text,
            text_blits: 0,
        })
    }

    fn pre_intern_labels() {
        for label in [TITLE, IDLE_PROMPT, HELP, FORCE_CAPTION, NO_READING] {
            intern_text(label);
        }
        for band in Band::ALL {
            intern_text(band.alert_message());
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (Some(layout), Some(canvas)) = (Layout::new(width, height), Pixmap::new(width, height))
        else {
            bail!("invalid canvas size {width}x{height}");
        };
        self.width = width;
        self.height = height;
        self.layout = layout;
        self.canvas = canvas;
        tracing::debug!(width, height, "renderer resized");
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Redraws the screen for `view` and copies it into `frame_buffer`, which
    /// must be `width * height * 4` bytes of RGBA.
    pub fn render_frame<T>(
        &mut self,
        view: &PlaybackView,
        settings: &Settings,
        frame_buffer: &mut [u8],
        timer: &mut T,
    ) -> Result<FrameStats>
    where
        T: Timer<Timestamp = u64>,
    {
        if frame_buffer.len() != self.canvas.data().len() {
            bail!(
                "frame buffer is {} bytes, canvas needs {}",
                frame_buffer.len(),
                self.canvas.data().len()
            );
        }
        self.text_blits = 0;

        let t = timer.now();
        self.canvas.fill(palette::BACKGROUND.to_color());
        let clear = timer.elapsed(t);

        let t = timer.now();
        self.draw_screen(view, settings);
        let draw = timer.elapsed(t);

        let t = timer.now();
        frame_buffer.copy_from_slice(self.canvas.data());
        let copy = timer.elapsed(t);

        let total = clear + draw + copy;
        timer.record_frame(total);
        Ok(FrameStats {
            clear,
            draw,
            copy,
            total,
            text_blits: self.text_blits,
        })
    }

    fn draw_screen(&mut self, view: &PlaybackView, settings: &Settings) {
        let l = self.layout;
        let cx = l.width * 0.5;

        self.draw_label(TITLE, TextSize::Title, palette::INK, (cx, 32.0), Align::Center);
        let status = format!(
            "{}   {}   {:.2}s",
            view.dataset,
            view.state.label(),
            view.elapsed
        );
        self.draw_text(&status, TextSize::Body, palette::MUTED, (cx, 66.0), Align::Center);

        match view.current_force {
            Some(force) => self.draw_bar(force),
            None => {
                let mid_y = (l.bar.top() + l.bar.bottom()) * 0.5;
                self.draw_label(IDLE_PROMPT, TextSize::Body, palette::MUTED, (cx, mid_y), Align::Center);
            }
        }
        self.draw_panel(view);
        self.draw_footer(settings);
    }

    fn draw_bar(&mut self, force: f64) {
        let l = self.layout;
        let scale = scale_max(force);
        self.fill(l.bar, palette::TRACK);

        let top = l.bar_y(force, scale);
        if let Some(fill) = Rect::from_ltrb(l.bar.left(), top, l.bar.right(), l.bar.bottom()) {
            self.fill(fill, palette::bar_color(force));
        }

        for tick in SCALE_TICKS {
            let y = l.bar_y(tick, scale);
            let color = if tick > 0.0 {
                palette::readout_color(tick)
            } else {
                palette::MUTED
            };
            if let Some(line) = Rect::from_xywh(l.bar.left() - 6.0, y - 1.0, l.bar.width() + 12.0, 2.0) {
                self.fill(line, color);
            }
            self.draw_text(
                &format!("{tick:.2}"),
                TextSize::Small,
                palette::MUTED,
                (l.bar.left() - 12.0, y),
                Align::Right,
            );
        }
        self.draw_text(
            &format!("{scale:.2} N"),
            TextSize::Small,
            palette::MUTED,
            (l.bar.left() + l.bar.width() * 0.5, l.bar.top() - 14.0),
            Align::Center,
        );
    }

    fn draw_panel(&mut self, view: &PlaybackView) {
        let l = self.layout;
        let x = l.panel_x;

        self.draw_label(FORCE_CAPTION, TextSize::Body, palette::MUTED, (x, 112.0), Align::Left);
        match view.current_force {
            Some(force) => self.draw_text(
                &format!("{force:.4} N"),
                TextSize::Readout,
                palette::readout_color(force),
                (x, 158.0),
                Align::Left,
            ),
            None => self.draw_label(NO_READING, TextSize::Readout, palette::MUTED, (x, 158.0), Align::Left),
        }

        if let Some(band) = view.last_alert {
            self.fill(l.banner, palette::banner_color(band));
            if let Some(edge) = Rect::from_xywh(l.banner.left(), l.banner.top(), 6.0, l.banner.height()) {
                self.fill(edge, palette::banner_text_color(band));
            }
            self.draw_label(
                band.alert_message(),
                TextSize::Body,
                palette::banner_text_color(band),
                (l.banner.left() + 20.0, l.banner.top() + l.banner.height() * 0.5),
                Align::Left,
            );
        }

        let y = l.banner.bottom() + 36.0;
        self.draw_text(
            &format!("Tempo: {} BPM", view.tempo.bpm()),
            TextSize::Body,
            palette::INK,
            (x, y),
            Align::Left,
        );
        self.draw_text(
            &format!("Trial length: {:.2}s", view.end_time),
            TextSize::Body,
            palette::MUTED,
            (x, y + 28.0),
            Align::Left,
        );
    }

    fn draw_footer(&mut self, settings: &Settings) {
        let l = self.layout;
        if let Some(panel) = Rect::from_xywh(0.0, l.height - 90.0, l.width, 90.0) {
            self.fill(panel, palette::PANEL);
        }
        let on_off = |b: bool| if b { "on" } else { "off" };
        let summary = format!(
            "Vibration: {}   Audio: {}   Sound: {}   Volume: {:.0}%",
            on_off(settings.vibration),
            on_off(settings.audio),
            settings.sound_name(),
            settings.volume * 100.0
        );
        let cx = l.width * 0.5;
        self.draw_text(&summary, TextSize::Body, palette::INK, (cx, l.height - 58.0), Align::Center);
        self.draw_label(HELP, TextSize::Small, palette::MUTED, (cx, l.height - 26.0), Align::Center);
    }

    fn fill(&mut self, rect: Rect, color: Rgb) {
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(color.to_color());
        self.canvas.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_label(&mut self, label: &'static str, size: TextSize, color: Rgb, pos: (f32, f32), align: Align) {
        if self.text.is_none() {
            return;
        }
        let id = intern_text(label);
        self.blit_text_by_intern_id(id, size, color, pos, align);
    }

    fn blit_text_by_intern_id(
        &mut self,
        intern_id: usize,
        size: TextSize,
        color: Rgb,
        pos: (f32, f32),
        align: Align,
    ) {
        let Some(atom) = get_text(intern_id) else {
            return;
        };
        let Some(cache) = self.text.as_mut().and_then(|c| c.get_mut(size as usize)) else {
            return;
        };
        if let Some(pm) = cache.label(atom, color) {
            self.blit(&pm, pos, align);
        }
    }

    /// Text that changes from frame to frame; never interned.
    fn draw_text(&mut self, text: &str, size: TextSize, color: Rgb, pos: (f32, f32), align: Align) {
        let Some(cache) = self.text.as_mut().and_then(|c| c.get_mut(size as usize)) else {
            return;
        };
        if let Some(pm) = cache.formatted(text, color) {
            self.blit(&pm, pos, align);
        }
    }

    fn blit(&mut self, pm: &Pixmap, pos: (f32, f32), align: Align) {
        let (w, h) = (pm.width() as i32, pm.height() as i32);
        let x = match align {
            Align::Left => pos.0 as i32,
            Align::Center => (pos.0 - w as f32 * 0.5) as i32,
            Align::Right => (pos.0 - w as f32) as i32,
        };
        let y = (pos.1 - h as f32 * 0.5) as i32;
        let (cw, ch) = (self.width as i32, self.height as i32);

        if x + w <= 0 || y + h <= 0 || x >= cw || y >= ch {
            return;
        }

        let dst_x = x.max(0) as usize;
        let dst_y = y.max(0) as usize;
        let src_x = (-x).max(0) as usize;
        let src_y = (-y).max(0) as usize;
        let copy_w = (w as usize - src_x).min(cw as usize - dst_x);
        let copy_h = (h as usize - src_y).min(ch as usize - dst_y);

        let src: &[u32] = cast_slice(pm.data());
        let dst: &mut [u32] = cast_slice_mut(self.canvas.data_mut());
        let src_stride = w as usize;
        let dst_stride = cw as usize;

        for row in 0..copy_h {
            let s0 = (src_y + row) * src_stride + src_x;
            let d0 = (dst_y + row) * dst_stride + dst_x;
            for i in 0..copy_w {
                let s = src[s0 + i];
                let sa = s >> 24;
                if sa == 0 {
                    continue;
                }
                let d = dst[d0 + i];
                let inv = 255 - sa;
                let mix = |shift: u32| ((s >> shift) & 0xFF) + (((d >> shift) & 0xFF) * inv + 127) / 255;
                dst[d0 + i] = (mix(24).min(255) << 24)
                    | (mix(16).min(255) << 16)
                    | (mix(8).min(255) << 8)
                    | mix(0).min(255);
            }
        }
        self.text_blits += 1;
    }

    pub fn cached_text_count(&self) -> usize {
        self.text
            .as_ref()
            .map_or(0, |caches| caches.iter().map(TextCache::len).sum())
    }
}
