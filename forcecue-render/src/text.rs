use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use anyhow::{Context, Result};
use forcecue_cache::Atom;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::palette::Rgb;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("parsing font {}", path.display()))
}

/// The configured font if given, otherwise the first readable system font.
pub fn find_font(configured: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = configured {
        match load_font(path) {
            Ok(font) => return Some(font),
            Err(e) => tracing::warn!(error = %e, "configured font unusable"),
        }
    }
    let found = SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .find_map(|p| load_font(&p).ok().map(|f| (p, f)));
    match found {
        Some((path, font)) => {
            tracing::debug!(path = %path.display(), "using system font");
            Some(font)
        }
        None => {
            tracing::warn!("no font found, text will not be drawn");
            None
        }
    }
}

/// Rasterizes `text` into a tight premultiplied pixmap. `None` when the text
/// has no visible glyphs.
pub fn render_text_pixmap<F: Font>(text: &str, font_size: f32, font: &F, color: Rgb) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::with_capacity(text.len());
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    let (min_x, min_y, max_x, max_y) = outlines.iter().map(|o| o.px_bounds()).fold(
        (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        |(x0, y0, x1, y1), b| (x0.min(b.min.x), y0.min(b.min.y), x1.max(b.max.x), y1.max(b.max.y)),
    );
    if outlines.is_empty() {
        return None;
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;
    let stride = w as usize;
    let dst = pm.pixels_mut();

    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // Source-over in premultiplied space.
            let a = cov.clamp(0.0, 1.0);
            let sa = (a * 255.0) as u8;
            let sr = (color.0 as f32 * a) as u8;
            let sg = (color.1 as f32 * a) as u8;
            let sb = (color.2 as f32 * a) as u8;
            let bg = dst[i];
            let inv = 1.0 - a;
            let r = sr.saturating_add((bg.red() as f32 * inv) as u8);
            let g = sg.saturating_add((bg.green() as f32 * inv) as u8);
            let bl = sb.saturating_add((bg.blue() as f32 * inv) as u8);
            let al = sa.saturating_add((bg.alpha() as f32 * inv) as u8);
            if let Some(px) = PremultipliedColorU8::from_rgba(r.min(al), g.min(al), bl.min(al), al) {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}

/// Entries keyed by recency; inserting past `capacity` drops the least
/// recently used one.
pub(crate) struct RecentCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> RecentCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
    }

    fn touch(&mut self, key: &K) {
        if let Some(i) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(i) {
                self.order.push_back(k);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

pub(crate) const RECENT_TEXT_CAPACITY: usize = 128;

type Raster = Option<Arc<Pixmap>>;

/// Rasterized text for one font size. Fixed labels are keyed by intern atom
/// and kept; formatted readouts go through a bounded recent cache.
pub(crate) struct TextCache {
    font: Arc<FontVec>,
    size_px: f32,
    labels: HashMap<(Atom, Rgb), Raster>,
    recent: RecentCache<(String, Rgb), Raster>,
}

impl TextCache {
    pub(crate) fn new(font: Arc<FontVec>, size_px: f32) -> Self {
        Self {
            font,
            size_px,
            labels: HashMap::new(),
            recent: RecentCache::new(RECENT_TEXT_CAPACITY),
        }
    }

    pub(crate) fn label(&mut self, atom: Atom, color: Rgb) -> Raster {
        let key = (atom, color);
        if let Some(p) = self.labels.get(&key) {
            return p.clone();
        }
        let pm = render_text_pixmap(key.0.as_ref(), self.size_px, &*self.font, color)
            .map(Arc::new);
        self.labels.insert(key, pm.clone());
        pm
    }

    pub(crate) fn formatted(&mut self, text: &str, color: Rgb) -> Raster {
        let key = (text.to_owned(), color);
        if let Some(p) = self.recent.get(&key) {
            return p;
        }
        let pm = render_text_pixmap(text, self.size_px, &*self.font, color).map(Arc::new);
        self.recent.insert(key, pm.clone());
        pm
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len() + self.recent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_cache_drops_least_recently_used() {
        let mut cache = RecentCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn recent_cache_stays_within_capacity() {
        let mut cache = RecentCache::new(RECENT_TEXT_CAPACITY);
        for i in 0..5000 {
            cache.insert(format!("{:.2}s", i as f64 * 0.05), i);
        }
        assert_eq!(cache.len(), RECENT_TEXT_CAPACITY);
        cache.insert(format!("{:.2}s", 4999.0 * 0.05), 0);
        assert_eq!(cache.len(), RECENT_TEXT_CAPACITY);
    }
}
