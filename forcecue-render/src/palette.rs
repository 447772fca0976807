//! Force-to-color mappings for the monitor screen.

use forcecue_core::Band;
use forcecue_core::thresholds::{CRITICAL, HIGH, MEDIUM, WARNING};
use tiny_skia::Color;

/// Straight (non-premultiplied) sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, 255)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

fn channel(v: f64) -> u8 {
    v.floor().clamp(0.0, 255.0) as u8
}

/// Continuous bar fill: blue through green, yellow and orange to red as the
/// force crosses each threshold.
pub fn bar_color(force: f64) -> Rgb {
    if force <= WARNING {
        let k = force / WARNING;
        Rgb(0, channel(150.0 + k * 105.0), 255)
    } else if force <= MEDIUM {
        let k = (force - WARNING) / (MEDIUM - WARNING);
        Rgb(
            channel(k * 255.0),
            channel(200.0 + k * 55.0),
            channel(255.0 - k * 255.0),
        )
    } else if force <= HIGH {
        let k = (force - MEDIUM) / (HIGH - MEDIUM);
        Rgb(255, channel(255.0 - k * 155.0), 0)
    } else {
        let k = (force - HIGH) / (CRITICAL - HIGH);
        Rgb(255, channel(100.0 - k * 100.0), 0)
    }
}

pub const READOUT_CRITICAL: Rgb = Rgb::hex(0xdc2626);
pub const READOUT_HIGH: Rgb = Rgb::hex(0xea580c);
pub const READOUT_MEDIUM: Rgb = Rgb::hex(0xf59e0b);
pub const READOUT_WARNING: Rgb = Rgb::hex(0x84cc16);
pub const READOUT_SAFE: Rgb = Rgb::hex(0x22c55e);

pub fn readout_color(force: f64) -> Rgb {
    if force >= CRITICAL {
        READOUT_CRITICAL
    } else if force >= HIGH {
        READOUT_HIGH
    } else if force >= MEDIUM {
        READOUT_MEDIUM
    } else if force >= WARNING {
        READOUT_WARNING
    } else {
        READOUT_SAFE
    }
}

pub fn banner_color(band: Band) -> Rgb {
    match band {
        Band::Critical => Rgb::hex(0xfee2e2),
        Band::High => Rgb::hex(0xffedd5),
        Band::Medium => Rgb::hex(0xfef3c7),
        Band::Warning => Rgb::hex(0xf0fdf4),
    }
}

/// Text color on the alert banner, matching the readout for the same band.
pub fn banner_text_color(band: Band) -> Rgb {
    match band {
        Band::Critical => READOUT_CRITICAL,
        Band::High => READOUT_HIGH,
        Band::Medium => READOUT_MEDIUM,
        Band::Warning => READOUT_WARNING,
    }
}

pub const BACKGROUND: Rgb = Rgb::hex(0xf8fafc);
pub const PANEL: Rgb = Rgb::hex(0xffffff);
pub const TRACK: Rgb = Rgb::hex(0xe5e7eb);
pub const INK: Rgb = Rgb::hex(0x111827);
pub const MUTED: Rgb = Rgb::hex(0x6b7280);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_segments() {
        assert_eq!(bar_color(0.0), Rgb(0, 150, 255));
        assert_eq!(bar_color(0.025), Rgb(0, 202, 255));
        assert_eq!(bar_color(0.05), Rgb(0, 255, 255));
        assert_eq!(bar_color(0.08), Rgb(255, 0, 0));
        assert_eq!(bar_color(0.5), Rgb(255, 0, 0));

        let mid = bar_color(0.055);
        assert!((126..=128).contains(&mid.0));
        assert!((126..=128).contains(&mid.2));

        let orange = bar_color(0.065);
        assert_eq!((orange.0, orange.2), (255, 0));
        assert!((176..=178).contains(&orange.1));
    }

    #[test]
    fn negative_force_clamps_to_blue() {
        assert_eq!(bar_color(-0.1), Rgb(0, 0, 255));
    }

    #[test]
    fn red_channel_never_decreases() {
        let mut last = 0;
        for i in 0..=120 {
            let c = bar_color(i as f64 * 0.001);
            assert!(c.0 >= last);
            last = c.0;
        }
    }

    #[test]
    fn readout_thresholds() {
        assert_eq!(readout_color(0.081), READOUT_CRITICAL);
        assert_eq!(readout_color(0.08), READOUT_CRITICAL);
        assert_eq!(readout_color(0.075), READOUT_HIGH);
        assert_eq!(readout_color(0.065), READOUT_MEDIUM);
        assert_eq!(readout_color(0.055), READOUT_WARNING);
        assert_eq!(readout_color(0.01), READOUT_SAFE);
        assert_eq!(READOUT_CRITICAL, Rgb(0xdc, 0x26, 0x26));
    }

    #[test]
    fn banners_per_band() {
        assert_eq!(banner_color(Band::Critical), Rgb(0xfe, 0xe2, 0xe2));
        assert_eq!(banner_color(Band::High), Rgb(0xff, 0xed, 0xd5));
        assert_eq!(banner_color(Band::Medium), Rgb(0xfe, 0xf3, 0xc7));
        assert_eq!(banner_color(Band::Warning), Rgb(0xf0, 0xfd, 0xf4));
    }
}
