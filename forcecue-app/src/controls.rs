use forcecue_core::{Settings, SettingsUpdate};
use forcecue_playback::TrialKey;
use winit::keyboard::KeyCode;

pub const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TogglePlay,
    Reset,
    Update(SettingsUpdate),
    TestSound,
    Quit,
}

/// Volume after one step, kept within `0..=1` and on tenths.
pub fn step_volume(volume: f32, delta: f32) -> f32 {
    ((volume + delta) * 10.0).round().clamp(0.0, 10.0) / 10.0
}

/// Maps a pressed key to an action against the current settings.
pub fn command_for(key: KeyCode, settings: &Settings) -> Option<Command> {
    let dataset = |i: usize| {
        TrialKey::ALL
            .get(i)
            .map(|k| Command::Update(SettingsUpdate::data_source(k.as_str())))
    };
    match key {
        KeyCode::Space => Some(Command::TogglePlay),
        KeyCode::KeyR => Some(Command::Reset),
        KeyCode::Digit1 => dataset(0),
        KeyCode::Digit2 => dataset(1),
        KeyCode::Digit3 => dataset(2),
        KeyCode::Digit4 => dataset(3),
        KeyCode::Digit5 => dataset(4),
        KeyCode::Digit6 => dataset(5),
        KeyCode::Digit7 => dataset(6),
        KeyCode::KeyV => Some(Command::Update(SettingsUpdate::vibration(!settings.vibration))),
        KeyCode::KeyA => Some(Command::Update(SettingsUpdate::audio(!settings.audio))),
        KeyCode::KeyS => Some(Command::Update(SettingsUpdate::sound(
            settings.sound_name().next().as_str(),
        ))),
        KeyCode::ArrowUp => Some(Command::Update(SettingsUpdate::volume(step_volume(
            settings.volume,
            VOLUME_STEP,
        )))),
        KeyCode::ArrowDown => Some(Command::Update(SettingsUpdate::volume(step_volume(
            settings.volume,
            -VOLUME_STEP,
        )))),
        KeyCode::KeyT => Some(Command::TestSound),
        KeyCode::Escape => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_steps_clamp() {
        assert_eq!(step_volume(0.5, 0.1), 0.6);
        assert_eq!(step_volume(0.95, 0.1), 1.0);
        assert_eq!(step_volume(1.0, 0.1), 1.0);
        assert_eq!(step_volume(0.05, -0.1), 0.0);
        assert_eq!(step_volume(0.0, -0.1), 0.0);
    }

    #[test]
    fn digits_pick_trials_in_catalog_order() {
        let s = Settings::default();
        assert_eq!(
            command_for(KeyCode::Digit5, &s),
            Some(Command::Update(SettingsUpdate::data_source("Surgeon_2_Trial_1")))
        );
        assert_eq!(command_for(KeyCode::Digit8, &s), None);
    }

    #[test]
    fn toggles_invert_current_settings() {
        let s = Settings::default();
        assert_eq!(
            command_for(KeyCode::KeyV, &s),
            Some(Command::Update(SettingsUpdate::vibration(false)))
        );
        assert_eq!(
            command_for(KeyCode::KeyA, &s),
            Some(Command::Update(SettingsUpdate::audio(true)))
        );
        assert_eq!(
            command_for(KeyCode::KeyS, &s),
            Some(Command::Update(SettingsUpdate::sound("Loud Beep")))
        );
        assert_eq!(command_for(KeyCode::Escape, &s), Some(Command::Quit));
    }
}
