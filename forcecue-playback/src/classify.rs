use forcecue_core::{Band, Label, Tempo};

/// Outcome of classifying one sample's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub band: Band,
}

impl Classification {
    pub fn alert_message(&self) -> &'static str {
        self.band.alert_message()
    }

    pub fn vibration_pattern(&self) -> &'static [u64] {
        self.band.vibration_pattern()
    }

    pub fn tempo(&self) -> Tempo {
        self.band.tempo()
    }
}

/// `None` means no alert: the caller keeps its previous alert and tempo.
pub fn classify(label: Label) -> Option<Classification> {
    Band::from_label(label).map(|band| Classification { band })
}

/// Tempo after observing `label`: set on entering a band, latched otherwise.
pub fn next_tempo(current: Tempo, label: Label) -> Tempo {
    classify(label).map_or(current, |c| c.tempo())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn alert_table() {
        let cases = [
            (Label::Red, "CRITICAL FORCE DETECTED", 400),
            (Label::Yellow5, "HIGH FORCE DETECTED", 300),
            (Label::Yellow4, "MEDIUM FORCE DETECTED", 200),
            (Label::Yellow3, "WARNING: Force Increasing", 150),
        ];
        for (label, message, bpm) in cases {
            let c = classify(label).unwrap();
            assert_eq!(c.alert_message(), message);
            assert_eq!(c.tempo(), Tempo(bpm));
        }
        assert_eq!(classify(Label::None), None);
    }

    fn any_label() -> impl Strategy<Value = Label> {
        prop_oneof![
            Just(Label::None),
            Just(Label::Yellow3),
            Just(Label::Yellow4),
            Just(Label::Yellow5),
            Just(Label::Red),
        ]
    }

    proptest! {
        #[test]
        fn tempo_is_set_on_band_entry_and_latched_on_none(
            start in 1u32..1000,
            labels in prop::collection::vec(any_label(), 0..32),
        ) {
            let mut tempo = Tempo(start);
            let mut last_band_tempo = None;
            for label in labels {
                tempo = next_tempo(tempo, label);
                if let Some(c) = classify(label) {
                    last_band_tempo = Some(c.tempo());
                    prop_assert_eq!(tempo, c.tempo());
                }
            }
            prop_assert_eq!(tempo, last_band_tempo.unwrap_or(Tempo(start)));
        }
    }
}
