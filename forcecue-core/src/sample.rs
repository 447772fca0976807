use serde::{Deserialize, Serialize};

/// Severity tag attached to a recorded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Label {
    #[default]
    None,
    Yellow3,
    Yellow4,
    Yellow5,
    Red,
}

impl Label {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "yellow3" => Label::Yellow3,
            "yellow4" => Label::Yellow4,
            "yellow5" => Label::Yellow5,
            "red" => Label::Red,
            _ => Label::None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Label::None => None,
            Label::Yellow3 => Some("yellow3"),
            Label::Yellow4 => Some("yellow4"),
            Label::Yellow5 => Some("yellow5"),
            Label::Red => Some("red"),
        }
    }
}

impl From<Option<String>> for Label {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map_or(Label::None, Label::parse)
    }
}

impl From<Label> for Option<String> {
    fn from(label: Label) -> Self {
        label.as_str().map(str::to_string)
    }
}

/// One recorded force reading. Field names follow the trial JSON files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSample {
    #[serde(rename = "Time")]
    pub time: f64, // seconds from trial start
    #[serde(rename = "Force")]
    pub force: f64, // newtons
    #[serde(default)]
    pub label: Label,
}

impl TrialSample {
    pub fn new(time: f64, force: f64, label: Label) -> Self {
        Self { time, force, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trial_record() {
        let raw = r#"{ "Time": 1.25, "Force": 0.071, "label": "yellow5" }"#;
        let sample: TrialSample = serde_json::from_str(raw).unwrap();
        assert_eq!(sample, TrialSample::new(1.25, 0.071, Label::Yellow5));
    }

    #[test]
    fn missing_null_and_unknown_labels_are_none() {
        let missing: TrialSample = serde_json::from_str(r#"{ "Time": 0, "Force": 0 }"#).unwrap();
        let null: TrialSample =
            serde_json::from_str(r#"{ "Time": 0, "Force": 0, "label": null }"#).unwrap();
        let empty: TrialSample =
            serde_json::from_str(r#"{ "Time": 0, "Force": 0, "label": "" }"#).unwrap();
        let other: TrialSample =
            serde_json::from_str(r#"{ "Time": 0, "Force": 0, "label": "green" }"#).unwrap();

        for sample in [missing, null, empty, other] {
            assert_eq!(sample.label, Label::None);
        }
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(Label::parse("Red"), Label::None);
        assert_eq!(Label::parse("red"), Label::Red);
    }
}
