//! Kannada narration: what gets spoken, and the single speaking/idle toggle.

use crate::models::{Crop, Recommendation};
use serde::Serialize;

pub const KANNADA: &str = "kn-IN";

pub const WELCOME: &str = "ಜಿಕೆವಿಕೆ ಮಣ್ಣು ವಿಶ್ಲೇಷಣೆ ಆಪ್‌ಗೆ ಸುಸ್ವಾಗತ. ಮಣ್ಣಿನ ಆರೋಗ್ಯ ಕಾರ್ಡ್ ಸ್ಕ್ಯಾನ್ ಮಾಡಲು ಪ್ರಾರಂಭಿಸಿ ಒತ್ತಿರಿ.";
pub const ANALYSIS_COMPLETE: &str = "ವಿಶ್ಲೇಷಣೆ ಪೂರ್ಣಗೊಂಡಿದೆ";

/// Event the webview answers by speaking [`SpeakRequest`].
pub const SPEAK_EVENT: &str = "speak";
/// Event the webview answers by cancelling speech.
pub const STOP_EVENT: &str = "speech-stop";

/// Payload of [`SPEAK_EVENT`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakRequest<'a> {
    pub text: &'a str,
    pub language: &'a str,
}

/// Text-to-speech engine provided by the platform.
pub trait Narrator {
    fn speak(&mut self, text: &str, language: &str);
    fn stop(&mut self);
}

pub fn crop_narration(crop: &Crop) -> &str {
    &crop.localized_name
}

pub fn recommendation_narration(rec: &Recommendation) -> String {
    let fertilizer = rec
        .localized_fertilizer
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|f| format!("ಗೊಬ್ಬರ: {}.", f))
        .unwrap_or_default();
    let dosage = rec
        .localized_dosage
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|d| format!("ಪ್ರಮಾಣ: {}", d))
        .unwrap_or_default();
    format!(
        "{}. {}. {} {}",
        rec.localized_title, rec.localized_description, fertilizer, dosage
    )
}

pub fn all_recommendations_narration(recs: &[Recommendation]) -> String {
    recs.iter()
        .enumerate()
        .map(|(i, rec)| {
            format!("ಶಿಫಾರಸು {}: {}. {}", i + 1, rec.localized_title, rec.localized_description)
        })
        .collect::<Vec<_>>()
        .join(". ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
}

/// One flag for the whole screen: tapping while speaking stops, tapping while idle starts.
#[derive(Debug, Default)]
pub struct SpeechToggle {
    state: SpeechState,
}

impl SpeechToggle {
    pub fn is_speaking(&self) -> bool {
        self.state == SpeechState::Speaking
    }

    pub fn toggle<N: Narrator>(&mut self, narrator: &mut N, text: impl FnOnce() -> String) -> SpeechState {
        match self.state {
            SpeechState::Speaking => {
                narrator.stop();
                self.state = SpeechState::Idle;
            }
            SpeechState::Idle => {
                narrator.speak(&text(), KANNADA);
                self.state = SpeechState::Speaking;
            }
        }
        self.state
    }

    /// Narrator finished or was stopped elsewhere.
    pub fn finished(&mut self) {
        self.state = SpeechState::Idle;
    }
}

/// Narrator that remembers what it was asked to do.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct Recorder {
    pub spoken: Vec<(String, String)>,
    pub stops: usize,
}

#[cfg(test)]
impl Narrator for Recorder {
    fn speak(&mut self, text: &str, language: &str) {
        self.spoken.push((text.to_string(), language.to_string()));
    }
    fn stop(&mut self) {
        self.stops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speak_request_serializes_text_and_language() {
        let req = SpeakRequest { text: ANALYSIS_COMPLETE, language: KANNADA };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "text": ANALYSIS_COMPLETE, "language": "kn-IN" })
        );
        assert_eq!(serde_json::to_value(SpeechState::Speaking).unwrap(), "speaking");
    }

    #[test]
    fn crop_narration_is_kannada_name() {
        let crop = Crop {
            id: "ragi".into(),
            name: "Finger Millet".into(),
            localized_name: "ರಾಗಿ".into(),
            icon: "🌾".into(),
        };
        assert_eq!(crop_narration(&crop), "ರಾಗಿ");
    }

    fn rec(fertilizer_kn: Option<&str>, dosage_kn: Option<&str>) -> Recommendation {
        Recommendation {
            title: "Nitrogen".into(),
            localized_title: "ಸಾರಜನಕ".into(),
            description: "Apply urea".into(),
            localized_description: "ಯೂರಿಯಾ ಹಾಕಿ".into(),
            fertilizer: fertilizer_kn.map(|_| "Urea".to_string()),
            localized_fertilizer: fertilizer_kn.map(str::to_string),
            dosage: dosage_kn.map(|_| "50 kg/acre".to_string()),
            localized_dosage: dosage_kn.map(str::to_string),
        }
    }

    #[test]
    fn narration_includes_optional_parts_only_when_present() {
        assert_eq!(
            recommendation_narration(&rec(Some("ಯೂರಿಯಾ"), Some("50 ಕೆಜಿ"))),
            "ಸಾರಜನಕ. ಯೂರಿಯಾ ಹಾಕಿ. ಗೊಬ್ಬರ: ಯೂರಿಯಾ. ಪ್ರಮಾಣ: 50 ಕೆಜಿ"
        );
        assert_eq!(recommendation_narration(&rec(None, None)), "ಸಾರಜನಕ. ಯೂರಿಯಾ ಹಾಕಿ.  ");
    }

    #[test]
    fn all_recommendations_are_numbered() {
        let text = all_recommendations_narration(&[rec(None, None), rec(None, None)]);
        assert_eq!(
            text,
            "ಶಿಫಾರಸು 1: ಸಾರಜನಕ. ಯೂರಿಯಾ ಹಾಕಿ. ಶಿಫಾರಸು 2: ಸಾರಜನಕ. ಯೂರಿಯಾ ಹಾಕಿ"
        );
    }

    #[test]
    fn toggle_starts_then_stops() {
        let mut narrator = Recorder::default();
        let mut toggle = SpeechToggle::default();

        assert_eq!(toggle.toggle(&mut narrator, || "ನಮಸ್ಕಾರ".into()), SpeechState::Speaking);
        assert_eq!(narrator.spoken, vec![("ನಮಸ್ಕಾರ".to_string(), KANNADA.to_string())]);

        assert_eq!(toggle.toggle(&mut narrator, || unreachable!()), SpeechState::Idle);
        assert_eq!(narrator.stops, 1);
        assert_eq!(narrator.spoken.len(), 1);
    }

    #[test]
    fn completion_resets_to_idle() {
        let mut narrator = Recorder::default();
        let mut toggle = SpeechToggle::default();
        toggle.toggle(&mut narrator, || "a".into());
        toggle.finished();
        assert!(!toggle.is_speaking());

        toggle.toggle(&mut narrator, || "b".into());
        assert_eq!(narrator.spoken.len(), 2);
        assert_eq!(narrator.stops, 0);
    }
}
