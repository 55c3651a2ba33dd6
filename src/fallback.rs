//! Built-in data shown when the backend cannot supply its own.

use crate::models::{Crop, Recommendation};

const CROPS: [(&str, &str, &str, &str); 6] = [
    ("rice", "Rice", "ಭತ್ತ", "🌾"),
    ("ragi", "Finger Millet", "ರಾಗಿ", "🌾"),
    ("maize", "Maize", "ಮೆಕ್ಕೆಜೋಳ", "🌽"),
    ("tomato", "Tomato", "ಟೊಮೆಟೊ", "🍅"),
    ("onion", "Onion", "ಈರುಳ್ಳಿ", "🧅"),
    ("groundnut", "Groundnut", "ಕಡಲೆಕಾಯಿ", "🥜"),
];

pub fn crops() -> Vec<Crop> {
    CROPS
        .iter()
        .map(|(id, name, name_kn, icon)| Crop {
            id: id.to_string(),
            name: name.to_string(),
            localized_name: name_kn.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

pub fn recommendations() -> Vec<Recommendation> {
    vec![Recommendation {
        title: "Soil Testing".to_string(),
        localized_title: "ಮಣ್ಣು ಪರೀಕ್ಷೆ".to_string(),
        description: "Get your soil tested every 2-3 years for accurate fertilizer recommendations"
            .to_string(),
        localized_description:
            "ನಿಖರವಾದ ಗೊಬ್ಬರ ಶಿಫಾರಸುಗಳಿಗಾಗಿ ಪ್ರತಿ 2-3 ವರ್ಷಗಳಿಗೊಮ್ಮೆ ನಿಮ್ಮ ಮಣ್ಣನ್ನು ಪರೀಕ್ಷಿಸಿ"
                .to_string(),
        fertilizer: None,
        localized_fertilizer: None,
        dosage: None,
        localized_dosage: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_catalog_order_is_fixed() {
        let ids: Vec<String> = crops().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["rice", "ragi", "maize", "tomato", "onion", "groundnut"]);
    }

    #[test]
    fn fallback_recommendation_is_advisory() {
        let recs = recommendations();
        assert_eq!(recs.len(), 1);
        assert!(recs[0].fertilizer.is_none() && recs[0].dosage.is_none());
    }
}
