//! Screen view-models: what each screen shows for a given backend outcome.
//! Fetch errors come back as `Result`; the fallback decision is made here.

use crate::api::{ApiClient, ImageUpload};
use crate::error::Alert;
use crate::fallback;
use crate::models::{AnalysisResult, Crop, NutrientLevel, NutrientStatus, Recommendation};
use crate::speech::{self, Narrator};
use serde::Serialize;

/// Shown for a nutrient the card had no reading for.
pub const MISSING_READING: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Offline,
}

/// Home screen greeting.
pub fn welcome<N: Narrator>(narrator: &mut N) {
    narrator.speak(speech::WELCOME, speech::KANNADA);
}

pub async fn connection_status(client: &ApiClient) -> ConnectionStatus {
    if client.check_health().await {
        ConnectionStatus::Connected
    } else {
        ConnectionStatus::Offline
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CropChoices {
    pub crops: Vec<Crop>,
    /// Built-in list, the backend was unreachable or had nothing.
    pub offline: bool,
}

pub async fn load_crops(client: &ApiClient) -> CropChoices {
    match client.list_crops().await {
        Ok(crops) if !crops.is_empty() => CropChoices { crops, offline: false },
        Ok(_) => {
            log::warn!("Backend returned no crops, using built-in list");
            CropChoices { crops: fallback::crops(), offline: true }
        }
        Err(e) => {
            log::error!("Failed to load crops: {}", e);
            CropChoices { crops: fallback::crops(), offline: true }
        }
    }
}

/// Crop tapped on the selection grid: its Kannada name is read out.
pub fn select_crop<N: Narrator>(crop: &Crop, narrator: &mut N) -> String {
    narrator.speak(speech::crop_narration(crop), speech::KANNADA);
    crop.id.clone()
}

pub async fn load_recommendations(
    client: &ApiClient,
    crop_id: &str,
    image_id: Option<&str>,
) -> Vec<Recommendation> {
    match client.get_recommendations(crop_id, image_id).await {
        Ok(r) if !r.recommendations.is_empty() => r.recommendations,
        Ok(_) => fallback::recommendations(),
        Err(e) => {
            log::error!("Failed to load recommendations: {}", e);
            fallback::recommendations()
        }
    }
}

/// Reading as shown on the results card: raw range text, then number, then a dash.
pub fn nutrient_reading(n: &NutrientStatus) -> String {
    if let Some(raw) = n.raw_value.as_deref().filter(|r| !r.is_empty()) {
        return format!("{} {}", raw, n.unit).trim_end().to_string();
    }
    match n.value {
        Some(v) => format!("{} {}", v, n.unit).trim_end().to_string(),
        None => MISSING_READING.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRow {
    pub name: String,
    pub localized_name: String,
    pub reading: String,
    pub status: NutrientLevel,
    pub localized_status: String,
    pub color: String,
}

impl From<&NutrientStatus> for NutrientRow {
    fn from(n: &NutrientStatus) -> Self {
        NutrientRow {
            name: n.nutrient.clone(),
            localized_name: n.localized_nutrient.clone(),
            reading: nutrient_reading(n),
            status: n.status,
            localized_status: n.localized_status.clone(),
            color: n.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub image_id: String,
    pub rows: Vec<NutrientRow>,
    pub message: String,
    pub localized_message: String,
}

impl From<AnalysisResult> for AnalysisView {
    fn from(result: AnalysisResult) -> Self {
        AnalysisView {
            rows: result.nutrient_status.iter().map(NutrientRow::from).collect(),
            image_id: result.image_id,
            message: result.message,
            localized_message: result.localized_message,
        }
    }
}

/// Upload screen's "Analyze" action. Success is announced; on failure the alert
/// carries whatever the user can act on.
pub async fn analyze_card<N: Narrator>(
    client: &ApiClient,
    image: ImageUpload,
    narrator: &mut N,
) -> Result<AnalysisView, Alert> {
    match client.analyze_image_direct(image).await {
        Ok(result) => {
            narrator.speak(speech::ANALYSIS_COMPLETE, speech::KANNADA);
            Ok(AnalysisView::from(result))
        }
        Err(e) => {
            log::error!("Upload/Analysis error: {}", e);
            Err(e.analysis_alert())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub value: String,
    pub localized_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationDetails {
    pub fertilizer: Option<DetailRow>,
    pub dosage: Option<DetailRow>,
}

fn detail_row(value: &Option<String>, localized: &Option<String>) -> Option<DetailRow> {
    let value = value.as_deref().filter(|v| !v.is_empty())?;
    Some(DetailRow {
        value: value.to_string(),
        localized_value: localized.clone().unwrap_or_else(|| value.to_string()),
    })
}

/// Fertilizer/dosage panel; `None` when there is nothing to put in it.
pub fn recommendation_details(rec: &Recommendation) -> Option<RecommendationDetails> {
    let fertilizer = detail_row(&rec.fertilizer, &rec.localized_fertilizer);
    let dosage = detail_row(&rec.dosage, &rec.localized_dosage);
    if fertilizer.is_none() && dosage.is_none() {
        return None;
    }
    Some(RecommendationDetails { fertilizer, dosage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::Recorder;

    #[test]
    fn welcome_is_spoken_in_kannada() {
        let mut narrator = Recorder::default();
        welcome(&mut narrator);
        assert_eq!(narrator.spoken, vec![(speech::WELCOME.to_string(), "kn-IN".to_string())]);
    }

    #[test]
    fn selecting_a_crop_reads_its_name() {
        let mut narrator = Recorder::default();
        let crops = fallback::crops();
        assert_eq!(select_crop(&crops[2], &mut narrator), "maize");
        assert_eq!(narrator.spoken, vec![("ಮೆಕ್ಕೆಜೋಳ".to_string(), "kn-IN".to_string())]);
    }

    fn nutrient(value: Option<f64>, raw: Option<&str>, unit: &str) -> NutrientStatus {
        NutrientStatus {
            nutrient: "Nitrogen".into(),
            localized_nutrient: "ಸಾರಜನಕ".into(),
            value,
            raw_value: raw.map(str::to_string),
            unit: unit.into(),
            status: NutrientLevel::Medium,
            localized_status: "ಮಧ್ಯಮ".into(),
            color: "#FFC107".into(),
        }
    }

    #[test]
    fn reading_prefers_raw_then_value_then_dash() {
        assert_eq!(nutrient_reading(&nutrient(Some(5.2), Some("5.0-5.5"), "")), "5.0-5.5");
        assert_eq!(nutrient_reading(&nutrient(Some(280.5), None, "kg/ha")), "280.5 kg/ha");
        assert_eq!(nutrient_reading(&nutrient(None, None, "kg/ha")), MISSING_READING);
        assert_eq!(nutrient_reading(&nutrient(None, Some(""), "ppm")), MISSING_READING);
    }

    fn rec(fertilizer: Option<&str>, dosage: Option<&str>) -> Recommendation {
        Recommendation {
            title: "t".into(),
            localized_title: "tk".into(),
            description: "d".into(),
            localized_description: "dk".into(),
            fertilizer: fertilizer.map(str::to_string),
            localized_fertilizer: fertilizer.map(|f| format!("{}-kn", f)),
            dosage: dosage.map(str::to_string),
            localized_dosage: None,
        }
    }

    #[test]
    fn details_omitted_without_fertilizer_or_dosage() {
        assert_eq!(recommendation_details(&rec(None, None)), None);
    }

    #[test]
    fn details_with_only_dosage_show_only_dosage() {
        let details = recommendation_details(&rec(None, Some("25 kg/acre"))).unwrap();
        assert!(details.fertilizer.is_none());
        assert_eq!(
            details.dosage,
            Some(DetailRow { value: "25 kg/acre".into(), localized_value: "25 kg/acre".into() })
        );
    }

    #[test]
    fn fertilizer_row_uses_localized_name() {
        let details = recommendation_details(&rec(Some("DAP"), None)).unwrap();
        assert_eq!(details.fertilizer.unwrap().localized_value, "DAP-kn");
        assert!(details.dosage.is_none());
    }

    #[test]
    fn analysis_view_maps_each_nutrient() {
        let result = AnalysisResult {
            success: true,
            image_id: "img-1".into(),
            extracted_text: String::new(),
            soil_data: Default::default(),
            nutrient_status: vec![nutrient(None, Some("6.5-7.0"), ""), nutrient(None, None, "ppm")],
            message: "ok".into(),
            localized_message: "ಸರಿ".into(),
        };
        let view = AnalysisView::from(result);
        assert_eq!(view.image_id, "img-1");
        let readings: Vec<&str> = view.rows.iter().map(|r| r.reading.as_str()).collect();
        assert_eq!(readings, ["6.5-7.0", "—"]);
    }
}
