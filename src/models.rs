//! Wire shapes exchanged with the soil analysis backend.
//! Localized (Kannada) fields travel as `*_kn` on the wire.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: String,
    pub name: String,
    #[serde(rename = "name_kn")]
    pub localized_name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropListResponse {
    pub crops: Vec<Crop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "message_kn")]
    pub localized_message: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub image_id: String,
    pub message: String,
    #[serde(default, rename = "message_kn")]
    pub localized_message: String,
}

#[derive(Serialize)]
pub(crate) struct AnalysisRequest<'a> {
    pub image_id: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
    Sufficient,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientStatus {
    pub nutrient: String,
    #[serde(rename = "nutrient_kn")]
    pub localized_nutrient: String,
    #[serde(default)]
    pub value: Option<f64>,
    /// Range readings such as "5.0-5.5" that do not fit a single number.
    #[serde(default, rename = "value_raw")]
    pub raw_value: Option<String>,
    #[serde(default)]
    pub unit: String,
    pub status: NutrientLevel,
    #[serde(default, rename = "status_kn")]
    pub localized_status: String,
    pub color: String,
}

/// Values read off the card. `None` means the field was absent or unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilData {
    pub ph: Option<f64>,
    pub ec: Option<f64>,
    pub organic_carbon: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub sulphur: Option<f64>,
    pub zinc: Option<f64>,
    pub boron: Option<f64>,
    pub iron: Option<f64>,
    pub manganese: Option<f64>,
    pub copper: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub image_id: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub soil_data: SoilData,
    #[serde(default)]
    pub nutrient_status: Vec<NutrientStatus>,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "message_kn")]
    pub localized_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(rename = "title_kn")]
    pub localized_title: String,
    pub description: String,
    #[serde(rename = "description_kn")]
    pub localized_description: String,
    #[serde(default)]
    pub fertilizer: Option<String>,
    #[serde(default, rename = "fertilizer_kn")]
    pub localized_fertilizer: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default, rename = "dosage_kn")]
    pub localized_dosage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub success: bool,
    pub crop_id: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}
