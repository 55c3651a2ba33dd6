//! GKVK soil card client: backend resolution, API client, screen logic and narration.
//! With the `app` feature the library is wrapped in a Tauri shell for the webview UI.

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod models;
pub mod network;
pub mod screens;
pub mod speech;


pub use api::{ApiClient, ImageUpload};
pub use config::ClientConfig;
pub use error::{Alert, ApiError};
pub use network::{HostCache, HostResolver, Platform};

#[cfg(feature = "app")]
mod app {
    use crate::api::{ApiClient, ImageUpload};
    use crate::config::{self, ClientConfig};
    use crate::error::{Alert, ApiError};
    use crate::models::{Crop, Recommendation, UploadResponse};
    use crate::network::HostResolver;
    use crate::screens::{self, AnalysisView, ConnectionStatus, CropChoices, RecommendationDetails};
    use crate::speech::{self, Narrator, SpeakRequest, SpeechState, SpeechToggle};
    use std::sync::Mutex;
    use tauri::{AppHandle, Emitter, Manager};

    struct AppState {
        client: ApiClient,
        resolver: HostResolver,
        speech: Mutex<SpeechToggle>,
    }

    /// Speech runs in the webview; the shell only tells it what to say.
    struct WebviewNarrator(AppHandle);

    impl Narrator for WebviewNarrator {
        fn speak(&mut self, text: &str, language: &str) {
            if let Err(e) = self.0.emit(speech::SPEAK_EVENT, SpeakRequest { text, language }) {
                log::warn!("Could not emit {}: {}", speech::SPEAK_EVENT, e);
            }
        }

        fn stop(&mut self) {
            let _ = self.0.emit(speech::STOP_EVENT, ());
        }
    }

    fn toggle_speech(
        app: AppHandle,
        state: &AppState,
        text: impl FnOnce() -> String,
    ) -> Result<SpeechState, String> {
        let mut toggle = state.speech.lock().map_err(|e| e.to_string())?;
        Ok(toggle.toggle(&mut WebviewNarrator(app), text))
    }

    #[tauri::command]
    fn get_base_url(state: tauri::State<'_, AppState>) -> String {
        state.client.base_url()
    }

    #[tauri::command]
    fn get_manual_api_url() -> Option<String> {
        config::get_manual_api_url()
    }

    #[tauri::command]
    fn set_manual_api_url(url: Option<String>) -> Result<(), String> {
        config::set_manual_api_url(url).map_err(|e| e.to_string())
    }

    #[tauri::command]
    async fn check_connection(state: tauri::State<'_, AppState>) -> Result<ConnectionStatus, ApiError> {
        Ok(screens::connection_status(&state.client).await)
    }

    #[tauri::command]
    async fn list_crops(state: tauri::State<'_, AppState>) -> Result<CropChoices, ApiError> {
        Ok(screens::load_crops(&state.client).await)
    }

    #[tauri::command]
    async fn analyze_card(
        app: AppHandle,
        state: tauri::State<'_, AppState>,
        image_uri: String,
    ) -> Result<AnalysisView, Alert> {
        let image = ImageUpload::open(&image_uri).await.map_err(|e| e.analysis_alert())?;
        screens::analyze_card(&state.client, image, &mut WebviewNarrator(app)).await
    }

    #[tauri::command]
    async fn upload_image(state: tauri::State<'_, AppState>, image_uri: String) -> Result<UploadResponse, ApiError> {
        let image = ImageUpload::open(&image_uri).await?;
        state.client.upload_image(image).await
    }

    #[tauri::command]
    async fn analyze_uploaded(state: tauri::State<'_, AppState>, image_id: String) -> Result<AnalysisView, Alert> {
        state
            .client
            .analyze_image(&image_id)
            .await
            .map(AnalysisView::from)
            .map_err(|e| e.analysis_alert())
    }

    #[tauri::command]
    async fn get_recommendations(
        state: tauri::State<'_, AppState>,
        crop_id: String,
        image_id: Option<String>,
    ) -> Result<Vec<Recommendation>, ApiError> {
        Ok(screens::load_recommendations(&state.client, &crop_id, image_id.as_deref()).await)
    }

    #[tauri::command]
    fn recommendation_details(recommendation: Recommendation) -> Option<RecommendationDetails> {
        screens::recommendation_details(&recommendation)
    }

    #[tauri::command]
    fn narrate_welcome(app: AppHandle) {
        screens::welcome(&mut WebviewNarrator(app));
    }

    #[tauri::command]
    fn narrate_crop(app: AppHandle, crop: Crop) -> String {
        screens::select_crop(&crop, &mut WebviewNarrator(app))
    }

    #[tauri::command]
    fn toggle_recommendation_speech(
        app: AppHandle,
        state: tauri::State<'_, AppState>,
        recommendation: Recommendation,
    ) -> Result<SpeechState, String> {
        toggle_speech(app, &state, || speech::recommendation_narration(&recommendation))
    }

    #[tauri::command]
    fn toggle_all_speech(
        app: AppHandle,
        state: tauri::State<'_, AppState>,
        recommendations: Vec<Recommendation>,
    ) -> Result<SpeechState, String> {
        toggle_speech(app, &state, || speech::all_recommendations_narration(&recommendations))
    }

    /// The webview reports that an utterance ended on its own.
    #[tauri::command]
    fn speech_finished(state: tauri::State<'_, AppState>) {
        if let Ok(mut toggle) = state.speech.lock() {
            toggle.finished();
        }
    }

    #[tauri::command]
    fn is_speaking(state: tauri::State<'_, AppState>) -> bool {
        state.speech.lock().map(|t| t.is_speaking()).unwrap_or(false)
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        let resolver = HostResolver::new(ClientConfig::from_env());
        let client = match ApiClient::from_resolver(&resolver) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("GKVK soil: could not create HTTP client: {}", e);
                std::process::exit(1);
            }
        };
        tauri::Builder::default()
            .setup(|app| {
                let state = app.state::<AppState>();
                let client = state.client.clone();
                let resolver = state.resolver.clone();
                tauri::async_runtime::spawn(async move {
                    client.refresh_base_url(&resolver).await;
                });
                Ok(())
            })
            .manage(AppState { client, resolver, speech: Mutex::new(SpeechToggle::default()) })
            .invoke_handler(tauri::generate_handler![
                get_base_url,
                get_manual_api_url,
                set_manual_api_url,
                check_connection,
                list_crops,
                analyze_card,
                upload_image,
                analyze_uploaded,
                get_recommendations,
                recommendation_details,
                narrate_welcome,
                narrate_crop,
                toggle_recommendation_speech,
                toggle_all_speech,
                speech_finished,
                is_speaking,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "app")]
pub use app::run;
