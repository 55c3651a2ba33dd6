//! HTTP client for the soil analysis backend.

use crate::error::ApiError;
use crate::models::{
    AnalysisRequest, AnalysisResult, Crop, CropListResponse, HealthResponse, RecommendationResponse,
    UploadResponse,
};
use crate::network::HostResolver;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
/// OCR on the server can take well over a minute on a cold start.
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_IMAGE_NAME: &str = "image.jpg";

/// Image picked from the camera or gallery, ready for a multipart upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Name and type come from the last path segment of the URI. Only a lowercase
    /// `.png` is sent as PNG; everything else goes as JPEG.
    pub fn from_uri(uri: &str, bytes: Vec<u8>) -> Self {
        let file_name = uri
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_IMAGE_NAME)
            .to_string();
        let mime = if file_name.ends_with(".png") { "image/png" } else { "image/jpeg" };
        ImageUpload { file_name, mime, bytes }
    }

    /// Read a local image given as a plain path or a `file://` URI.
    pub async fn open(uri: &str) -> Result<Self, ApiError> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Setup(format!("could not read image {}: {}", path, e)))?;
        Ok(Self::from_uri(uri, bytes))
    }

    fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        let part = reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime)?;
        Ok(reqwest::multipart::Form::new().part("file", part))
    }
}

/// Shared backend client. Clones share the connection pool and the base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<RwLock<String>>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;
        log::info!("[API] Initial API URL: {}", base_url);
        Ok(ApiClient { http, base_url: Arc::new(RwLock::new(base_url)) })
    }

    /// Client pointed at whatever the resolver can answer without probing.
    pub fn from_resolver(resolver: &HostResolver) -> Result<Self, ApiError> {
        Self::new(resolver.resolve_host_sync())
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Point subsequent calls at `url`. Requests already in flight keep their URL.
    pub fn set_base_url(&self, url: String) {
        let _ = self.base_url.write().map(|mut g| *g = url);
    }

    /// Run full resolution and switch to the result.
    pub async fn refresh_base_url(&self, resolver: &HostResolver) -> String {
        let url = resolver.resolve_host().await;
        if url != self.base_url() {
            log::info!("[API] Switching API URL to {}", url);
            self.set_base_url(url.clone());
        }
        url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().to_string();
        log::debug!("[API][Request] {} {} timeout={:?}", method, url, request.timeout());

        let response = match self.http.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                let err = ApiError::from(e);
                match &err {
                    ApiError::Setup(msg) => log::error!("[API][Response][SetupError] {}: {}", url, msg),
                    _ => log::error!("[API][Response][NoResponse] {}: {}", url, err),
                }
                return Err(err);
            }
        };

        let status = response.status();
        log::debug!("[API][Response] {} {}", url, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[API][Response][Error] {} {} {}", url, status, body.trim());
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            log::error!("[API][Response][Decode] {}: {}", url, e);
            ApiError::Decode(e.to_string())
        })
    }

    /// True iff the backend reports itself healthy. Failures of any kind read as `false`.
    pub async fn check_health(&self) -> bool {
        let request = self.http.get(self.url("/")).timeout(HEALTH_TIMEOUT);
        match self.send::<HealthResponse>(request).await {
            Ok(health) => health.is_healthy(),
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    pub async fn list_crops(&self) -> Result<Vec<Crop>, ApiError> {
        let response: CropListResponse = self.send(self.http.get(self.url("/crops"))).await?;
        Ok(response.crops)
    }

    /// Store an image on the server for a later [`ApiClient::analyze_image`].
    pub async fn upload_image(&self, image: ImageUpload) -> Result<UploadResponse, ApiError> {
        log::debug!("[API] upload_image {} ({})", image.file_name, image.mime);
        let form = image.into_form()?;
        self.send(self.http.post(self.url("/upload")).multipart(form)).await
    }

    pub async fn analyze_image(&self, image_id: &str) -> Result<AnalysisResult, ApiError> {
        let request = self
            .http
            .post(self.url("/analyze"))
            .json(&AnalysisRequest { image_id })
            .timeout(ANALYSIS_TIMEOUT);
        self.send(request).await
    }

    /// Upload and analyze in one request; nothing is kept on the server.
    pub async fn analyze_image_direct(&self, image: ImageUpload) -> Result<AnalysisResult, ApiError> {
        log::debug!("[API] analyze_image_direct {} ({})", image.file_name, image.mime);
        let form = image.into_form()?;
        let request = self
            .http
            .post(self.url("/analyze-direct"))
            .multipart(form)
            .timeout(ANALYSIS_TIMEOUT);
        self.send(request).await
    }

    /// Recommendations for a crop, personalised when the analysed image id is given.
    pub async fn get_recommendations(
        &self,
        crop_id: &str,
        image_id: Option<&str>,
    ) -> Result<RecommendationResponse, ApiError> {
        let mut url = self.url(&format!("/recommendation/{}", urlencoding::encode(crop_id)));
        if let Some(id) = image_id.filter(|id| !id.is_empty()) {
            url = format!("{}?image_id={}", url, urlencoding::encode(id));
        }
        self.send(self.http.get(&url)).await
    }
}
