//! Resolve the backend base URL: override, dev host, loopback check, cached value, fallback.

use crate::config::ClientConfig;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const REACHABILITY_TIMEOUT: Duration = Duration::from_millis(500);

/// Where the app runs, as far as reaching a dev backend is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Browser or desktop webview on the dev machine; loopback reaches the backend.
    Web,
    /// Phone or tablet; loopback is the device itself.
    Device,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Device
        } else {
            Platform::Web
        }
    }
}

/// Last resolved base URL, shared between the resolver and the clients built from it.
/// Writes are last-write-wins; every writer stores an equally valid URL.
#[derive(Clone, Default)]
pub struct HostCache(Arc<RwLock<Option<String>>>);

impl HostCache {
    pub fn get(&self) -> Option<String> {
        self.0.read().ok().and_then(|g| g.clone())
    }

    pub fn set(&self, url: String) {
        let _ = self.0.write().map(|mut g| *g = Some(url));
    }
}

/// Host part of a dev-server address, or `None` when it is unusable from a device.
/// IPv6 literals come back without brackets.
fn dev_host_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let host = if raw.contains("://") {
        reqwest::Url::parse(raw).ok()?.host_str()?.to_string()
    } else if let Some(rest) = raw.strip_prefix('[') {
        rest.split(']').next().unwrap_or_default().to_string()
    } else if raw.matches(':').count() == 1 {
        raw.split(':').next().unwrap_or_default().to_string()
    } else {
        raw.to_string()
    };
    let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
    if host.is_empty() || matches!(host.as_str(), "localhost" | "127.0.0.1" | "::1") {
        return None;
    }
    Some(host)
}

async fn is_reachable(url: &str) -> bool {
    let client = match reqwest::Client::builder().timeout(REACHABILITY_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            log::debug!("Reachability client unavailable: {}", e);
            return false;
        }
    };
    match client.get(url).send().await {
        Ok(r) => r.status().is_success(),
        Err(e) => {
            log::debug!("Reachability check of {} failed: {}", url, e);
            false
        }
    }
}

#[derive(Clone)]
pub struct HostResolver {
    config: ClientConfig,
    cache: HostCache,
}

impl HostResolver {
    pub fn new(config: ClientConfig) -> Self {
        HostResolver { config, cache: HostCache::default() }
    }

    pub fn with_cache(config: ClientConfig, cache: HostCache) -> Self {
        HostResolver { config, cache }
    }

    pub fn cache(&self) -> &HostCache {
        &self.cache
    }

    fn url_for(&self, host: &str) -> String {
        if host.contains(':') {
            format!("http://[{}]:{}", host, self.config.api_port)
        } else {
            format!("http://{}:{}", host, self.config.api_port)
        }
    }

    /// Answer immediately from the override, the cache or the fallback. Never touches the network.
    pub fn resolve_host_sync(&self) -> String {
        if let Some(url) = self.config.override_url() {
            return url;
        }
        if let Some(cached) = self.cache.get() {
            return cached;
        }
        self.config.fallback_url.clone()
    }

    /// Full resolution. The loopback check runs only while nothing is cached,
    /// so it happens at most once per process. Never fails.
    pub async fn resolve_host(&self) -> String {
        if let Some(url) = self.config.override_url() {
            log::info!("Using backend URL from configuration: {}", url);
            return url;
        }

        if self.config.dev_build && self.config.platform == Platform::Device {
            if let Some(host) = self.config.dev_host.as_deref().and_then(dev_host_name) {
                let url = self.url_for(&host);
                log::info!("Using dev server host: {}", url);
                self.cache.set(url.clone());
                return url;
            }
        }

        let cached = self.cache.get();

        if cached.is_none() && self.config.dev_build && self.config.platform == Platform::Web {
            let url = self.url_for(&self.config.loopback_host);
            if is_reachable(&format!("{}/", url)).await {
                log::info!("Using loopback backend: {}", url);
                self.cache.set(url.clone());
                return url;
            }
        }

        if let Some(url) = cached {
            return url;
        }

        let url = self.config.fallback_url.clone();
        log::info!("Using fallback backend URL: {}", url);
        self.cache.set(url.clone());
        url
    }
}
