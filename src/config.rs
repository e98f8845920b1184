use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::api::ApiError;

/// Application-level constants
pub const APP_NAME: &str = "medcheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path prefix of the per-medication detail page.
pub const DETAIL_PATH: &str = "medication-search";

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_HIDDEN_FIELD: &str = "meds";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medcheck_lib=info,medcheck=info,warn"
}

/// Runtime configuration for one widget instance.
///
/// The two boolean flags cover what used to be separate script variants:
/// a generic/brand-name tooltip and a link from each selected tag to the
/// medication detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub base_url: String,
    /// Upper bound on every backend request; keeps "Loading..." from
    /// lingering forever.
    pub request_timeout: Duration,
    pub show_name_tooltip: bool,
    pub link_to_detail: bool,
    /// Name of the hidden form field carrying the selected ids.
    pub hidden_field_name: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            show_name_tooltip: true,
            link_to_detail: true,
            hidden_field_name: DEFAULT_HIDDEN_FIELD.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from `MEDCHECK_*` environment variables,
    /// falling back to defaults for anything missing or malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("MEDCHECK_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    tracing::info!("MEDCHECK_BASE_URL not set, using default: {DEFAULT_BASE_URL}");
                    defaults.base_url.clone()
                }),
            request_timeout: Duration::from_secs(timeout_secs(try_load(
                "MEDCHECK_REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            ))),
            show_name_tooltip: try_load("MEDCHECK_SHOW_NAME_TOOLTIP", defaults.show_name_tooltip),
            link_to_detail: try_load("MEDCHECK_LINK_TO_DETAIL", defaults.link_to_detail),
            hidden_field_name: defaults.hidden_field_name,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Absolute URL of the detail page for a medication name.
    ///
    /// The name is encoded as a single path segment, so names containing
    /// `/`, spaces or `?` still address the right page.
    pub fn detail_url(&self, name: &str) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(DETAIL_PATH)
            .push(name);
        Ok(url.to_string())
    }
}

/// A zero timeout would fail every request immediately.
fn timeout_secs(secs: u64) -> u64 {
    if secs == 0 {
        tracing::warn!(
            "Invalid MEDCHECK_REQUEST_TIMEOUT_SECS value 0, using default: {DEFAULT_TIMEOUT_SECS}"
        );
        DEFAULT_TIMEOUT_SECS
    } else {
        secs
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_loading_state() {
        let config = WidgetConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.hidden_field_name, "meds");
        assert!(config.show_name_tooltip);
        assert!(config.link_to_detail);
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let config = WidgetConfig::default().with_base_url("http://example.test/");
        assert_eq!(config.base_url, "http://example.test");
    }

    #[test]
    fn detail_url_encodes_name_as_one_segment() {
        let config = WidgetConfig::default().with_base_url("http://example.test");
        let url = config.detail_url("Aspirin 81/mg tab").unwrap();
        assert_eq!(
            url,
            "http://example.test/medication-search/Aspirin%2081%2Fmg%20tab"
        );
    }

    #[test]
    fn detail_url_keeps_base_path() {
        let config = WidgetConfig::default().with_base_url("http://example.test/app/");
        let url = config.detail_url("Ibuprofen").unwrap();
        assert_eq!(url, "http://example.test/app/medication-search/Ibuprofen");
    }

    #[test]
    fn detail_url_rejects_bad_base() {
        let config = WidgetConfig::default().with_base_url("not a url");
        assert!(matches!(
            config.detail_url("Ibuprofen"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn try_load_falls_back_on_garbage() {
        env::set_var("MEDCHECK_TEST_GARBAGE_FLAG", "maybe");
        assert!(try_load("MEDCHECK_TEST_GARBAGE_FLAG", true));
        env::set_var("MEDCHECK_TEST_GOOD_SECS", " 12 ");
        assert_eq!(try_load("MEDCHECK_TEST_GOOD_SECS", 5u64), 12);
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        assert_eq!(timeout_secs(0), DEFAULT_TIMEOUT_SECS);
        assert_eq!(timeout_secs(12), 12);

        env::set_var("MEDCHECK_REQUEST_TIMEOUT_SECS", "0");
        let config = WidgetConfig::from_env();
        env::remove_var("MEDCHECK_REQUEST_TIMEOUT_SECS");
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
        assert_eq!(APP_NAME, "medcheck");
    }
}
