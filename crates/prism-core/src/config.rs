//! Client configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The browser app passes its config as a JS object; tests build it directly.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Top-level configuration for the Prism client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://127.0.0.1:5000`. Empty means same-origin.
    pub base_url: String,
    /// Path prefix of every endpoint (default: `/api`)
    pub api_prefix: String,
    /// Maximum characters of serialized results attached to a chat turn (default: 8000)
    pub context_budget: usize,
    /// Zoom limits for the PDF viewer
    pub viewer: ViewerLimits,
    /// Characters of an arXiv abstract shown on a card (default: 200)
    pub abstract_preview: usize,
    /// Log filter for the browser console subscriber (default: `info`)
    pub log_level: String,
}

/// Zoom bounds and step for the PDF viewer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub initial_zoom: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_prefix: default_api_prefix(),
            context_budget: 8000,
            viewer: ViewerLimits::default(),
            abstract_preview: 200,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ViewerLimits {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.2,
            initial_zoom: 1.0,
        }
    }
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

impl ClientConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json(s: &str) -> Result<Self, ClientError> {
        let config: ClientConfig = serde_json::from_str(s)
            .map_err(|e| ClientError::Validation(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.viewer.validate()?;
        if self.context_budget == 0 {
            return Err(ClientError::Validation(
                "context_budget must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of an endpoint below the API prefix.
    ///
    /// `endpoint("/documents")` with base `http://h:5000/` gives
    /// `http://h:5000/api/documents`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');

        if prefix.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, prefix, path)
        }
    }
}

impl ViewerLimits {
    pub fn validate(&self) -> Result<(), ClientError> {
        let fields = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
            ("initial_zoom", self.initial_zoom),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ClientError::Validation(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ClientError::Validation(format!(
                "Invalid zoom range: {} - {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(ClientError::Validation(
                "zoom_step must be positive".to_string(),
            ));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ClientError::Validation(format!(
                "initial_zoom {} outside {} - {}",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.context_budget, 8000);
        assert_eq!(config.viewer.min_zoom, 0.5);
        assert_eq!(config.viewer.max_zoom, 3.0);
    }

    #[test]
    fn test_partial_viewer_override() {
        let config = ClientConfig::from_json(r#"{"viewer": {"max_zoom": 2.0}}"#).unwrap();
        assert_eq!(config.viewer.max_zoom, 2.0);
        assert_eq!(config.viewer.min_zoom, 0.5);
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let result = ClientConfig::from_json(r#"{"viewer": {"min_zoom": 2.0, "max_zoom": 1.0}}"#);
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_rejects_initial_zoom_out_of_range() {
        let result = ClientConfig::from_json(r#"{"viewer": {"initial_zoom": 5.0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_finite_limits() {
        let nan_initial = ViewerLimits {
            initial_zoom: f64::NAN,
            ..ViewerLimits::default()
        };
        let nan_step = ViewerLimits {
            zoom_step: f64::NAN,
            ..ViewerLimits::default()
        };
        let infinite_max = ViewerLimits {
            max_zoom: f64::INFINITY,
            ..ViewerLimits::default()
        };
        for limits in [nan_initial, nan_step, infinite_max] {
            assert!(matches!(limits.validate(), Err(ClientError::Validation(_))));
        }
        assert!(ViewerLimits::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(ClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_endpoint_same_origin() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint("/upload"), "/api/upload");
        assert_eq!(config.endpoint("documents/42"), "/api/documents/42");
    }

    #[test]
    fn test_endpoint_with_host() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:5000/");
        assert_eq!(
            config.endpoint("/documents"),
            "http://127.0.0.1:5000/api/documents"
        );
    }

    #[test]
    fn test_endpoint_without_prefix() {
        let config = ClientConfig {
            api_prefix: String::new(),
            ..ClientConfig::default()
        }
        .with_base_url("http://h");
        assert_eq!(config.endpoint("/chat"), "http://h/chat");
    }
}
