//! Client-side navigation surface

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "id", rename_all = "snake_case")]
pub enum Route {
    /// Upload area above the gallery
    Home,
    Documents,
    DocumentDetail(String),
    NotFound,
}

impl Route {
    /// Parse a location path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["documents"] => Route::Documents,
            ["documents", id] => Route::DocumentDetail((*id).to_string()),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Documents => "/documents".to_string(),
            Route::DocumentDetail(id) => format!("/documents/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/documents"), Route::Documents);
        assert_eq!(Route::parse("/documents/"), Route::Documents);
        assert_eq!(
            Route::parse("/documents/42"),
            Route::DocumentDetail("42".to_string())
        );
        assert_eq!(
            Route::parse("/documents/42?tab=results#top"),
            Route::DocumentDetail("42".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_is_not_found() {
        assert_eq!(Route::parse("/settings"), Route::NotFound);
        assert_eq!(Route::parse("/documents/42/extra"), Route::NotFound);
    }

    #[test]
    fn test_path_round_trip() {
        for route in [
            Route::Home,
            Route::Documents,
            Route::DocumentDetail("abc".to_string()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_serializes_for_js() {
        let value = serde_json::to_value(Route::DocumentDetail("7".to_string())).unwrap();
        assert_eq!(value, serde_json::json!({"screen": "document_detail", "id": "7"}));
    }
}
