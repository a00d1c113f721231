//! CORS allow-list: exact origins plus `scheme://*.domain` wildcard patterns.

use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone, PartialEq)]
pub enum OriginPattern {
    Exact(String),
    /// Any non-empty subdomain of `suffix` (which starts with a dot).
    Subdomain { scheme: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Self {
        if let Some((scheme, rest)) = raw.split_once("://") {
            if let Some(domain) = rest.strip_prefix("*.") {
                return OriginPattern::Subdomain {
                    scheme: format!("{scheme}://"),
                    suffix: format!(".{domain}"),
                };
            }
        }
        OriginPattern::Exact(raw.to_string())
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Exact(allowed) => allowed == origin,
            OriginPattern::Subdomain { scheme, suffix } => origin
                .strip_prefix(scheme.as_str())
                .and_then(|host| host.strip_suffix(suffix.as_str()))
                .is_some_and(|sub| {
                    !sub.is_empty()
                        && sub
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
                }),
        }
    }
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let patterns: Vec<OriginPattern> = allowed_origins
        .iter()
        .map(|o| OriginPattern::parse(o))
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| patterns.iter().any(|p| p.matches(o)))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_origin() {
        let p = OriginPattern::parse("http://localhost:5173");
        assert!(p.matches("http://localhost:5173"));
        assert!(!p.matches("http://localhost:5174"));
    }

    #[test]
    fn test_wildcard_matches_subdomains_only() {
        let p = OriginPattern::parse("https://*.lovable.app");
        assert!(p.matches("https://preview-123.lovable.app"));
        assert!(p.matches("https://a.b.lovable.app"));
        assert!(!p.matches("https://lovable.app"));
        assert!(!p.matches("http://preview.lovable.app"));
        assert!(!p.matches("https://evil.com/.lovable.app"));
        assert!(!p.matches("https://lovable.app.evil.com"));
    }

    #[test]
    fn test_parse_wildcard() {
        assert_eq!(
            OriginPattern::parse("https://*.lovableproject.com"),
            OriginPattern::Subdomain {
                scheme: "https://".into(),
                suffix: ".lovableproject.com".into()
            }
        );
    }
}
