use axum::http::{request::Parts, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

const DEV_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:4173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:4173",
];

const PREVIEW_HOST_SUFFIXES: [&str; 2] = [".vercel.app", ".netlify.app"];

/// Credentialed CORS for the local dev servers, hosted previews and the
/// configured frontend. A frontend of `*` lets every origin through.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let policy = OriginPolicy::new(frontend_url);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request: &Parts| {
                origin.to_str().is_ok_and(|origin| policy.allows(origin))
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[derive(Debug, Clone)]
struct OriginPolicy {
    allow_any: bool,
    exact: Vec<String>,
}

impl OriginPolicy {
    fn new(frontend_url: &str) -> Self {
        let frontend_url = frontend_url.trim().trim_end_matches('/');
        let mut exact = DEV_ORIGINS.iter().map(|origin| origin.to_string()).collect::<Vec<_>>();
        if !frontend_url.is_empty() && frontend_url != "*" {
            exact.push(frontend_url.to_string());
        }

        Self {
            allow_any: frontend_url == "*",
            exact,
        }
    }

    fn allows(&self, origin: &str) -> bool {
        if self.allow_any || self.exact.iter().any(|allowed| allowed == origin) {
            return true;
        }

        origin.strip_prefix("https://").is_some_and(|host| {
            PREVIEW_HOST_SUFFIXES
                .iter()
                .any(|suffix| host.len() > suffix.len() && host.ends_with(suffix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::OriginPolicy;

    #[test]
    fn wildcard_frontend_allows_everything() {
        assert!(OriginPolicy::new("*").allows("https://example.org"));
    }

    #[test]
    fn explicit_frontend_is_added_to_dev_origins() {
        let policy = OriginPolicy::new("https://legal.example.in/");

        assert!(policy.allows("https://legal.example.in"));
        assert!(policy.allows("http://localhost:5173"));
        assert!(!policy.allows("https://evil.example.com"));
    }

    #[test]
    fn preview_hosts_require_https_and_a_subdomain() {
        let policy = OriginPolicy::new("");

        assert!(policy.allows("https://branch-42.vercel.app"));
        assert!(policy.allows("https://site.netlify.app"));
        assert!(!policy.allows("http://branch-42.vercel.app"));
        assert!(!policy.allows("https://.vercel.app"));
        assert!(!policy.allows("https://vercel.app.evil.com"));
    }
}
