use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::infrastructure::config::SessionConfig;

/// リクエストの Cookie からセッション ID を取り出す。
pub fn session_id(jar: &CookieJar, config: &SessionConfig) -> Option<String> {
    jar.get(&config.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty())
}

pub fn session_cookie(config: &SessionConfig, id: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

/// 削除用の Cookie。path を発行時と揃える必要がある。
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone()).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie() {
        let config = SessionConfig::default();
        let jar = CookieJar::new().add(Cookie::new("support_session", "abc"));
        assert_eq!(session_id(&jar, &config).as_deref(), Some("abc"));

        let jar = CookieJar::new().add(Cookie::new("other", "abc"));
        assert!(session_id(&jar, &config).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig {
            cookie_name: "sid".to_string(),
            cookie_secure: true,
        };
        let cookie = session_cookie(&config, "abc".to_string());
        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
    }
}
