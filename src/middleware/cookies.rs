use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::config::AuthSettings;
use crate::duration::parse_duration;
use crate::types::CredentialBundle;

/// Create a credential cookie whose max-age is the parsed lifetime.
///
/// An unparseable lifetime gives max-age 0, so the browser drops it at once.
pub(super) fn credential_cookie(
    name: &str,
    value: &str,
    lifetime: &str,
    secure: bool,
) -> Cookie<'static> {
    let seconds = i64::try_from(parse_duration(lifetime)).unwrap_or(0);
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::seconds(seconds))
        .build()
}

/// Create removal cookie for a credential, with the attributes it replaces.
pub(super) fn clear_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Write both credentials of `bundle` into the jar.
pub(super) fn store_bundle(
    jar: CookieJar,
    settings: &AuthSettings,
    bundle: &CredentialBundle,
) -> CookieJar {
    let access = credential_cookie(
        &settings.access_cookie_name,
        &bundle.access_token,
        &bundle.expires_in,
        settings.secure_cookies,
    );
    let refresh = credential_cookie(
        &settings.refresh_cookie_name,
        &bundle.refresh_token,
        &bundle.refresh_expires_in,
        settings.secure_cookies,
    );
    jar.add(access).add(refresh)
}

/// Remove both credentials from the jar.
pub(super) fn clear_session(jar: CookieJar, settings: &AuthSettings) -> CookieJar {
    jar.add(clear_cookie(&settings.access_cookie_name, settings.secure_cookies))
        .add(clear_cookie(&settings.refresh_cookie_name, settings.secure_cookies))
}

/// Non-empty cookie value by name.
pub(super) fn get_credential(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
