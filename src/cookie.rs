use percent_encoding::percent_decode_str;
use std::fmt;
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Looks up `name` in a `Cookie`-style string (`a=1; b=2`).
///
/// Each segment is split at its first `=`; the value is percent-decoded.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|segment| {
        let (key, value) = segment.trim().split_once('=')?;
        (key == name).then(|| percent_decode_str(value).decode_utf8_lossy().into_owned())
    })
}

/// Anti-forgery token attached to every state-changing request.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Fresh random token for a client that has none yet.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn from_cookies(cookies: &str) -> Option<Self> {
        get_cookie(cookies, CSRF_COOKIE)
            .filter(|value| !value.is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}
