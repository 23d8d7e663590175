use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SESSION_TTL_SECS;
use crate::error::{AppError, AppResult};
use crate::security::SigningKey;
use crate::tprintln;

pub const SESSION_COOKIE: &str = "nlpdesk_session";

/// Client-held session state. Travels in a signed cookie; there is no
/// server-side session table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    /// Unix seconds at login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issued_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flashes: Vec<String>,
}

impl Session {
    pub fn start(&mut self, email: &str) {
        self.user = Some(email.to_string());
        self.issued_at = Some(chrono::Utc::now().timestamp());
    }

    pub fn current(&self) -> Option<&str> { self.user.as_deref() }

    pub fn end(&mut self) {
        self.user = None;
        self.issued_at = None;
    }

    pub fn is_authenticated(&self) -> bool { self.user.is_some() }

    pub fn flash(&mut self, message: impl Into<String>) { self.flashes.push(message.into()); }

    pub fn take_flashes(&mut self) -> Vec<String> { std::mem::take(&mut self.flashes) }

    pub fn is_empty(&self) -> bool { self.user.is_none() && self.flashes.is_empty() }
}

/// Loads and stores [`Session`] values as signed cookies.
#[derive(Debug, Clone)]
pub struct SessionManager {
    key: SigningKey,
    /// `None` disables expiry
    pub ttl: Option<Duration>,
    pub secure: bool,
}

impl SessionManager {
    pub fn new(key: SigningKey) -> Self {
        Self { key, ttl: Some(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)), secure: false }
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self { self.ttl = ttl; self }

    pub fn with_secure(mut self, secure: bool) -> Self { self.secure = secure; self }

    /// Read the session from request headers. Anything missing, forged or
    /// stale comes back as an anonymous session.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        let Some(raw) = parse_cookie(headers, SESSION_COOKIE) else { return Session::default(); };
        let Some(bytes) = self.key.verify(&raw) else {
            tracing::debug!(target: "session", "rejected session cookie with bad signature");
            return Session::default();
        };
        let Ok(mut session) = serde_json::from_slice::<Session>(&bytes) else { return Session::default(); };
        if self.expired(&session, chrono::Utc::now().timestamp()) {
            tprintln!("session.expired user={:?}", session.user);
            session.end();
        }
        session
    }

    fn expired(&self, session: &Session, now: i64) -> bool {
        match (self.ttl, session.user.as_ref(), session.issued_at) {
            (None, _, _) | (_, None, _) => false,
            (Some(ttl), Some(_), Some(iat)) => {
                let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                now.saturating_sub(iat) > ttl
            }
            // logged-in payload without a timestamp was not issued by `start`
            (Some(_), Some(_), None) => true,
        }
    }

    /// Build the `Set-Cookie` value for the session. Empty sessions clear the cookie.
    pub fn set_cookie(&self, session: &Session) -> AppResult<HeaderValue> {
        let secure = if self.secure { "; Secure" } else { "" };
        let raw = if session.is_empty() {
            format!("{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax; Path=/{}", SESSION_COOKIE, secure)
        } else {
            let json = serde_json::to_vec(session).map_err(|e| AppError::internal("session_encode", e.to_string()))?;
            let signed = self.key.sign(&json)?;
            tprintln!("session.store user={:?} flashes={}", session.user, session.flashes.len());
            format!("{}={}; HttpOnly; SameSite=Lax; Path=/{}", SESSION_COOKIE, signed, secure)
        };
        HeaderValue::from_str(&raw).map_err(|e| AppError::internal("session_cookie", e.to_string()))
    }
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(axum::http::header::COOKIE) {
        let Ok(s) = cookie.to_str() else { continue; };
        for part in s.split(';') {
            let p = part.trim();
            if let Some((k, v)) = p.split_once('=') {
                if k == name { return Some(v.to_string()); }
            }
        }
    }
    None
}
