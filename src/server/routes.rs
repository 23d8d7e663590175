//! Page handlers.
//!
//! Each handler loads the session from the request cookie, does at most one
//! mutation, and answers with either a rendered page or a redirect. Both carry
//! the re-signed session cookie so flashes set before a redirect show up on
//! the next page.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::identity::{IdentityError, IdentityStore, Session};
use crate::nlp::{self, NlpError, NlpOutcome, NlpRequest, NlpTask};

pub const MSG_REGISTERED: &str = "Registration successful. Please login.";
pub const MSG_RESET_DISABLED: &str = "Password reset feature is disabled for demo.";
pub const MSG_EMAIL_NOT_FOUND: &str = "Email not found.";
pub const MSG_MISSING_FIELDS: &str = "Email and password are required.";

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotForm {
    #[serde(default)]
    pub email: String,
}

/// Every field defaults so an anonymous post is redirected rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardForm {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub entity: Option<String>,
}

/// Dashboard-only template values.
#[derive(Debug, Default, Serialize)]
pub struct DashboardView {
    pub tasks: Vec<&'static str>,
    pub task: String,
    pub text: String,
    pub entity: Option<String>,
    pub result: Option<String>,
}

#[derive(Serialize)]
struct PageContext<'a> {
    user: Option<&'a str>,
    flashes: Vec<String>,
    #[serde(flatten)]
    dashboard: Option<DashboardView>,
}

fn page(state: &AppState, session: &mut Session, template: &str, dashboard: Option<DashboardView>) -> AppResult<Response> {
    let flashes = session.take_flashes();
    let html = state.views.render(template, PageContext { user: session.current(), flashes, dashboard })?;
    let cookie = state.sessions.set_cookie(session)?;
    Ok(([(SET_COOKIE, cookie)], Html(html)).into_response())
}

fn redirect(state: &AppState, session: &Session, to: &str) -> AppResult<Response> {
    let cookie = state.sessions.set_cookie(session)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to(to)).into_response())
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn blocking<T, F>(identity: &IdentityStore, f: F) -> AppResult<T>
where
    F: FnOnce(IdentityStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let identity = identity.clone();
    tokio::task::spawn_blocking(move || f(identity))
        .await
        .map_err(|e| AppError::internal("blocking_join", e.to_string()))
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    page(&state, &mut session, "index.html", None)
}

pub async fn register_form(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    page(&state, &mut session, "register.html", None)
}

pub async fn register(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<RegisterForm>) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    let email = form.email.trim().to_string();
    let name = form.name.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        session.flash(MSG_MISSING_FIELDS);
        return page(&state, &mut session, "register.html", None);
    }
    let password = form.password;
    let who = email.clone();
    match blocking(&state.identity, move |id| id.register(&who, &name, &password)).await? {
        Ok(()) => {
            info!(target: "auth", email = %email, "registered");
            session.flash(MSG_REGISTERED);
            redirect(&state, &session, "/login")
        }
        Err(e @ IdentityError::AlreadyExists) => {
            info!(target: "auth", email = %email, "registration rejected: already registered");
            session.flash(e.to_string());
            page(&state, &mut session, "register.html", None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    page(&state, &mut session, "login.html", None)
}

pub async fn login(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    let email = form.email.trim().to_string();
    let who = email.clone();
    let password = form.password;
    match blocking(&state.identity, move |id| id.verify(&who, &password)).await? {
        Ok(_name) => {
            session.start(&email);
            info!(target: "auth", email = %email, "login");
            redirect(&state, &session, "/dashboard")
        }
        Err(e @ IdentityError::InvalidCredentials) => {
            info!(target: "auth", email = %email, "login rejected");
            session.flash(e.to_string());
            page(&state, &mut session, "login.html", None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn forgot_form(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    page(&state, &mut session, "forgot.html", None)
}

pub async fn forgot(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<ForgotForm>) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    if state.identity.contains(form.email.trim()) {
        session.flash(MSG_RESET_DISABLED);
    } else {
        session.flash(MSG_EMAIL_NOT_FOUND);
    }
    page(&state, &mut session, "forgot.html", None)
}

fn dashboard_view(form: &DashboardForm, result: Option<String>) -> Option<DashboardView> {
    Some(DashboardView {
        tasks: NlpTask::ALL.iter().map(|t| t.as_str()).collect(),
        task: form.task.clone(),
        text: form.text.clone(),
        entity: form.entity.clone(),
        result,
    })
}

pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    if !session.is_authenticated() {
        return redirect(&state, &session, "/login");
    }
    page(&state, &mut session, "dashboard.html", dashboard_view(&DashboardForm::default(), None))
}

async fn analyze_form(state: &AppState, form: &DashboardForm) -> Result<NlpOutcome, NlpError> {
    let request = NlpRequest::from_form(&form.task, &form.text, form.entity.as_deref())?;
    let client = state.nlp.client()?;
    nlp::run(client.as_ref(), &request).await
}

/// The form is extracted as a `Result` so the session check runs before any
/// body rejection can answer the request.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<DashboardForm>, FormRejection>,
) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    let Some(user) = session.current().map(str::to_string) else {
        return redirect(&state, &session, "/login");
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(target: "nlp", user = %user, "dashboard form rejected: {}", rejection.body_text());
            session.flash(format!("Error: {}", rejection.body_text()));
            let form = DashboardForm::default();
            return page(&state, &mut session, "dashboard.html", dashboard_view(&form, None));
        }
    };
    let result = match analyze_form(&state, &form).await {
        Ok(outcome) => Some(outcome.to_string()),
        Err(e) => {
            warn!(target: "nlp", user = %user, task = %form.task, validation = e.is_validation(), "dashboard task failed: {e}");
            session.flash(format!("Error: {e}"));
            None
        }
    };
    page(&state, &mut session, "dashboard.html", dashboard_view(&form, result))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let mut session = state.sessions.load(&headers);
    if let Some(user) = session.current() {
        info!(target: "auth", email = %user, "logout");
    }
    session.end();
    redirect(&state, &session, "/")
}
