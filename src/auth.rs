//! Cookie-session login state and the per-route role guards.
//!
//! The session only ever holds `rol` and, for clients, `cliente`. Guards
//! decode it once per request and insert a typed identity into the request
//! extensions, so handlers take `web::ReqData<ClientIdentity>` and friends
//! instead of reading the session themselves.

use actix_session::{
    config::CookieContentSecurity, storage::CookieSessionStore, Session, SessionExt,
    SessionMiddleware,
};
use actix_web::{
    body::{BoxBody, MessageBody},
    cookie::{Key, SameSite},
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    Error, HttpMessage, HttpResponse,
};

use crate::{
    error::AppError,
    models::{ROLE_BARBER, ROLE_CLIENT},
};

pub const SESSION_COOKIE: &str = "barberia_session";
const ROLE_KEY: &str = "rol";
const CLIENT_KEY: &str = "cliente";
const LOGIN_PATH: &str = "/";

/// Whoever holds a valid session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    Client(String),
    Barber,
}

impl Viewer {
    pub fn home(&self) -> &'static str {
        match self {
            Viewer::Client(_) => "/cliente",
            Viewer::Barber => "/barbero",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

#[derive(Clone, Copy, Debug)]
pub struct BarberIdentity;

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .cookie_http_only(true)
        .cookie_secure(secure)
        .build()
}

pub fn viewer_from_session(session: &Session) -> Option<Viewer> {
    let role = match session.get::<String>(ROLE_KEY) {
        Ok(role) => role?,
        Err(err) => {
            log::warn!("Unreadable session role: {err}");
            return None;
        }
    };

    match role.as_str() {
        ROLE_BARBER => Some(Viewer::Barber),
        ROLE_CLIENT => session
            .get::<String>(CLIENT_KEY)
            .ok()
            .flatten()
            .filter(|name| !name.trim().is_empty())
            .map(Viewer::Client),
        _ => None,
    }
}

/// Replaces whatever the session held with `viewer`.
pub fn sign_in(session: &Session, viewer: &Viewer) -> Result<(), AppError> {
    session.clear();
    session.renew();
    let stored = match viewer {
        Viewer::Barber => session.insert(ROLE_KEY, ROLE_BARBER),
        Viewer::Client(name) => session
            .insert(ROLE_KEY, ROLE_CLIENT)
            .and_then(|()| session.insert(CLIENT_KEY, name)),
    };
    stored.map_err(|err| AppError::Session(err.to_string()))
}

pub fn sign_out(session: &Session) {
    session.purge();
}

pub async fn require_client<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    admit(req, next, |viewer| match viewer {
        Viewer::Client(name) => Some(ClientIdentity(name)),
        Viewer::Barber => None,
    })
    .await
}

pub async fn require_barber<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    admit(req, next, |viewer| match viewer {
        Viewer::Barber => Some(BarberIdentity),
        Viewer::Client(_) => None,
    })
    .await
}

pub async fn require_viewer<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
{
    admit(req, next, Some).await
}

async fn admit<B, T, F>(
    req: ServiceRequest,
    next: Next<B>,
    pick: F,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: MessageBody + 'static,
    T: 'static,
    F: FnOnce(Viewer) -> Option<T>,
{
    let identity = viewer_from_session(&req.get_session()).and_then(pick);
    let Some(identity) = identity else {
        log::debug!("Redirecting {} to login", req.path());
        return Ok(req.into_response(redirect_to_login()));
    };

    req.extensions_mut().insert(identity);
    let res = next.call(req).await?;
    Ok(res.map_into_boxed_body())
}

fn redirect_to_login() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}
