use actix_session::Session;
use actix_web::{web, HttpResponse, Result};
use askama::Template;
use serde::Deserialize;

use crate::{
    auth::{sign_in, sign_out, viewer_from_session, Viewer},
    models::BARBER_USERNAME,
    state::AppState,
    templates::{render, see_other},
};

pub const WRONG_PASSWORD: &str = "Contraseña incorrecta";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    current_home: Option<&'static str>,
}

#[derive(Deserialize)]
struct LoginForm {
    usuario: String,
    password: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(show_login))
            .route(web::post().to(login)),
    )
    .service(web::resource("/logout").route(web::get().to(logout)))
    .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn show_login(session: Session) -> HttpResponse {
    let current_home = viewer_from_session(&session).map(|viewer| viewer.home());
    render(LoginTemplate { current_home })
}

async fn login(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    session.clear();

    if form.usuario.trim().is_empty() {
        return Ok(see_other("/"));
    }

    let viewer = if form.usuario == BARBER_USERNAME {
        if form.password.as_deref() != Some(state.barber_password.as_str()) {
            log::warn!("Rejected barber login with a wrong password");
            return Ok(HttpResponse::Unauthorized()
                .content_type("text/plain; charset=utf-8")
                .body(WRONG_PASSWORD));
        }
        Viewer::Barber
    } else {
        Viewer::Client(form.usuario)
    };

    sign_in(&session, &viewer)?;
    match &viewer {
        Viewer::Barber => log::info!("Barber logged in"),
        Viewer::Client(name) => log::info!("Client {name} logged in"),
    }
    Ok(see_other(viewer.home()))
}

async fn logout(session: Session) -> HttpResponse {
    sign_out(&session);
    see_other("/")
}
