use actix_web::{http::header, HttpResponse};
use askama::Template;

/// Renders a page. Every page depends on the session, so none are cached.
pub fn render<T: Template>(template: T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .body(body),
        Err(err) => {
            log::error!("Template render error for {}: {err}", std::any::type_name::<T>());
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Post/redirect/get answer used after every state change.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}
