use actix_web::{middleware::from_fn, web, HttpResponse};

use crate::{
    auth::{require_viewer, Viewer},
    db,
    error::AppError,
    state::AppState,
    templates::see_other,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/eliminar/{id}")
            .wrap(from_fn(require_viewer))
            .route(web::get().to(delete_appointment)),
    );
}

/// Clients can only remove their own appointments; anything else is a
/// silent no-op. The barber removes unconditionally.
async fn delete_appointment(
    state: web::Data<AppState>,
    viewer: web::ReqData<Viewer>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let viewer = viewer.into_inner();

    let deleted = match &viewer {
        Viewer::Client(cliente) => db::delete_client_appointment(&state.db, id, cliente).await?,
        Viewer::Barber => db::delete_appointment(&state.db, id).await?,
    };
    if deleted == 0 {
        log::warn!("Delete of appointment {id} matched nothing for {viewer:?}");
    } else {
        log::info!("Appointment {id} deleted by {viewer:?}");
    }

    Ok(see_other(viewer.home()))
}
