use actix_web::{middleware::from_fn, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::{
    auth::{require_barber, BarberIdentity},
    db,
    error::AppError,
    filters::{self, pretty_date, pretty_time},
    models::{accepted_total, AppointmentRow, AppointmentStatus, PriceRow},
    state::AppState,
    templates::{render, see_other},
};

#[derive(Clone, Debug)]
struct AppointmentView {
    id: i64,
    cliente: String,
    fecha: String,
    hora: String,
    precio: i64,
    estado: String,
    transiciones: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "barbero.html")]
struct DashboardTemplate {
    citas: Vec<AppointmentView>,
    precios: Vec<PriceRow>,
    total: i64,
}

#[derive(Template)]
#[template(path = "precios.html")]
struct PricesTemplate {
    precios: Vec<PriceRow>,
}

#[derive(Deserialize)]
struct PriceForm {
    valor: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/barbero")
            .wrap(from_fn(require_barber))
            .route(web::get().to(dashboard)),
    )
    .service(
        web::resource("/precios")
            .wrap(from_fn(require_barber))
            .route(web::get().to(show_prices))
            .route(web::post().to(update_prices)),
    )
    .service(
        web::resource("/estado/{id}/{estado}")
            .wrap(from_fn(require_barber))
            .route(web::get().to(set_status)),
    )
    .service(
        web::resource("/editar_precio/{id}")
            .wrap(from_fn(require_barber))
            .route(web::post().to(edit_price)),
    );
}

async fn dashboard(
    state: web::Data<AppState>,
    _barber: web::ReqData<BarberIdentity>,
) -> Result<HttpResponse, AppError> {
    let rows = db::list_appointments(&state.db).await?;
    let precios = db::list_prices(&state.db).await?;
    let total = accepted_total(&rows);
    let citas = rows
        .into_iter()
        .map(to_view)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render(DashboardTemplate {
        citas,
        precios,
        total,
    }))
}

async fn show_prices(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let precios = db::list_prices(&state.db).await?;
    Ok(render(PricesTemplate { precios }))
}

/// Each submitted field is `servicio=valor`. The whole submission is
/// validated before anything is written.
async fn update_prices(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let updates = parse_price_fields(form.into_inner())?;
    let updated = db::update_prices_by_service(&state.db, &updates).await?;
    log::info!(
        "Barber updated prices: {} submitted, {updated} matched",
        updates.len()
    );
    Ok(see_other("/barbero"))
}

async fn set_status(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, estado) = path.into_inner();
    let updated = db::update_appointment_status(&state.db, id, &estado).await?;
    if updated == 0 {
        log::warn!("Status change for missing appointment {id}");
    } else {
        log::info!("Appointment {id} set to {estado}");
    }
    Ok(see_other("/barbero"))
}

async fn edit_price(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<PriceForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let valor = form.into_inner().valor;
    if valor < 0 {
        return Err(AppError::bad_request(format!("Precio negativo: {valor}")));
    }

    db::update_price(&state.db, id, valor).await?;
    log::info!("Price {id} set to {valor}");
    Ok(see_other("/barbero"))
}

fn parse_price_fields(fields: Vec<(String, String)>) -> Result<Vec<(String, i64)>, AppError> {
    fields
        .into_iter()
        .map(|(servicio, raw)| {
            let valor = raw.trim().parse::<i64>().map_err(|_| {
                AppError::bad_request(format!("Precio inválido para {servicio}: {raw}"))
            })?;
            if valor < 0 {
                return Err(AppError::bad_request(format!(
                    "Precio negativo para {servicio}: {valor}"
                )));
            }
            Ok((servicio, valor))
        })
        .collect()
}

fn to_view(row: AppointmentRow) -> Result<AppointmentView, AppError> {
    let transiciones = AppointmentStatus::ALL
        .into_iter()
        .map(AppointmentStatus::as_str)
        .filter(|status| *status != row.estado)
        .collect();
    Ok(AppointmentView {
        id: row.id,
        cliente: row.cliente,
        fecha: pretty_date(&row.fecha)?,
        hora: pretty_time(&row.hora),
        precio: row.precio,
        estado: row.estado,
        transiciones,
    })
}
