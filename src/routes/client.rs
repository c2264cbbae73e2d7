use actix_web::{middleware::from_fn, web, HttpResponse};
use askama::Template;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    auth::{require_client, ClientIdentity},
    db,
    error::AppError,
    filters::{self, pretty_date, pretty_time},
    models::{AppointmentRow, AppointmentStatus, NewAppointment, PriceRow},
    state::AppState,
    templates::{render, see_other},
};

#[derive(Clone, Debug)]
struct AppointmentView {
    id: i64,
    fecha: String,
    hora: String,
    precio: i64,
    estado: String,
}

#[derive(Template)]
#[template(path = "cliente.html")]
struct ClientHomeTemplate {
    cliente: String,
    citas: Vec<AppointmentView>,
}

#[derive(Template)]
#[template(path = "agendar.html")]
struct BookingTemplate {
    servicios: Vec<PriceRow>,
}

#[derive(Deserialize)]
struct BookingForm {
    fecha: String,
    hora: String,
    precio: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/cliente")
            .wrap(from_fn(require_client))
            .route(web::get().to(home)),
    )
    .service(
        web::resource("/agendar")
            .wrap(from_fn(require_client))
            .route(web::get().to(show_booking))
            .route(web::post().to(create_booking)),
    );
}

async fn home(
    state: web::Data<AppState>,
    client: web::ReqData<ClientIdentity>,
) -> Result<HttpResponse, AppError> {
    let ClientIdentity(cliente) = client.into_inner();
    let rows = db::list_client_appointments(&state.db, &cliente).await?;
    let citas = rows
        .into_iter()
        .map(to_view)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(render(ClientHomeTemplate { cliente, citas }))
}

async fn show_booking(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let servicios = db::list_prices(&state.db).await?;
    Ok(render(BookingTemplate { servicios }))
}

async fn create_booking(
    state: web::Data<AppState>,
    client: web::ReqData<ClientIdentity>,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let ClientIdentity(cliente) = client.into_inner();

    let fecha = NaiveDate::parse_from_str(form.fecha.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("Fecha inválida: {}", form.fecha)))?;
    let hora = NaiveTime::parse_from_str(form.hora.trim(), "%H:%M")
        .map_err(|_| AppError::bad_request(format!("Hora inválida: {}", form.hora)))?;
    if form.precio < 0 {
        return Err(AppError::bad_request(format!("Precio negativo: {}", form.precio)));
    }

    let appointment = NewAppointment {
        cliente,
        fecha: fecha.format("%Y-%m-%d").to_string(),
        hora: hora.format("%H:%M").to_string(),
        precio: form.precio,
        estado: AppointmentStatus::Pending,
    };
    let id = db::insert_appointment(&state.db, &appointment).await?;
    log::info!(
        "Client {} booked appointment {id} for {} {} at {}",
        appointment.cliente,
        appointment.fecha,
        appointment.hora,
        appointment.precio
    );

    Ok(see_other("/cliente"))
}

fn to_view(row: AppointmentRow) -> Result<AppointmentView, AppError> {
    Ok(AppointmentView {
        id: row.id,
        fecha: pretty_date(&row.fecha)?,
        hora: pretty_time(&row.hora),
        precio: row.precio,
        estado: row.estado,
    })
}
