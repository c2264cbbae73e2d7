pub mod appointments;
pub mod barber;
pub mod client;
pub mod public;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    public::configure(cfg);
    client::configure(cfg);
    barber::configure(cfg);
    appointments::configure(cfg);
}
