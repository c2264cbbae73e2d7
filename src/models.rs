use std::fmt;

pub const ROLE_CLIENT: &str = "cliente";
pub const ROLE_BARBER: &str = "barbero";

pub const BARBER_USERNAME: &str = "barbero";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [Self::Pending, Self::Accepted, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Accepted => "Aceptada",
            Self::Rejected => "Rechazada",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub cliente: String,
    pub fecha: String,
    pub hora: String,
    pub precio: i64,
    pub estado: String,
}

impl AppointmentRow {
    pub fn is_accepted(&self) -> bool {
        self.estado == AppointmentStatus::Accepted.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub cliente: String,
    pub fecha: String,
    pub hora: String,
    pub precio: i64,
    pub estado: AppointmentStatus,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceRow {
    pub id: i64,
    pub servicio: String,
    pub valor: i64,
}

/// Sum of `precio` over appointments whose status is exactly `Aceptada`.
pub fn accepted_total(rows: &[AppointmentRow]) -> i64 {
    rows.iter()
        .filter(|row| row.is_accepted())
        .map(|row| row.precio)
        .sum()
}
