use std::{fs, path::Path, str::FromStr};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::models::{AppointmentRow, NewAppointment, PriceRow};

pub async fn connect(db_url: &str) -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let connect_options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    if let Some(dir) = database_dir(&connect_options) {
        fs::create_dir_all(dir)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Directory SQLite needs before it can create the database file. In-memory
/// databases and bare file names have none.
fn database_dir(options: &SqliteConnectOptions) -> Option<&Path> {
    options
        .get_filename()
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

pub async fn list_client_appointments(
    pool: &SqlitePool,
    cliente: &str,
) -> Result<Vec<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, cliente, fecha, hora, precio, estado
           FROM citas
           WHERE cliente = ?
           ORDER BY fecha, hora, id"#,
    )
    .bind(cliente)
    .fetch_all(pool)
    .await
}

pub async fn list_appointments(pool: &SqlitePool) -> Result<Vec<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, cliente, fecha, hora, precio, estado
           FROM citas
           ORDER BY fecha, hora, id"#,
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_appointment(
    pool: &SqlitePool,
    appointment: &NewAppointment,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO citas (cliente, fecha, hora, precio, estado)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&appointment.cliente)
    .bind(&appointment.fecha)
    .bind(&appointment.hora)
    .bind(appointment.precio)
    .bind(appointment.estado.as_str())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Returns the number of rows touched; an unknown id touches none.
/// `estado` is stored exactly as given.
pub async fn update_appointment_status(
    pool: &SqlitePool,
    id: i64,
    estado: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE citas SET estado = ? WHERE id = ?")
        .bind(estado)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_client_appointment(
    pool: &SqlitePool,
    id: i64,
    cliente: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM citas WHERE id = ? AND cliente = ?")
        .bind(id)
        .bind(cliente)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_appointment(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM citas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_prices(pool: &SqlitePool) -> Result<Vec<PriceRow>, sqlx::Error> {
    sqlx::query_as::<_, PriceRow>("SELECT id, servicio, valor FROM precios ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Applies every `(servicio, valor)` pair in one transaction. Names with no
/// matching row are skipped; the return value counts the rows updated.
pub async fn update_prices_by_service(
    pool: &SqlitePool,
    updates: &[(String, i64)],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut updated = 0;
    for (servicio, valor) in updates {
        let result = sqlx::query("UPDATE precios SET valor = ? WHERE servicio = ?")
            .bind(valor)
            .bind(servicio)
            .execute(&mut *tx)
            .await?;
        updated += result.rows_affected();
    }
    tx.commit().await?;
    Ok(updated)
}

pub async fn update_price(pool: &SqlitePool, id: i64, valor: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE precios SET valor = ? WHERE id = ?")
        .bind(valor)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    run_migrations(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;

    fn booking(cliente: &str, fecha: &str, hora: &str) -> NewAppointment {
        NewAppointment {
            cliente: cliente.to_string(),
            fecha: fecha.to_string(),
            hora: hora.to_string(),
            precio: 20000,
            estado: AppointmentStatus::Pending,
        }
    }

    #[actix_web::test]
    async fn seeds_three_prices_once() {
        let pool = test_pool().await;
        run_migrations(&pool).await.unwrap();

        let prices = list_prices(&pool).await.unwrap();
        let names: Vec<_> = prices.iter().map(|p| p.servicio.as_str()).collect();
        assert_eq!(names, ["Corte", "Barba", "Corte + Barba"]);
        let values: Vec<_> = prices.iter().map(|p| p.valor).collect();
        assert_eq!(values, [20000, 15000, 30000]);
    }

    #[actix_web::test]
    async fn client_listing_is_scoped() {
        let pool = test_pool().await;
        insert_appointment(&pool, &booking("ana", "2024-05-10", "14:30")).await.unwrap();
        insert_appointment(&pool, &booking("luis", "2024-05-11", "09:00")).await.unwrap();
        insert_appointment(&pool, &booking("ana", "2024-05-09", "10:00")).await.unwrap();

        let rows = list_client_appointments(&pool, "ana").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.cliente == "ana"));
        assert_eq!(rows[0].fecha, "2024-05-09");
        assert_eq!(list_appointments(&pool).await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn same_slot_can_be_booked_twice() {
        let pool = test_pool().await;
        insert_appointment(&pool, &booking("ana", "2024-05-10", "14:30")).await.unwrap();
        insert_appointment(&pool, &booking("luis", "2024-05-10", "14:30")).await.unwrap();
        assert_eq!(list_appointments(&pool).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn client_delete_requires_ownership() {
        let pool = test_pool().await;
        let id = insert_appointment(&pool, &booking("ana", "2024-05-10", "14:30"))
            .await
            .unwrap();

        assert_eq!(delete_client_appointment(&pool, id, "luis").await.unwrap(), 0);
        assert_eq!(list_appointments(&pool).await.unwrap().len(), 1);
        assert_eq!(delete_client_appointment(&pool, id, "ana").await.unwrap(), 1);
        assert!(list_appointments(&pool).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn status_update_on_missing_row_touches_nothing() {
        let pool = test_pool().await;
        let updated = update_appointment_status(&pool, 99, "Aceptada")
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[actix_web::test]
    async fn bulk_update_skips_unknown_services() {
        let pool = test_pool().await;
        let updates = vec![
            ("Corte".to_string(), 25000),
            ("Barba".to_string(), 18000),
            ("Tinte".to_string(), 40000),
        ];
        assert_eq!(update_prices_by_service(&pool, &updates).await.unwrap(), 2);

        let values: Vec<_> = list_prices(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.servicio, p.valor))
            .collect();
        assert_eq!(
            values,
            [
                ("Corte".to_string(), 25000),
                ("Barba".to_string(), 18000),
                ("Corte + Barba".to_string(), 30000),
            ]
        );
    }

    #[actix_web::test]
    async fn single_price_update_touches_one_row() {
        let pool = test_pool().await;
        assert_eq!(update_price(&pool, 3, 32000).await.unwrap(), 1);
        assert_eq!(update_price(&pool, 42, 1).await.unwrap(), 0);

        let values: Vec<_> = list_prices(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.valor)
            .collect();
        assert_eq!(values, [20000, 15000, 32000]);
    }

    #[actix_web::test]
    async fn status_is_stored_verbatim() {
        let pool = test_pool().await;
        let id = insert_appointment(&pool, &booking("ana", "2024-05-10", "14:30"))
            .await
            .unwrap();

        assert_eq!(update_appointment_status(&pool, id, "Cancelada").await.unwrap(), 1);
        let rows = list_appointments(&pool).await.unwrap();
        assert_eq!(rows[0].estado, "Cancelada");
        assert!(!rows[0].is_accepted());
    }

    fn options(url: &str) -> SqliteConnectOptions {
        SqliteConnectOptions::from_str(url).unwrap()
    }

    #[test]
    fn file_urls_point_at_their_directory() {
        let opts = options("sqlite://./data/barberia.db?mode=rwc");
        assert_eq!(database_dir(&opts), Some(Path::new("./data")));
        assert_eq!(database_dir(&options("sqlite:barberia.db")), None);
    }

    #[test]
    fn memory_urls_need_no_directory() {
        assert_eq!(database_dir(&options("sqlite::memory:")), None);
    }

    #[actix_web::test]
    async fn connect_creates_the_database_directory() {
        let root = std::env::temp_dir().join(format!("barberia-db-{}", std::process::id()));
        let file = root.join("nested").join("barberia.db");
        let _ = fs::remove_dir_all(&root);

        let pool = connect(&format!("sqlite://{}", file.display())).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert_eq!(list_prices(&pool).await.unwrap().len(), 3);
        pool.close().await;

        assert!(file.exists());
        fs::remove_dir_all(&root).unwrap();
    }
}
