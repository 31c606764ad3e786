use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{RepoError, RepoResult, Repository, UserRepository};
use crate::database::Database;
use crate::models::{Editor, Hall, Performance, Reservation, Seat, Show, Theater, User};

/// Postgres-backed repositories. Cascade and restrict rules live in the
/// schema (`src/migrations`); this layer only translates constraint errors.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(db: &Database) -> Self {
        Self { pool: db.pool.clone() }
    }
}

/* ---------- helpers ---------- */

fn kind(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    }
}

/// Constraint outcome of a failed insert or update.
fn write_conflict(kind: &ErrorKind, parent: &'static str, entity: &'static str) -> Option<RepoError> {
    match kind {
        ErrorKind::ForeignKeyViolation => Some(RepoError::MissingParent(parent)),
        ErrorKind::UniqueViolation => Some(RepoError::Duplicate(entity)),
        _ => None,
    }
}

/// Constraint outcome of a failed delete: a restricting child row.
fn delete_conflict(kind: &ErrorKind, entity: &'static str) -> Option<RepoError> {
    match kind {
        ErrorKind::ForeignKeyViolation => Some(RepoError::Restricted(entity)),
        _ => None,
    }
}

fn write_error(err: sqlx::Error, parent: &'static str, entity: &'static str) -> RepoError {
    match kind(&err).and_then(|k| write_conflict(&k, parent, entity)) {
        Some(conflict) => conflict,
        None => RepoError::Database(err),
    }
}

fn delete_error(err: sqlx::Error, entity: &'static str) -> RepoError {
    match kind(&err).and_then(|k| delete_conflict(&k, entity)) {
        Some(conflict) => conflict,
        None => RepoError::Database(err),
    }
}

async fn delete_by_id(pool: &PgPool, sql: &str, id: Uuid, entity: &'static str) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query(sql)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| delete_error(e, entity))?
        .rows_affected();
    tx.commit().await?;
    debug!("deleted {} {} (rows: {})", entity, id, removed);
    Ok(removed > 0)
}

/* ---------- USERS ---------- */

#[async_trait]
impl Repository<User> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, name, surname, phone, password_hash, role, reservation_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.reservation_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "user", "username"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, user: User) -> RepoResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, User>(
            "UPDATE users
             SET username = $2, name = $3, surname = $4, phone = $5,
                 password_hash = $6, role = $7, reservation_count = $8
             WHERE id = $1
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.reservation_count)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "user", "username"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        // reservations go with the user (ON DELETE CASCADE)
        delete_by_id(&self.pool, "DELETE FROM users WHERE id = $1", id, "user").await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

/* ---------- EDITORS ---------- */

#[async_trait]
impl Repository<Editor> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Editor>> {
        let editors = sqlx::query_as::<_, Editor>("SELECT * FROM editors ORDER BY surname, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(editors)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Editor>> {
        let editor = sqlx::query_as::<_, Editor>("SELECT * FROM editors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(editor)
    }

    async fn create(&self, editor: Editor) -> RepoResult<Editor> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Editor>(
            "INSERT INTO editors (name, surname, national_id, username, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&editor.name)
        .bind(&editor.surname)
        .bind(&editor.national_id)
        .bind(&editor.username)
        .bind(&editor.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "editor", "editor"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, editor: Editor) -> RepoResult<Option<Editor>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Editor>(
            "UPDATE editors
             SET name = $2, surname = $3, national_id = $4, username = $5, password_hash = $6
             WHERE id = $1
             RETURNING *",
        )
        .bind(editor.id)
        .bind(&editor.name)
        .bind(&editor.surname)
        .bind(&editor.national_id)
        .bind(&editor.username)
        .bind(&editor.password_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "editor", "editor"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        delete_by_id(&self.pool, "DELETE FROM editors WHERE id = $1", id, "editor").await
    }
}

/* ---------- THEATERS ---------- */

#[async_trait]
impl Repository<Theater> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Theater>> {
        let theaters = sqlx::query_as::<_, Theater>("SELECT * FROM theaters ORDER BY city, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(theaters)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Theater>> {
        let theater = sqlx::query_as::<_, Theater>("SELECT * FROM theaters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(theater)
    }

    async fn create(&self, theater: Theater) -> RepoResult<Theater> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Theater>(
            "INSERT INTO theaters (name, city, address, editor_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&theater.name)
        .bind(&theater.city)
        .bind(&theater.address)
        .bind(theater.editor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "editor", "theater"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, theater: Theater) -> RepoResult<Option<Theater>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Theater>(
            "UPDATE theaters
             SET name = $2, city = $3, address = $4, editor_id = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(theater.id)
        .bind(&theater.name)
        .bind(&theater.city)
        .bind(&theater.address)
        .bind(theater.editor_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "editor", "theater"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        // halls cascade, and their performances with them
        delete_by_id(&self.pool, "DELETE FROM theaters WHERE id = $1", id, "theater").await
    }
}

/* ---------- HALLS ---------- */

#[async_trait]
impl Repository<Hall> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Hall>> {
        let halls = sqlx::query_as::<_, Hall>("SELECT * FROM halls ORDER BY theater_id, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(halls)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Hall>> {
        let hall = sqlx::query_as::<_, Hall>("SELECT * FROM halls WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hall)
    }

    async fn create(&self, hall: Hall) -> RepoResult<Hall> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Hall>(
            "INSERT INTO halls (name, total_seats, theater_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&hall.name)
        .bind(hall.total_seats)
        .bind(hall.theater_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "theater", "hall"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, hall: Hall) -> RepoResult<Option<Hall>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Hall>(
            "UPDATE halls
             SET name = $2, total_seats = $3, theater_id = $4
             WHERE id = $1
             RETURNING *",
        )
        .bind(hall.id)
        .bind(&hall.name)
        .bind(hall.total_seats)
        .bind(hall.theater_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "theater", "hall"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        delete_by_id(&self.pool, "DELETE FROM halls WHERE id = $1", id, "hall").await
    }
}

/* ---------- SHOWS ---------- */

#[async_trait]
impl Repository<Show> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Show>> {
        let shows = sqlx::query_as::<_, Show>("SELECT * FROM shows ORDER BY premiere_date DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(shows)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Show>> {
        let show = sqlx::query_as::<_, Show>("SELECT * FROM shows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(show)
    }

    async fn create(&self, show: Show) -> RepoResult<Show> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Show>(
            "INSERT INTO shows (title, genre, premiere_date, performance_count)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&show.title)
        .bind(&show.genre)
        .bind(show.premiere_date)
        .bind(show.performance_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "show", "show"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, show: Show) -> RepoResult<Option<Show>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Show>(
            "UPDATE shows
             SET title = $2, genre = $3, premiere_date = $4, performance_count = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(show.id)
        .bind(&show.title)
        .bind(&show.genre)
        .bind(show.premiere_date)
        .bind(show.performance_count)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "show", "show"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        delete_by_id(&self.pool, "DELETE FROM shows WHERE id = $1", id, "show").await
    }
}

/* ---------- PERFORMANCES ---------- */

#[async_trait]
impl Repository<Performance> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Performance>> {
        let performances =
            sqlx::query_as::<_, Performance>("SELECT * FROM performances ORDER BY starts_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(performances)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Performance>> {
        let performance = sqlx::query_as::<_, Performance>("SELECT * FROM performances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(performance)
    }

    async fn create(&self, performance: Performance) -> RepoResult<Performance> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Performance>(
            "INSERT INTO performances (starts_at, price, free_seats, guest_show, show_id, hall_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(performance.starts_at)
        .bind(performance.price)
        .bind(performance.free_seats)
        .bind(performance.guest_show)
        .bind(performance.show_id)
        .bind(performance.hall_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "show or hall", "performance"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, performance: Performance) -> RepoResult<Option<Performance>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Performance>(
            "UPDATE performances
             SET starts_at = $2, price = $3, free_seats = $4, guest_show = $5,
                 show_id = $6, hall_id = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(performance.id)
        .bind(performance.starts_at)
        .bind(performance.price)
        .bind(performance.free_seats)
        .bind(performance.guest_show)
        .bind(performance.show_id)
        .bind(performance.hall_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "show or hall", "performance"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        // blocked by reservations (ON DELETE RESTRICT)
        delete_by_id(&self.pool, "DELETE FROM performances WHERE id = $1", id, "performance").await
    }
}

/* ---------- SEATS ---------- */

#[async_trait]
impl Repository<Seat> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats ORDER BY hall_id, row_number, seat_number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(seat)
    }

    async fn create(&self, seat: Seat) -> RepoResult<Seat> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Seat>(
            "INSERT INTO seats (row_number, seat_number, sector, hall_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(seat.row_number)
        .bind(seat.seat_number)
        .bind(&seat.sector)
        .bind(seat.hall_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "hall", "seat"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, seat: Seat) -> RepoResult<Option<Seat>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Seat>(
            "UPDATE seats
             SET row_number = $2, seat_number = $3, sector = $4, hall_id = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(seat.id)
        .bind(seat.row_number)
        .bind(seat.seat_number)
        .bind(&seat.sector)
        .bind(seat.hall_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "hall", "seat"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        delete_by_id(&self.pool, "DELETE FROM seats WHERE id = $1", id, "seat").await
    }
}

/* ---------- RESERVATIONS ---------- */

#[async_trait]
impl Repository<Reservation> for PgStore {
    async fn get_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(reservations)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reservation)
    }

    async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations
                (seat_count, total_price, paid, created_at, expires_at, performance_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(reservation.seat_count)
        .bind(reservation.total_price)
        .bind(reservation.paid)
        .bind(reservation.created_at)
        .bind(reservation.expires_at)
        .bind(reservation.performance_id)
        .bind(reservation.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "performance or user", "reservation"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, reservation: Reservation) -> RepoResult<Option<Reservation>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations
             SET seat_count = $2, total_price = $3, paid = $4, created_at = $5,
                 expires_at = $6, performance_id = $7, user_id = $8
             WHERE id = $1
             RETURNING *",
        )
        .bind(reservation.id)
        .bind(reservation.seat_count)
        .bind(reservation.total_price)
        .bind(reservation.paid)
        .bind(reservation.created_at)
        .bind(reservation.expires_at)
        .bind(reservation.performance_id)
        .bind(reservation.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "performance or user", "reservation"))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        delete_by_id(&self.pool, "DELETE FROM reservations WHERE id = $1", id, "reservation").await
    }
}
