use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepoError, RepoResult, Repository, UserRepository};
use crate::models::{Editor, Hall, Performance, Reservation, Seat, Show, Theater, User};

/// In-process store with the same foreign-key rules as the Postgres schema:
/// theater → halls → performances cascade, show → performances cascade,
/// user → reservations cascade, reservations restrict performance deletes,
/// editor and hall deletes null out theater/seat references.
///
/// Used with `STORAGE=memory` and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    editors: HashMap<Uuid, Editor>,
    theaters: HashMap<Uuid, Theater>,
    halls: HashMap<Uuid, Hall>,
    shows: HashMap<Uuid, Show>,
    performances: HashMap<Uuid, Performance>,
    seats: HashMap<Uuid, Seat>,
    reservations: HashMap<Uuid, Reservation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn username_taken(&self, username: &str, except: Uuid) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && u.id != except)
    }

    fn check_theater_refs(&self, theater: &Theater) -> RepoResult<()> {
        match theater.editor_id {
            Some(editor_id) if !self.editors.contains_key(&editor_id) => {
                Err(RepoError::MissingParent("editor"))
            }
            _ => Ok(()),
        }
    }

    fn check_hall_refs(&self, hall: &Hall) -> RepoResult<()> {
        if !self.theaters.contains_key(&hall.theater_id) {
            return Err(RepoError::MissingParent("theater"));
        }
        Ok(())
    }

    fn check_performance_refs(&self, performance: &Performance) -> RepoResult<()> {
        if !self.shows.contains_key(&performance.show_id)
            || !self.halls.contains_key(&performance.hall_id)
        {
            return Err(RepoError::MissingParent("show or hall"));
        }
        Ok(())
    }

    fn check_seat_refs(&self, seat: &Seat) -> RepoResult<()> {
        match seat.hall_id {
            Some(hall_id) if !self.halls.contains_key(&hall_id) => Err(RepoError::MissingParent("hall")),
            _ => Ok(()),
        }
    }

    fn check_reservation_refs(&self, reservation: &Reservation) -> RepoResult<()> {
        if !self.performances.contains_key(&reservation.performance_id)
            || !self.users.contains_key(&reservation.user_id)
        {
            return Err(RepoError::MissingParent("performance or user"));
        }
        Ok(())
    }

    /// Performances that go away together with any of `halls` or `shows`.
    fn dependent_performances(&self, halls: &[Uuid], shows: &[Uuid]) -> Vec<Uuid> {
        self.performances
            .values()
            .filter(|p| halls.contains(&p.hall_id) || shows.contains(&p.show_id))
            .map(|p| p.id)
            .collect()
    }

    fn ensure_unreserved(&self, performances: &[Uuid], entity: &'static str) -> RepoResult<()> {
        let referenced = self
            .reservations
            .values()
            .any(|r| performances.contains(&r.performance_id));
        if referenced {
            return Err(RepoError::Restricted(entity));
        }
        Ok(())
    }

    fn remove_halls(&mut self, halls: &[Uuid]) {
        let performances = self.dependent_performances(halls, &[]);
        for id in performances {
            self.performances.remove(&id);
        }
        for seat in self.seats.values_mut() {
            if seat.hall_id.is_some_and(|h| halls.contains(&h)) {
                seat.hall_id = None;
            }
        }
        for id in halls {
            self.halls.remove(id);
        }
    }
}

/* ---------- USERS ---------- */

#[async_trait]
impl Repository<User> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, mut user: User) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        user.id = Uuid::new_v4();
        if tables.username_taken(&user.username, user.id) {
            return Err(RepoError::Duplicate("username"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> RepoResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Ok(None);
        }
        if tables.username_taken(&user.username, user.id) {
            return Err(RepoError::Duplicate("username"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reservations.retain(|_, r| r.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

/* ---------- EDITORS ---------- */

#[async_trait]
impl Repository<Editor> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Editor>> {
        Ok(self.tables.read().await.editors.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Editor>> {
        Ok(self.tables.read().await.editors.get(&id).cloned())
    }

    async fn create(&self, mut editor: Editor) -> RepoResult<Editor> {
        editor.id = Uuid::new_v4();
        self.tables.write().await.editors.insert(editor.id, editor.clone());
        Ok(editor)
    }

    async fn update(&self, editor: Editor) -> RepoResult<Option<Editor>> {
        let mut tables = self.tables.write().await;
        match tables.editors.get_mut(&editor.id) {
            Some(stored) => {
                *stored = editor.clone();
                Ok(Some(editor))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.editors.remove(&id).is_none() {
            return Ok(false);
        }
        for theater in tables.theaters.values_mut() {
            if theater.editor_id == Some(id) {
                theater.editor_id = None;
            }
        }
        Ok(true)
    }
}

/* ---------- THEATERS ---------- */

#[async_trait]
impl Repository<Theater> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Theater>> {
        Ok(self.tables.read().await.theaters.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Theater>> {
        Ok(self.tables.read().await.theaters.get(&id).cloned())
    }

    async fn create(&self, mut theater: Theater) -> RepoResult<Theater> {
        let mut tables = self.tables.write().await;
        tables.check_theater_refs(&theater)?;
        theater.id = Uuid::new_v4();
        tables.theaters.insert(theater.id, theater.clone());
        Ok(theater)
    }

    async fn update(&self, theater: Theater) -> RepoResult<Option<Theater>> {
        let mut tables = self.tables.write().await;
        if !tables.theaters.contains_key(&theater.id) {
            return Ok(None);
        }
        tables.check_theater_refs(&theater)?;
        tables.theaters.insert(theater.id, theater.clone());
        Ok(Some(theater))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.theaters.contains_key(&id) {
            return Ok(false);
        }
        let halls: Vec<Uuid> = tables
            .halls
            .values()
            .filter(|h| h.theater_id == id)
            .map(|h| h.id)
            .collect();
        let performances = tables.dependent_performances(&halls, &[]);
        tables.ensure_unreserved(&performances, "theater")?;
        tables.remove_halls(&halls);
        tables.theaters.remove(&id);
        Ok(true)
    }
}

/* ---------- HALLS ---------- */

#[async_trait]
impl Repository<Hall> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Hall>> {
        Ok(self.tables.read().await.halls.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Hall>> {
        Ok(self.tables.read().await.halls.get(&id).cloned())
    }

    async fn create(&self, mut hall: Hall) -> RepoResult<Hall> {
        let mut tables = self.tables.write().await;
        tables.check_hall_refs(&hall)?;
        hall.id = Uuid::new_v4();
        tables.halls.insert(hall.id, hall.clone());
        Ok(hall)
    }

    async fn update(&self, hall: Hall) -> RepoResult<Option<Hall>> {
        let mut tables = self.tables.write().await;
        if !tables.halls.contains_key(&hall.id) {
            return Ok(None);
        }
        tables.check_hall_refs(&hall)?;
        tables.halls.insert(hall.id, hall.clone());
        Ok(Some(hall))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.halls.contains_key(&id) {
            return Ok(false);
        }
        let performances = tables.dependent_performances(&[id], &[]);
        tables.ensure_unreserved(&performances, "hall")?;
        tables.remove_halls(&[id]);
        Ok(true)
    }
}

/* ---------- SHOWS ---------- */

#[async_trait]
impl Repository<Show> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Show>> {
        Ok(self.tables.read().await.shows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Show>> {
        Ok(self.tables.read().await.shows.get(&id).cloned())
    }

    async fn create(&self, mut show: Show) -> RepoResult<Show> {
        show.id = Uuid::new_v4();
        self.tables.write().await.shows.insert(show.id, show.clone());
        Ok(show)
    }

    async fn update(&self, show: Show) -> RepoResult<Option<Show>> {
        let mut tables = self.tables.write().await;
        match tables.shows.get_mut(&show.id) {
            Some(stored) => {
                *stored = show.clone();
                Ok(Some(show))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.shows.contains_key(&id) {
            return Ok(false);
        }
        let performances = tables.dependent_performances(&[], &[id]);
        tables.ensure_unreserved(&performances, "show")?;
        for performance in performances {
            tables.performances.remove(&performance);
        }
        tables.shows.remove(&id);
        Ok(true)
    }
}

/* ---------- PERFORMANCES ---------- */

#[async_trait]
impl Repository<Performance> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Performance>> {
        Ok(self.tables.read().await.performances.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Performance>> {
        Ok(self.tables.read().await.performances.get(&id).cloned())
    }

    async fn create(&self, mut performance: Performance) -> RepoResult<Performance> {
        let mut tables = self.tables.write().await;
        tables.check_performance_refs(&performance)?;
        performance.id = Uuid::new_v4();
        tables.performances.insert(performance.id, performance.clone());
        Ok(performance)
    }

    async fn update(&self, performance: Performance) -> RepoResult<Option<Performance>> {
        let mut tables = self.tables.write().await;
        if !tables.performances.contains_key(&performance.id) {
            return Ok(None);
        }
        tables.check_performance_refs(&performance)?;
        tables.performances.insert(performance.id, performance.clone());
        Ok(Some(performance))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.performances.contains_key(&id) {
            return Ok(false);
        }
        tables.ensure_unreserved(&[id], "performance")?;
        tables.performances.remove(&id);
        Ok(true)
    }
}

/* ---------- SEATS ---------- */

#[async_trait]
impl Repository<Seat> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Seat>> {
        Ok(self.tables.read().await.seats.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Seat>> {
        Ok(self.tables.read().await.seats.get(&id).cloned())
    }

    async fn create(&self, mut seat: Seat) -> RepoResult<Seat> {
        let mut tables = self.tables.write().await;
        tables.check_seat_refs(&seat)?;
        seat.id = Uuid::new_v4();
        tables.seats.insert(seat.id, seat.clone());
        Ok(seat)
    }

    async fn update(&self, seat: Seat) -> RepoResult<Option<Seat>> {
        let mut tables = self.tables.write().await;
        if !tables.seats.contains_key(&seat.id) {
            return Ok(None);
        }
        tables.check_seat_refs(&seat)?;
        tables.seats.insert(seat.id, seat.clone());
        Ok(Some(seat))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.tables.write().await.seats.remove(&id).is_some())
    }
}

/* ---------- RESERVATIONS ---------- */

#[async_trait]
impl Repository<Reservation> for MemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Reservation>> {
        Ok(self.tables.read().await.reservations.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<Reservation>> {
        Ok(self.tables.read().await.reservations.get(&id).cloned())
    }

    async fn create(&self, mut reservation: Reservation) -> RepoResult<Reservation> {
        let mut tables = self.tables.write().await;
        tables.check_reservation_refs(&reservation)?;
        reservation.id = Uuid::new_v4();
        tables.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update(&self, reservation: Reservation) -> RepoResult<Option<Reservation>> {
        let mut tables = self.tables.write().await;
        if !tables.reservations.contains_key(&reservation.id) {
            return Ok(None);
        }
        tables.check_reservation_refs(&reservation)?;
        tables.reservations.insert(reservation.id, reservation.clone());
        Ok(Some(reservation))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.tables.write().await.reservations.remove(&id).is_some())
    }
}
