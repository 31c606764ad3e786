//! Persistence layer.
//!
//! Every entity is reached through [`Repository`]. Each write is its own unit
//! of work: when a call returns `Ok`, the change is committed. Two stores
//! implement the traits: [`PgStore`] on top of sqlx/Postgres and
//! [`MemoryStore`], which applies the same delete rules in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Editor, Hall, Performance, Reservation, Seat, Show, Theater, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A delete was blocked by rows that reference the target.
    #[error("{0} is still referenced by other records")]
    Restricted(&'static str),
    /// A write names a parent row that does not exist.
    #[error("referenced {0} does not exist")]
    MissingParent(&'static str),
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait Repository<E>: Send + Sync {
    async fn get_all(&self) -> RepoResult<Vec<E>>;

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<E>>;

    /// Inserts `entity` under a freshly generated id; the incoming id is ignored.
    async fn create(&self, entity: E) -> RepoResult<E>;

    /// Replaces the stored row with the same id. `None` if there is no such row.
    async fn update(&self, entity: E) -> RepoResult<Option<E>>;

    /// Removes the row and applies the cascade rules. `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

/// Handles to every repository, shared through `AppState`.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub editors: Arc<dyn Repository<Editor>>,
    pub theaters: Arc<dyn Repository<Theater>>,
    pub halls: Arc<dyn Repository<Hall>>,
    pub shows: Arc<dyn Repository<Show>>,
    pub performances: Arc<dyn Repository<Performance>>,
    pub seats: Arc<dyn Repository<Seat>>,
    pub reservations: Arc<dyn Repository<Reservation>>,
}

impl Repositories {
    pub fn postgres(store: PgStore) -> Self {
        Self::from_store(Arc::new(store))
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + Repository<Editor>
            + Repository<Theater>
            + Repository<Hall>
            + Repository<Show>
            + Repository<Performance>
            + Repository<Seat>
            + Repository<Reservation>
            + 'static,
    {
        Self {
            users: store.clone(),
            editors: store.clone(),
            theaters: store.clone(),
            halls: store.clone(),
            shows: store.clone(),
            performances: store.clone(),
            seats: store.clone(),
            reservations: store,
        }
    }
}
