//! Transfer objects and their mapping to and from entities.
//!
//! Per resource: a create request, an update request (carrying the id), a
//! confirmation returned after writes, and, where the entity holds secrets,
//! a separate read shape. Other entities are returned as-is.

pub mod editor;
pub mod hall;
pub mod performance;
pub mod reservation;
pub mod seat;
pub mod show;
pub mod theater;
pub mod user;

pub use editor::*;
pub use hall::*;
pub use performance::*;
pub use reservation::*;
pub use seat::*;
pub use show::*;
pub use theater::*;
pub use user::*;
