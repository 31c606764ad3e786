pub mod user;
pub mod editor;
pub mod theater;
pub mod hall;
pub mod show;
pub mod performance;
pub mod seat;
pub mod reservation;

pub use user::User;
pub use editor::Editor;
pub use theater::Theater;
pub use hall::Hall;
pub use show::Show;
pub use performance::Performance;
pub use seat::Seat;
pub use reservation::Reservation;
