pub mod room;
pub mod user;

pub use room::{NewRoom, Room};
pub use user::User;
