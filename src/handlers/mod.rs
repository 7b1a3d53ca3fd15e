pub mod rooms;
pub mod session;
