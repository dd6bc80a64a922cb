pub mod device;
pub mod item;
pub mod notification;
pub mod user;
