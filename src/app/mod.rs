pub mod auth;
pub mod composer;
pub mod devices;
pub mod dispatcher;
pub mod items;
pub mod preferences;
pub mod push;
pub mod store;
pub mod users;
