pub mod db;
pub mod notification_store;
pub mod push_gateway;
