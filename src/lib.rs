pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::app::devices::DeviceRegistry;
use crate::app::dispatcher::ActivityDispatcher;
use crate::app::push::PushGateway;
use crate::app::store::NotificationStore;
use crate::config::NotifyConfig;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub devices: DeviceRegistry,
    pub dispatcher: ActivityDispatcher,
    pub paseto_access_key: [u8; 32],
    pub access_ttl_minutes: u64,
}

impl AppState {
    pub fn new(
        db: Db,
        store: Arc<dyn NotificationStore>,
        gateway: Arc<dyn PushGateway>,
        notify: NotifyConfig,
        paseto_access_key: [u8; 32],
        access_ttl_minutes: u64,
    ) -> Self {
        Self {
            db,
            devices: DeviceRegistry::new(store.clone()),
            dispatcher: ActivityDispatcher::new(store, gateway, notify),
            paseto_access_key,
            access_ttl_minutes,
        }
    }
}
