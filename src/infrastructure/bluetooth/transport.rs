//! GATT Transport Abstraction
//!
//! The capability surface the temperature service needs from the host
//! Bluetooth stack. Discovery and connection happen elsewhere; these traits
//! only cover an already discovered service and its characteristics.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Callback invoked by the host stack with the raw bytes of a notification
pub type ValueChangedHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Registration handle returned when a [`ValueChangedHandler`] is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationToken(pub i64);

/// A remote GATT service on a connected device
#[async_trait]
pub trait GattService: Send + Sync {
    type Characteristic: GattCharacteristic;

    fn uuid(&self) -> Uuid;

    /// Look up a characteristic of this service.
    /// Fails with [`Error::CharacteristicNotFound`](crate::Error::CharacteristicNotFound)
    /// if the service does not expose it.
    async fn get_characteristic(&self, uuid: Uuid) -> Result<Self::Characteristic>;
}

/// A characteristic of a remote GATT service
#[async_trait]
pub trait GattCharacteristic: Send + Sync {
    fn uuid(&self) -> Uuid;

    /// Read the current value from the device, bypassing any cache
    async fn read_value(&self) -> Result<Vec<u8>>;

    async fn write_value(&self, value: &[u8]) -> Result<()>;

    /// Ask the device to start sending notifications for this characteristic
    async fn start_notifications(&self) -> Result<()>;

    async fn stop_notifications(&self) -> Result<()>;

    /// Attach a handler for value-changed notifications
    fn add_value_changed_listener(&self, handler: ValueChangedHandler)
        -> Result<NotificationToken>;

    /// Detach the handler registered under `token`
    fn remove_value_changed_listener(&self, token: NotificationToken) -> Result<()>;
}
