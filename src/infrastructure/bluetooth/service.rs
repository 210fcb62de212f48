//! Temperature Service
//!
//! Client for the micro:bit temperature GATT service. Reads the current
//! temperature, reads and writes the notification period, and re-emits
//! device notifications as `temperaturechanged` events.
//!
//! The native value-changed handler is only attached to the transport while
//! at least one `temperaturechanged` listener is registered.

use crate::domain::events::{EventDispatcher, Listener, ListenerId};
use crate::domain::models::{TemperatureEvent, TemperatureEventKind};
use crate::error::Result;
use crate::infrastructure::bluetooth::protocol::{self, TemperatureCharacteristic};
use crate::infrastructure::bluetooth::transport::{
    GattCharacteristic, GattService, NotificationToken, ValueChangedHandler,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, trace, warn};

pub struct TemperatureService<S: GattService> {
    service: S,
    temperature: S::Characteristic,
    events: Arc<EventDispatcher<TemperatureEvent>>,
    // Some while the native handler is attached
    bridge: Mutex<Option<NotificationToken>>,
}

impl<S: GattService> TemperatureService<S> {
    /// Pick the temperature service out of `services` and initialise it.
    ///
    /// Returns `Ok(None)` when the device does not expose the service.
    pub async fn create<I>(services: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = S>,
    {
        let Some(service) = services
            .into_iter()
            .find(|service| service.uuid() == protocol::SERVICE_UUID)
        else {
            debug!("Temperature service not present");
            return Ok(None);
        };

        info!("Found temperature service");
        Self::init(service).await.map(Some)
    }

    async fn init(service: S) -> Result<Self> {
        let temperature = service
            .get_characteristic(TemperatureCharacteristic::Temperature.uuid())
            .await?;
        // Device-side notifications run for the lifetime of the service; only
        // the bridge to our own listeners is lazy.
        temperature.start_notifications().await?;

        Ok(Self {
            service,
            temperature,
            events: Arc::new(EventDispatcher::new()),
            bridge: Mutex::new(None),
        })
    }

    /// Read the current temperature from the device
    pub async fn read_temperature(&self) -> Result<i8> {
        let value = self
            .characteristic_value(TemperatureCharacteristic::Temperature)
            .await?;
        protocol::decode_temperature(&value)
    }

    /// Read the notification period in milliseconds
    pub async fn temperature_period(&self) -> Result<u16> {
        let value = self
            .characteristic_value(TemperatureCharacteristic::TemperaturePeriod)
            .await?;
        protocol::decode_period(&value)
    }

    /// Set the notification period in milliseconds
    pub async fn set_temperature_period(&self, period: u16) -> Result<()> {
        let characteristic = self
            .service
            .get_characteristic(TemperatureCharacteristic::TemperaturePeriod.uuid())
            .await?;
        debug!("Setting temperature period to {} ms", period);
        characteristic
            .write_value(&protocol::encode_period(period))
            .await
    }

    async fn characteristic_value(
        &self,
        characteristic: TemperatureCharacteristic,
    ) -> Result<Vec<u8>> {
        let characteristic = self
            .service
            .get_characteristic(characteristic.uuid())
            .await?;
        characteristic.read_value().await
    }

    /// Register a listener for `kind`
    ///
    /// `newListener`/`removeListener` listeners for `temperaturechanged` run
    /// while the notification bridge is locked and must not add or remove
    /// listeners on this service.
    pub fn add_listener(
        &self,
        kind: TemperatureEventKind,
        listener: Listener<TemperatureEvent>,
    ) -> Result<ListenerId> {
        if kind != TemperatureEventKind::TemperatureChanged {
            return Ok(self.events.add_listener(kind, listener));
        }

        // Held until the listener is registered so the count and the bridge
        // change together.
        let mut bridge = self.bridge();
        if bridge.is_none() && self.events.listener_count(kind) == 0 {
            let token = self
                .temperature
                .add_value_changed_listener(self.notification_handler())?;
            debug!("Temperature notifications bridged ({:?})", token);
            *bridge = Some(token);
        }
        Ok(self.events.add_listener(kind, listener))
    }

    /// Register a `temperaturechanged` listener receiving the decoded value
    pub fn on_temperature_changed<F>(&self, listener: F) -> Result<ListenerId>
    where
        F: Fn(i8) + Send + Sync + 'static,
    {
        self.add_listener(
            TemperatureEventKind::TemperatureChanged,
            Arc::new(move |event: &TemperatureEvent| {
                if let TemperatureEvent::TemperatureChanged(value) = event {
                    listener(*value);
                }
            }),
        )
    }

    /// Remove a listener. Returns `Ok(false)` if it was not registered.
    ///
    /// If the native handler cannot be detached the listener stays removed
    /// and the transport error is returned. The handler is kept on record
    /// and detaching is retried the next time the last listener goes away.
    pub fn remove_listener(&self, kind: TemperatureEventKind, id: ListenerId) -> Result<bool> {
        if kind != TemperatureEventKind::TemperatureChanged {
            return Ok(self.events.remove_listener(kind, id));
        }

        let mut bridge = self.bridge();
        let removed = self.events.remove_listener(kind, id);
        if removed {
            self.close_bridge(&mut bridge)?;
        }
        Ok(removed)
    }

    /// Remove every listener for `kind`. Returns how many were removed.
    pub fn remove_all_listeners(&self, kind: TemperatureEventKind) -> Result<usize> {
        if kind != TemperatureEventKind::TemperatureChanged {
            return Ok(self.events.remove_all_listeners(kind));
        }

        let mut bridge = self.bridge();
        let removed = self.events.remove_all_listeners(kind);
        if removed > 0 {
            self.close_bridge(&mut bridge)?;
        }
        Ok(removed)
    }

    pub fn listener_count(&self, kind: TemperatureEventKind) -> usize {
        self.events.listener_count(kind)
    }

    /// Whether the native value-changed handler is attached
    pub fn is_bridged(&self) -> bool {
        self.bridge().is_some()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Detach from the device and stop its notifications
    pub async fn close(self) -> Result<()> {
        {
            let mut bridge = self.bridge();
            self.detach(&mut bridge)?;
        }
        self.temperature.stop_notifications().await
    }

    // The token is only replaced under this lock, so a poisoned guard still
    // reflects what is attached.
    fn bridge(&self) -> MutexGuard<'_, Option<NotificationToken>> {
        self.bridge.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close_bridge(&self, bridge: &mut Option<NotificationToken>) -> Result<()> {
        if self.events.listener_count(TemperatureEventKind::TemperatureChanged) > 0 {
            return Ok(());
        }
        self.detach(bridge)
    }

    fn detach(&self, bridge: &mut Option<NotificationToken>) -> Result<()> {
        if let Some(token) = *bridge {
            self.temperature.remove_value_changed_listener(token)?;
            debug!("Temperature notifications unbridged ({:?})", token);
            *bridge = None;
        }
        Ok(())
    }

    fn notification_handler(&self) -> ValueChangedHandler {
        let events = Arc::clone(&self.events);
        Arc::new(move |value: &[u8]| {
            trace!("Temperature notification: {:02X?}", value);
            match protocol::decode_temperature(value) {
                Ok(temperature) => {
                    events.dispatch(&TemperatureEvent::TemperatureChanged(temperature));
                }
                Err(e) => warn!("Dropping temperature notification: {}", e),
            }
        })
    }
}

impl<S: GattService> Drop for TemperatureService<S> {
    fn drop(&mut self) {
        let mut bridge = self.bridge();
        if let Err(e) = self.detach(&mut bridge) {
            debug!("Failed to detach temperature notifications: {}", e);
        }
    }
}
