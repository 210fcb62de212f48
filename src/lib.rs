//! # microbit_temperature
//!
//! Client for the BBC micro:bit Bluetooth temperature service.
//!
//! ```rust,ignore
//! use microbit_temperature::TemperatureService;
//!
//! // `services` come from the host Bluetooth stack, e.g. wrapped with
//! // `infrastructure::bluetooth::winrt::WinGattService::new` on Windows.
//! let Some(thermometer) = TemperatureService::create(services).await? else {
//!     return Ok(()); // not a micro:bit with the temperature service
//! };
//!
//! println!("{} degrees", thermometer.read_temperature().await?);
//! thermometer.set_temperature_period(1000).await?;
//! thermometer.on_temperature_changed(|t| println!("now {} degrees", t))?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::events::{EventDispatcher, ListenerId};
pub use domain::models::{TemperatureEvent, TemperatureEventKind};
pub use error::{Error, Result};
pub use infrastructure::bluetooth::transport::{
    GattCharacteristic, GattService, NotificationToken, ValueChangedHandler,
};
pub use infrastructure::bluetooth::TemperatureService;
