//! Bluetooth Module
//!
//! Client for the micro:bit temperature GATT service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   TemperatureService                     │
//! │  (reads, period writes, temperaturechanged events)       │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!         ┌─────────────┼─────────────┐
//!         │             │             │
//!         ▼             ▼             ▼
//! ┌───────────┐  ┌────────────┐  ┌──────────┐
//! │ Transport │  │   WinRT    │  │ Protocol │
//! │           │  │            │  │          │
//! │ - GATT    │  │ - Windows  │  │ - UUIDs  │
//! │   traits  │  │   binding  │  │ - Codecs │
//! └───────────┘  └────────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Service and characteristic UUIDs, value encodings
//! - [`transport`] - Capability traits implemented by the host Bluetooth stack
//! - `winrt` - `Windows.Devices.Bluetooth` implementation of the transport (Windows only)
//! - [`service`] - The temperature service client

pub mod protocol;
pub mod service;
pub mod transport;
#[cfg(windows)]
pub mod winrt;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main service for convenience
pub use service::TemperatureService;
