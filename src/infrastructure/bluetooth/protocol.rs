//! micro:bit Temperature Service Protocol
//!
//! UUIDs and value encodings of the micro:bit temperature GATT service.

use crate::error::{Error, Result};
use uuid::{uuid, Uuid};

/// Temperature Service UUID
pub const SERVICE_UUID: Uuid = uuid!("e95d6100-251d-470a-a062-fa1922dfa9a8");

/// Characteristics of the temperature service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureCharacteristic {
    /// Current temperature, one signed byte (read, notify)
    Temperature,
    /// Notification period in milliseconds, u16 little-endian (read, write)
    TemperaturePeriod,
}

impl TemperatureCharacteristic {
    pub const fn uuid(&self) -> Uuid {
        match self {
            Self::Temperature => uuid!("e95d9250-251d-470a-a062-fa1922dfa9a8"),
            Self::TemperaturePeriod => uuid!("e95d1b25-251d-470a-a062-fa1922dfa9a8"),
        }
    }
}

/// Temperature value: i8 at offset 0
pub fn decode_temperature(bytes: &[u8]) -> Result<i8> {
    match bytes.first() {
        Some(&byte) => Ok(byte as i8),
        None => Err(Error::ShortPayload {
            expected: 1,
            actual: 0,
        }),
    }
}

/// Period value: u16 little-endian at offset 0
pub fn decode_period(bytes: &[u8]) -> Result<u16> {
    if bytes.len() < 2 {
        return Err(Error::ShortPayload {
            expected: 2,
            actual: bytes.len(),
        });
    }
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub fn encode_period(period: u16) -> [u8; 2] {
    period.to_le_bytes()
}
