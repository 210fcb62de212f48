//! WinRT GATT Transport
//!
//! Binds the transport traits to `Windows.Devices.Bluetooth`. Connecting to
//! the device and enumerating its services is left to the caller; wrap each
//! discovered `GattDeviceService` with [`WinGattService::new`].

use crate::error::{Error, Result};
use crate::infrastructure::bluetooth::transport::{
    GattCharacteristic, GattService, NotificationToken, ValueChangedHandler,
};
use async_trait::async_trait;
use tracing::{error, info, trace};
use uuid::Uuid;
use windows::core::GUID;
use windows::Devices::Bluetooth::BluetoothCacheMode;
use windows::Devices::Bluetooth::GenericAttributeProfile::{
    GattCharacteristic as WinCharacteristic, GattClientCharacteristicConfigurationDescriptorValue,
    GattCommunicationStatus, GattDeviceService, GattValueChangedEventArgs,
};
use windows::Foundation::TypedEventHandler;
use windows::Storage::Streams::{DataReader, DataWriter, IBuffer};

/// Convert a UUID into a Windows GUID
pub fn guid_from_uuid(uuid: Uuid) -> GUID {
    let (data1, data2, data3, data4) = uuid.as_fields();
    GUID {
        data1,
        data2,
        data3,
        data4: *data4,
    }
}

/// Convert a Windows GUID into a UUID
pub fn uuid_from_guid(guid: &GUID) -> Uuid {
    Uuid::from_fields(guid.data1, guid.data2, guid.data3, &guid.data4)
}

fn read_buffer(buffer: &IBuffer) -> anyhow::Result<Vec<u8>> {
    let reader = DataReader::FromBuffer(buffer)?;
    let length = reader.UnconsumedBufferLength()? as usize;
    let mut bytes = vec![0u8; length];
    reader.ReadBytes(&mut bytes)?;
    Ok(bytes)
}

fn check_status(status: GattCommunicationStatus, operation: &str) -> anyhow::Result<()> {
    if status != GattCommunicationStatus::Success {
        error!("{} failed. Status: {:?}", operation, status);
        anyhow::bail!("{} failed: {:?}", operation, status);
    }
    Ok(())
}

/// A discovered WinRT GATT service
pub struct WinGattService {
    service: GattDeviceService,
    uuid: Uuid,
}

impl WinGattService {
    pub fn new(service: GattDeviceService) -> anyhow::Result<Self> {
        let uuid = uuid_from_guid(&service.Uuid()?);
        Ok(Self { service, uuid })
    }

    async fn lookup(&self, uuid: Uuid) -> anyhow::Result<Option<WinCharacteristic>> {
        let result = self
            .service
            .GetCharacteristicsForUuidWithCacheModeAsync(
                guid_from_uuid(uuid),
                BluetoothCacheMode::Uncached,
            )?
            .await?;
        check_status(result.Status()?, "Characteristic lookup")?;

        let characteristics = result.Characteristics()?;
        if characteristics.Size()? == 0 {
            return Ok(None);
        }
        Ok(Some(characteristics.GetAt(0)?))
    }
}

#[async_trait]
impl GattService for WinGattService {
    type Characteristic = WinGattCharacteristic;

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn get_characteristic(&self, uuid: Uuid) -> Result<WinGattCharacteristic> {
        match self.lookup(uuid).await? {
            Some(characteristic) => {
                info!("Found characteristic {}", uuid);
                Ok(WinGattCharacteristic {
                    characteristic,
                    uuid,
                })
            }
            None => Err(Error::CharacteristicNotFound(uuid)),
        }
    }
}

/// A characteristic of a [`WinGattService`]
pub struct WinGattCharacteristic {
    characteristic: WinCharacteristic,
    uuid: Uuid,
}

impl WinGattCharacteristic {
    async fn read(&self) -> anyhow::Result<Vec<u8>> {
        let result = self
            .characteristic
            .ReadValueWithCacheModeAsync(BluetoothCacheMode::Uncached)?
            .await?;
        check_status(result.Status()?, "Characteristic read")?;
        read_buffer(&result.Value()?)
    }

    async fn write(&self, value: &[u8]) -> anyhow::Result<()> {
        let writer = DataWriter::new()?;
        writer.WriteBytes(value)?;
        let buffer = writer.DetachBuffer()?;

        let status = self.characteristic.WriteValueAsync(&buffer)?.await?;
        check_status(status, "Characteristic write")
    }

    async fn configure(
        &self,
        value: GattClientCharacteristicConfigurationDescriptorValue,
    ) -> anyhow::Result<()> {
        let status = self
            .characteristic
            .WriteClientCharacteristicConfigurationDescriptorAsync(value)?
            .await?;
        check_status(status, "Notification subscription")
    }

    fn subscribe(&self, handler: ValueChangedHandler) -> anyhow::Result<i64> {
        let handler = TypedEventHandler::new(
            move |_: windows::core::Ref<WinCharacteristic>,
                  args: windows::core::Ref<GattValueChangedEventArgs>| {
                if let Some(args) = args.as_ref() {
                    let value = args.CharacteristicValue()?;
                    match read_buffer(&value) {
                        Ok(bytes) => handler(&bytes),
                        Err(e) => trace!("Unreadable notification: {}", e),
                    }
                }
                Ok(())
            },
        );
        Ok(self.characteristic.ValueChanged(&handler)?)
    }
}

#[async_trait]
impl GattCharacteristic for WinGattCharacteristic {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn read_value(&self) -> Result<Vec<u8>> {
        Ok(self.read().await?)
    }

    async fn write_value(&self, value: &[u8]) -> Result<()> {
        Ok(self.write(value).await?)
    }

    async fn start_notifications(&self) -> Result<()> {
        info!("Enabling notifications for {}", self.uuid);
        Ok(self
            .configure(GattClientCharacteristicConfigurationDescriptorValue::Notify)
            .await?)
    }

    async fn stop_notifications(&self) -> Result<()> {
        info!("Disabling notifications for {}", self.uuid);
        Ok(self
            .configure(GattClientCharacteristicConfigurationDescriptorValue::None)
            .await?)
    }

    fn add_value_changed_listener(
        &self,
        handler: ValueChangedHandler,
    ) -> Result<NotificationToken> {
        Ok(NotificationToken(self.subscribe(handler)?))
    }

    fn remove_value_changed_listener(&self, token: NotificationToken) -> Result<()> {
        self.characteristic
            .RemoveValueChanged(token.0)
            .map_err(anyhow::Error::from)?;
        Ok(())
    }
}
