//! In-memory GATT transport for tests.

use crate::error::{Error, Result};
use crate::infrastructure::bluetooth::transport::{
    GattCharacteristic, GattService, NotificationToken, ValueChangedHandler,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub struct MockService {
    uuid: Uuid,
    characteristics: HashMap<Uuid, MockCharacteristic>,
    lookups: Arc<AtomicUsize>,
}

impl MockService {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            characteristics: HashMap::new(),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_characteristic(mut self, characteristic: MockCharacteristic) -> Self {
        self.characteristics
            .insert(characteristic.uuid, characteristic);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GattService for MockService {
    type Characteristic = MockCharacteristic;

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn get_characteristic(&self, uuid: Uuid) -> Result<MockCharacteristic> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.characteristics
            .get(&uuid)
            .cloned()
            .ok_or(Error::CharacteristicNotFound(uuid))
    }
}

#[derive(Default)]
struct MockState {
    value: Mutex<Vec<u8>>,
    writes: Mutex<Vec<Vec<u8>>>,
    handlers: Mutex<BTreeMap<i64, ValueChangedHandler>>,
    next_token: AtomicI64,
    notifying: AtomicBool,
    start_calls: AtomicUsize,
    attach_calls: AtomicUsize,
    detach_calls: AtomicUsize,
    fail: AtomicBool,
}

/// Characteristic handle sharing its state with every clone
#[derive(Clone)]
pub struct MockCharacteristic {
    uuid: Uuid,
    state: Arc<MockState>,
}

impl MockCharacteristic {
    pub fn new(uuid: Uuid, value: &[u8]) -> Self {
        let state = MockState::default();
        *state.value.lock().unwrap() = value.to_vec();
        Self {
            uuid,
            state: Arc::new(state),
        }
    }

    pub fn set_value(&self, value: &[u8]) {
        *self.state.value.lock().unwrap() = value.to_vec();
    }

    /// Make every subsequent transport call fail
    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    /// Raise a value-changed notification to every attached handler
    pub fn notify(&self, value: &[u8]) {
        let handlers: Vec<ValueChangedHandler> =
            self.state.handlers.lock().unwrap().values().cloned().collect();
        for handler in handlers {
            handler(value);
        }
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.writes.lock().unwrap().clone()
    }

    pub fn is_notifying(&self) -> bool {
        self.state.notifying.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.state.start_calls.load(Ordering::SeqCst)
    }

    pub fn attach_calls(&self) -> usize {
        self.state.attach_calls.load(Ordering::SeqCst)
    }

    pub fn detach_calls(&self) -> usize {
        self.state.detach_calls.load(Ordering::SeqCst)
    }

    pub fn attached_handlers(&self) -> usize {
        self.state.handlers.lock().unwrap().len()
    }

    fn check(&self) -> Result<()> {
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("GATT operation failed").into());
        }
        Ok(())
    }
}

#[async_trait]
impl GattCharacteristic for MockCharacteristic {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn read_value(&self) -> Result<Vec<u8>> {
        self.check()?;
        Ok(self.state.value.lock().unwrap().clone())
    }

    async fn write_value(&self, value: &[u8]) -> Result<()> {
        self.check()?;
        self.state.writes.lock().unwrap().push(value.to_vec());
        *self.state.value.lock().unwrap() = value.to_vec();
        Ok(())
    }

    async fn start_notifications(&self) -> Result<()> {
        self.check()?;
        self.state.start_calls.fetch_add(1, Ordering::SeqCst);
        self.state.notifying.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_notifications(&self) -> Result<()> {
        self.check()?;
        self.state.notifying.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn add_value_changed_listener(
        &self,
        handler: ValueChangedHandler,
    ) -> Result<NotificationToken> {
        self.check()?;
        self.state.attach_calls.fetch_add(1, Ordering::SeqCst);
        let token = self.state.next_token.fetch_add(1, Ordering::SeqCst);
        self.state.handlers.lock().unwrap().insert(token, handler);
        Ok(NotificationToken(token))
    }

    fn remove_value_changed_listener(&self, token: NotificationToken) -> Result<()> {
        self.check()?;
        self.state.detach_calls.fetch_add(1, Ordering::SeqCst);
        self.state.handlers.lock().unwrap().remove(&token.0);
        Ok(())
    }
}
