use crate::domain::events::Event;
use std::fmt;
use std::str::FromStr;

/// Event names exposed by the temperature service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureEventKind {
    NewListener,
    RemoveListener,
    TemperatureChanged,
}

impl TemperatureEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewListener => "newListener",
            Self::RemoveListener => "removeListener",
            Self::TemperatureChanged => "temperaturechanged",
        }
    }
}

impl fmt::Display for TemperatureEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown temperature event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for TemperatureEventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newListener" => Ok(Self::NewListener),
            "removeListener" => Ok(Self::RemoveListener),
            "temperaturechanged" => Ok(Self::TemperatureChanged),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Payloads dispatched by the temperature service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureEvent {
    /// A listener for the given event is about to be registered
    NewListener(TemperatureEventKind),
    /// A listener for the given event was removed
    RemoveListener(TemperatureEventKind),
    /// The device reported a new temperature
    TemperatureChanged(i8),
}

impl Event for TemperatureEvent {
    type Kind = TemperatureEventKind;

    fn kind(&self) -> TemperatureEventKind {
        match self {
            Self::NewListener(_) => TemperatureEventKind::NewListener,
            Self::RemoveListener(_) => TemperatureEventKind::RemoveListener,
            Self::TemperatureChanged(_) => TemperatureEventKind::TemperatureChanged,
        }
    }

    fn new_listener(kind: TemperatureEventKind) -> Self {
        Self::NewListener(kind)
    }

    fn remove_listener(kind: TemperatureEventKind) -> Self {
        Self::RemoveListener(kind)
    }
}
