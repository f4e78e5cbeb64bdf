use core::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerType {
    Minecraft,
}

impl fmt::Display for ListenerType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Minecraft => f.write_str("minecraft"),
        }
    }
}

/// Announced once a listener accepts connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerBoundEvent {
    pub address: SocketAddr,
    pub listener_type: ListenerType,
}

impl ListenerBoundEvent {
    pub fn new(
        address: SocketAddr,
        listener_type: ListenerType,
    ) -> Self {
        ListenerBoundEvent {
            address,
            listener_type,
        }
    }
}

impl fmt::Display for ListenerBoundEvent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} listener bound to {}", self.listener_type, self.address)
    }
}
