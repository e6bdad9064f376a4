//! Test fixtures shared by the unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use crate::domain::{
    ConnectionId, ConnectionRecord, ConnectionSink, Delivery, DeliveryError, Message,
    MessageBody, Room, RoomKey, Timestamp, Username,
};

/// Sink that records every delivery in memory.
#[derive(Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<Delivery>>,
    closed: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn chat_bodies(&self) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Chat(message) => Some(message.body.into_string()),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl ConnectionSink for RecordingSink {
    fn deliver(&self, delivery: Delivery) -> Result<(), DeliveryError> {
        self.deliveries.lock().unwrap().push(delivery);
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub fn room_key(key: &str) -> RoomKey {
    RoomKey::new(key.to_string()).unwrap()
}

pub fn username(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

pub fn room(key: &str, name: &str) -> Room {
    Room::new(room_key(key), name.to_string())
}

pub fn message(room: &str, author: &str, body: &str) -> Message {
    Message::new(
        room_key(room),
        username(author),
        author.to_uppercase(),
        MessageBody::new(body.to_string()).unwrap(),
        Timestamp::new(1000),
    )
}

pub fn record(room: &str, author: &str, sink: Arc<dyn ConnectionSink>) -> ConnectionRecord {
    ConnectionRecord::new(
        ConnectionId::generate(),
        room_key(room),
        username(author),
        author.to_uppercase(),
        sink,
    )
}
