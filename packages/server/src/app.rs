//! Composition root.
//!
//! Stores are injected so tests (or a deployment backed by real databases) can
//! swap them; the connection registry and the broadcast worker are always
//! created here, once per server.

use std::sync::Arc;

use chatterfly_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, MessageStore, RoomStore, SessionStore, UserStore},
    infrastructure::{
        registry::InMemoryConnectionRegistry,
        repository::{
            InMemoryMessageStore, InMemoryRoomStore, InMemorySessionStore, InMemoryUserStore,
        },
    },
    ui::{AppState, Server},
    usecase::{
        BroadcastWorker, CreateRoomUseCase, EnterRoomUseCase, GetProfileUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, SignInUseCase, SignOutUseCase,
    },
};

/// Session Store and Persistence Store collaborators
#[derive(Clone)]
pub struct Stores {
    pub sessions: Arc<dyn SessionStore>,
    pub messages: Arc<dyn MessageStore>,
    pub rooms: Arc<dyn RoomStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Process-local stores
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            messages: Arc::new(InMemoryMessageStore::new()),
            rooms: Arc::new(InMemoryRoomStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
        }
    }
}

/// Wire stores, registry, broadcast worker and use cases into a [`Server`].
///
/// Spawns the broadcast worker, so it must be called inside a tokio runtime.
pub fn build_server(stores: Stores, clock: Arc<dyn Clock>) -> Server {
    // 1. Connection Registry と Broadcast Worker
    let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
    let broadcast = BroadcastWorker::new(stores.messages.clone(), registry.clone()).spawn();

    // 2. UseCases
    let state = AppState {
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            stores.sessions.clone(),
            stores.rooms.clone(),
            stores.users.clone(),
            stores.messages.clone(),
            registry.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            broadcast.channel(),
            clock.clone(),
        )),
        leave_room_usecase: Arc::new(LeaveRoomUseCase::new(registry)),
        sign_in_usecase: Arc::new(SignInUseCase::new(
            stores.sessions.clone(),
            stores.users.clone(),
            clock,
        )),
        sign_out_usecase: Arc::new(SignOutUseCase::new(stores.sessions.clone())),
        get_profile_usecase: Arc::new(GetProfileUseCase::new(
            stores.sessions.clone(),
            stores.users.clone(),
        )),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(
            stores.sessions.clone(),
            stores.rooms.clone(),
            stores.users.clone(),
        )),
        enter_room_usecase: Arc::new(EnterRoomUseCase::new(stores.sessions, stores.rooms)),
    };

    // 3. Server
    Server::new(state, broadcast)
}
