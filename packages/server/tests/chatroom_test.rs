//! Integration tests driving a real server over HTTP and WebSocket.
//!
//! Each test starts its own server on an ephemeral port inside the test runtime.

use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use chatterfly_server::{
    app::{Stores, build_server},
    domain::{
        Message, MessageBody, MessageStore, RepositoryError, Room, RoomKey, Timestamp, User,
        UserStore, Username,
    },
};
use chatterfly_shared::time::SystemClock;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, header},
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage the server lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<io::Result<()>>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(Stores::in_memory()).await
    }

    async fn start_with(stores: Stores) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = build_server(stores, Arc::new(SystemClock));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        TestServer {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.unwrap().unwrap();
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// A signed-in user (session cookie + HTTP client)
struct TestUser {
    http: reqwest::Client,
    cookie: String,
}

impl TestUser {
    async fn sign_in(server: &TestServer, username: &str, first_name: &str) -> Self {
        let http = reqwest::Client::new();
        let response = http
            .post(server.url("/api/sessions"))
            .json(&json!({"username": username, "firstName": first_name}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("chatterfly-cookie=session-"));

        TestUser { http, cookie }
    }

    async fn create_room(&self, server: &TestServer, name: &str) -> String {
        let response = self
            .http
            .post(server.url("/api/rooms"))
            .header(reqwest::header::COOKIE, &self.cookie)
            .json(&json!({"name": name}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let room: Value = response.json().await.unwrap();
        room["key"].as_str().unwrap().to_string()
    }

    async fn enter_room(&self, server: &TestServer, key: &str) -> reqwest::StatusCode {
        self.http
            .put(server.url(&format!("/api/rooms/{}/enter", key)))
            .header(reqwest::header::COOKIE, &self.cookie)
            .send()
            .await
            .unwrap()
            .status()
    }

    async fn profile(&self, server: &TestServer) -> reqwest::Response {
        self.http
            .get(server.url("/api/me"))
            .header(reqwest::header::COOKIE, &self.cookie)
            .send()
            .await
            .unwrap()
    }

    async fn connect(&self, server: &TestServer) -> Result<WsStream, tungstenite::Error> {
        let mut request = server.ws_url().into_client_request()?;
        request
            .headers_mut()
            .insert(header::COOKIE, HeaderValue::from_str(&self.cookie).unwrap());
        let (ws, _response) = connect_async(request).await?;
        Ok(ws)
    }

    /// Connect and consume the join frames, returning the stream right after the room frame
    async fn join(&self, server: &TestServer) -> WsStream {
        let mut ws = self.connect(server).await.unwrap();
        loop {
            let frame = next_frame(&mut ws).await;
            if frame["type"] == "room" {
                return ws;
            }
        }
    }
}

/// Message store whose history lookups always fail; appends go to the wrapped store
struct HistoryUnavailable(Arc<dyn MessageStore>);

#[async_trait]
impl MessageStore for HistoryUnavailable {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.0.append(message).await
    }

    async fn find_by_room(&self, _room_key: &RoomKey) -> Result<Vec<Message>, RepositoryError> {
        Err(RepositoryError::Unavailable("history offline".to_string()))
    }
}

/// User store that refuses membership updates for one user
struct MembershipUnavailable {
    inner: Arc<dyn UserStore>,
    refused: String,
}

#[async_trait]
impl UserStore for MembershipUnavailable {
    async fn find(&self, username: &Username) -> Result<User, RepositoryError> {
        self.inner.find(username).await
    }

    async fn create(&self, user: User) -> Result<(), RepositoryError> {
        self.inner.create(user).await
    }

    async fn update_room_membership(
        &self,
        username: &Username,
        rooms: Vec<Room>,
    ) -> Result<(), RepositoryError> {
        if username.as_str() == self.refused {
            return Err(RepositoryError::Unavailable("users offline".to_string()));
        }
        self.inner.update_room_membership(username, rooms).await
    }
}

/// Next JSON text frame (ping/pong frames are skipped)
async fn next_frame(ws: &mut WsStream) -> Value {
    loop {
        let message = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        match message {
            tungstenite::Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

async fn send_body(ws: &mut WsStream, body: &str) {
    ws.send(tungstenite::Message::text(json!({"body": body}).to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
    server.stop().await;
}

#[tokio::test]
async fn test_messages_fan_out_within_room_only() {
    // テスト項目: C1・C2 が r1、C3 が r2 にいるとき、メッセージは同じルームにだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let bob = TestUser::sign_in(&server, "bob", "Bob").await;
    let charlie = TestUser::sign_in(&server, "charlie", "Charlie").await;
    let r1 = alice.create_room(&server, "general").await;
    let r2 = charlie.create_room(&server, "random").await;
    assert_eq!(alice.enter_room(&server, &r1).await, reqwest::StatusCode::OK);
    assert_eq!(bob.enter_room(&server, &r1).await, reqwest::StatusCode::OK);
    assert_eq!(charlie.enter_room(&server, &r2).await, reqwest::StatusCode::OK);
    let mut c1 = alice.join(&server).await;
    let mut c2 = bob.join(&server).await;
    let mut c3 = charlie.join(&server).await;

    // when (操作):
    send_body(&mut c1, "hi").await;
    send_body(&mut c3, "elsewhere").await;
    let c1_first = next_frame(&mut c1).await;
    let c2_first = next_frame(&mut c2).await;
    let c3_first = next_frame(&mut c3).await;
    send_body(&mut c1, "again").await;
    let c2_second = next_frame(&mut c2).await;

    // then (期待する結果):
    for frame in [&c1_first, &c2_first] {
        assert_eq!(frame["type"], "chat");
        assert_eq!(frame["roomKey"], r1.as_str());
        assert_eq!(frame["body"], "hi");
        assert_eq!(frame["username"], "alice");
        assert_eq!(frame["firstName"], "Alice");
    }
    assert_eq!(c3_first["body"], "elsewhere");
    assert_eq!(c3_first["roomKey"], r2.as_str());
    // C2 の次のフレームは r1 のメッセージ（r2 のメッセージは届いていない）
    assert_eq!(c2_second["body"], "again");

    server.stop().await;
}

#[tokio::test]
async fn test_history_replayed_before_room_frame_and_live_messages() {
    // テスト項目: 保存済みの 3 件が保存順で、ルームフレームとライブメッセージより先に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let bob = TestUser::sign_in(&server, "bob", "Bob").await;
    let r1 = alice.create_room(&server, "general").await;
    alice.enter_room(&server, &r1).await;
    bob.enter_room(&server, &r1).await;
    let mut c1 = alice.join(&server).await;
    for body in ["one", "two", "three"] {
        send_body(&mut c1, body).await;
        // 配信は永続化の後なので、エコーを受け取れば保存済み
        assert_eq!(next_frame(&mut c1).await["body"], body);
    }

    // when (操作):
    let mut c2 = bob.connect(&server).await.unwrap();
    let mut frames = Vec::new();
    for _ in 0..4 {
        frames.push(next_frame(&mut c2).await);
    }
    send_body(&mut c1, "four").await;
    let live = next_frame(&mut c2).await;

    // then (期待する結果):
    let history: Vec<&str> = frames[..3]
        .iter()
        .map(|frame| {
            assert_eq!(frame["type"], "chat");
            frame["body"].as_str().unwrap()
        })
        .collect();
    assert_eq!(history, vec!["one", "two", "three"]);
    assert_eq!(frames[3], json!({"type": "room", "key": r1, "name": "general"}));
    assert_eq!(live["body"], "four");

    server.stop().await;
}

#[tokio::test]
async fn test_history_excludes_other_rooms() {
    // テスト項目: 他のルームに保存されたメッセージは履歴に含まれない
    // given (前提条件):
    let stores = Stores::in_memory();
    let server = TestServer::start_with(stores.clone()).await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let r1 = alice.create_room(&server, "general").await;
    for (room, body) in [(r1.as_str(), "mine"), ("elsewhere", "not mine")] {
        stores
            .messages
            .append(&Message::new(
                RoomKey::new(room.to_string()).unwrap(),
                Username::new("alice".to_string()).unwrap(),
                "Alice".to_string(),
                MessageBody::new(body.to_string()).unwrap(),
                Timestamp::new(1),
            ))
            .await
            .unwrap();
    }
    alice.enter_room(&server, &r1).await;

    // when (操作):
    let mut ws = alice.connect(&server).await.unwrap();
    let first = next_frame(&mut ws).await;
    let second = next_frame(&mut ws).await;

    // then (期待する結果):
    assert_eq!(first["body"], "mine");
    assert_eq!(second["type"], "room");

    server.stop().await;
}

#[tokio::test]
async fn test_history_failure_sends_error_frame_and_keeps_streaming() {
    // テスト項目: 履歴の取得に失敗すると error フレーム、room フレームの順に届き、接続は配信を続ける
    // given (前提条件):
    let mut stores = Stores::in_memory();
    stores.messages = Arc::new(HistoryUnavailable(stores.messages.clone()));
    let server = TestServer::start_with(stores).await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let r1 = alice.create_room(&server, "general").await;
    alice.enter_room(&server, &r1).await;

    // when (操作):
    let mut c1 = alice.connect(&server).await.unwrap();
    let first = next_frame(&mut c1).await;
    let second = next_frame(&mut c1).await;
    send_body(&mut c1, "hi").await;
    let live = next_frame(&mut c1).await;

    // then (期待する結果):
    assert_eq!(first, json!({"type": "error", "message": "internal server error"}));
    assert_eq!(second, json!({"type": "room", "key": r1, "name": "general"}));
    assert_eq!(live["type"], "chat");
    assert_eq!(live["body"], "hi");

    server.stop().await;
}

#[tokio::test]
async fn test_membership_failure_sends_error_frame_and_keeps_streaming() {
    // テスト項目: メンバーシップの更新に失敗すると room フレームの後に error フレームが届き、接続は配信を続ける
    // given (前提条件): bob のメンバーシップ更新だけが失敗する
    let mut stores = Stores::in_memory();
    stores.users = Arc::new(MembershipUnavailable {
        inner: stores.users.clone(),
        refused: "bob".to_string(),
    });
    let server = TestServer::start_with(stores).await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let bob = TestUser::sign_in(&server, "bob", "Bob").await;
    let r1 = alice.create_room(&server, "general").await;
    bob.enter_room(&server, &r1).await;

    // when (操作):
    let mut c2 = bob.connect(&server).await.unwrap();
    let first = next_frame(&mut c2).await;
    let second = next_frame(&mut c2).await;
    send_body(&mut c2, "hi").await;
    let live = next_frame(&mut c2).await;

    // then (期待する結果):
    assert_eq!(first, json!({"type": "room", "key": r1, "name": "general"}));
    assert_eq!(second, json!({"type": "error", "message": "internal server error"}));
    assert_eq!(live["type"], "chat");
    assert_eq!(live["username"], "bob");
    assert_eq!(live["body"], "hi");

    server.stop().await;
}

#[tokio::test]
async fn test_client_supplied_identity_is_overwritten() {
    // テスト項目: クライアントが送ったユーザー名・名前・ルームキー・時刻は上書きされる
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let bob = TestUser::sign_in(&server, "bob", "Bob").await;
    let r1 = alice.create_room(&server, "general").await;
    alice.enter_room(&server, &r1).await;
    bob.enter_room(&server, &r1).await;
    let mut c1 = alice.join(&server).await;
    let mut c2 = bob.join(&server).await;

    // when (操作):
    let forged = json!({
        "username": "bob",
        "firstName": "Bob",
        "roomKey": "somewhere-else",
        "body": "trust me",
        "timestamp": 1
    });
    c1.send(tungstenite::Message::text(forged.to_string()))
        .await
        .unwrap();
    let received = next_frame(&mut c2).await;

    // then (期待する結果):
    assert_eq!(received["username"], "alice");
    assert_eq!(received["firstName"], "Alice");
    assert_eq!(received["roomKey"], r1.as_str());
    assert_eq!(received["body"], "trust me");
    assert_ne!(received["timestamp"], 1);

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_frames_are_skipped() {
    // テスト項目: デコードできないフレームや空の本文は無視され、接続は続く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let r1 = alice.create_room(&server, "general").await;
    alice.enter_room(&server, &r1).await;
    let mut c1 = alice.join(&server).await;

    // when (操作):
    c1.send(tungstenite::Message::text("not json".to_string())).await.unwrap();
    send_body(&mut c1, "   ").await;
    send_body(&mut c1, "valid").await;

    // then (期待する結果):
    assert_eq!(next_frame(&mut c1).await["body"], "valid");

    server.stop().await;
}

#[tokio::test]
async fn test_websocket_rejected_before_upgrade() {
    // テスト項目: セッションなしは 401、ルーム未選択は 400 でアップグレード前に拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let anonymous = TestUser {
        http: reqwest::Client::new(),
        cookie: "chatterfly-cookie=session-unknown".to_string(),
    };

    // when (操作):
    let no_session = anonymous.connect(&server).await;
    let no_room = alice.connect(&server).await;

    // then (期待する結果):
    match no_session {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected 401, got {:?}", other.map(|_| ())),
    }
    match no_room {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 400),
        other => panic!("expected 400, got {:?}", other.map(|_| ())),
    }

    server.stop().await;
}

#[tokio::test]
async fn test_joining_adds_room_to_membership() {
    // テスト項目: 他人が作ったルームに参加すると、自分のメンバーシップに追加される
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let bob = TestUser::sign_in(&server, "bob", "Bob").await;
    let r1 = alice.create_room(&server, "general").await;
    bob.enter_room(&server, &r1).await;

    // when (操作):
    let _c2 = bob.join(&server).await;

    // then (期待する結果):
    let mut rooms = Vec::new();
    for _ in 0..50 {
        let profile: Value = bob.profile(&server).await.json().await.unwrap();
        rooms = profile["rooms"].as_array().unwrap().clone();
        if !rooms.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(rooms, vec![json!({"key": r1, "name": "general"})]);

    server.stop().await;
}

#[tokio::test]
async fn test_sign_out_invalidates_session() {
    // テスト項目: サインアウト後はプロフィールを取得できない
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    assert_eq!(alice.profile(&server).await.status(), reqwest::StatusCode::OK);

    // when (操作):
    let response = alice
        .http
        .delete(server.url("/api/sessions"))
        .header(reqwest::header::COOKIE, &alice.cookie)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    assert_eq!(
        alice.profile(&server).await.status(),
        reqwest::StatusCode::UNAUTHORIZED
    );

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_live_connections() {
    // テスト項目: サーバー停止時に接続中のクライアントへ Close フレームが送られる
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestUser::sign_in(&server, "alice", "Alice").await;
    let r1 = alice.create_room(&server, "general").await;
    alice.enter_room(&server, &r1).await;
    let mut c1 = alice.join(&server).await;

    // when (操作):
    server.stop().await;

    // then (期待する結果):
    let next = tokio::time::timeout(FRAME_TIMEOUT, c1.next())
        .await
        .expect("connection was not closed");
    assert!(matches!(
        next,
        None | Some(Ok(tungstenite::Message::Close(_))) | Some(Err(_))
    ));
}
