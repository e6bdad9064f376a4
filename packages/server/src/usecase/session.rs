//! UseCase: サインイン・サインアウト・プロフィール取得
//!
//! 認証は行わない（パスワードなし）。ユーザー名でユーザーを特定し、
//! 存在しなければ作成してセッションを発行します。

use std::sync::Arc;

use chatterfly_shared::time::Clock;

use crate::domain::{
    RepositoryError, Session, SessionId, SessionStore, Timestamp, User, UserStore, Username,
};

use super::error::SessionError;

/// セッション ID からセッションを引く
///
/// ID が無い、またはストアに存在しない場合は `Ok(None)`。
pub(super) async fn lookup_session(
    sessions: &dyn SessionStore,
    session_id: Option<&SessionId>,
) -> Result<Option<Session>, RepositoryError> {
    let Some(session_id) = session_id else {
        return Ok(None);
    };
    match sessions.get(session_id).await {
        Ok(session) => Ok(Some(session)),
        Err(RepositoryError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// サインインのユースケース
pub struct SignInUseCase {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl SignInUseCase {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            users,
            clock,
        }
    }

    /// サインインを実行
    ///
    /// 既存ユーザーの場合は保存済みの氏名を使う（引数の氏名は新規作成時のみ使われる）。
    pub async fn execute(
        &self,
        username: String,
        first_name: String,
        last_name: String,
    ) -> Result<(SessionId, Session), SessionError> {
        let username = Username::new(username)?;

        let user = match self.users.find(&username).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound(_)) => self.create_user(username, first_name, last_name).await?,
            Err(e) => return Err(e.into()),
        };

        let session = Session::new(user.username, user.first_name, user.last_name);
        let session_id = SessionId::generate();
        self.sessions.set(&session_id, session.clone()).await?;

        tracing::info!("User '{}' signed in", session.username);
        Ok((session_id, session))
    }

    async fn create_user(
        &self,
        username: Username,
        first_name: String,
        last_name: String,
    ) -> Result<User, SessionError> {
        let user = User::new(
            username.clone(),
            first_name.trim().to_string(),
            last_name.trim().to_string(),
            Timestamp::new(self.clock.now_millis()),
        );
        match self.users.create(user.clone()).await {
            Ok(()) => {
                tracing::info!("User '{}' created", username);
                Ok(user)
            }
            // 同名ユーザーが同時に作成された
            Err(RepositoryError::AlreadyExists(_)) => Ok(self.users.find(&username).await?),
            Err(e) => Err(e.into()),
        }
    }
}

/// サインアウトのユースケース
pub struct SignOutUseCase {
    sessions: Arc<dyn SessionStore>,
}

impl SignOutUseCase {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, session_id: Option<&SessionId>) -> Result<(), SessionError> {
        let session = lookup_session(self.sessions.as_ref(), session_id)
            .await?
            .ok_or(SessionError::Unauthenticated)?;
        if let Some(session_id) = session_id {
            self.sessions.delete(session_id).await?;
        }
        tracing::info!("User '{}' signed out", session.username);
        Ok(())
    }
}

/// ログイン中ユーザーのプロフィール取得
pub struct GetProfileUseCase {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl GetProfileUseCase {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    pub async fn execute(&self, session_id: Option<&SessionId>) -> Result<User, SessionError> {
        let session = lookup_session(self.sessions.as_ref(), session_id)
            .await?
            .ok_or(SessionError::Unauthenticated)?;
        match self.users.find(&session.username).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound(_)) => {
                Err(SessionError::UserNotFound(session.username.into_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
