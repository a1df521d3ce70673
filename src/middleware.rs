use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;

use crate::{config::Config, error::AppError, models::User, session};

/// Usuário autenticado para rotas de página. Sessão ausente ou inválida
/// redireciona para /login em vez de responder com erro.
pub struct CurrentUser(pub User);

/// Usuário autenticado para a rota de API. Sessão ausente ou inválida
/// responde 401 com corpo JSON.
pub struct ApiUser(pub User);

async fn authenticate<S>(parts: &Parts, state: &S) -> Result<User, AppError>
where
    SqlitePool: FromRef<S>,
    Config: FromRef<S>,
    S: Send + Sync,
{
    // 1. Token de sessão no cookie
    let token = session::session_token(&parts.headers).ok_or(AppError::Unauthenticated)?;

    // 2. Assinatura e expiração válidas
    let config = Config::from_ref(state);
    let user_id =
        session::verify_session(token, &config.secret_key).ok_or(AppError::Unauthenticated)?;

    // 3. A sessão só vale se o usuário ainda existir
    let pool = SqlitePool::from_ref(state);
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?;

    user.ok_or(AppError::Unauthenticated)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    SqlitePool: FromRef<S>,
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AppError::Unauthenticated) => Err(Redirect::to("/login").into_response()),
            Err(outro) => Err(outro.into_response()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ApiUser
where
    SqlitePool: FromRef<S>,
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(ApiUser)
    }
}
