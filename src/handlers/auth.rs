use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Form, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use rand_core::OsRng;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    handlers::pagina,
    middleware::CurrentUser,
    models::{LoginForm, RegisterForm, User},
    session, views,
};

/// GET /: envia cada um para onde pertence.
pub async fn home(user: Option<CurrentUser>) -> Redirect {
    match user {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

/// GET /register
pub async fn register_form(headers: HeaderMap) -> Response {
    let flash = session::take_flash(&headers);
    let html = views::register_page(flash.as_deref());
    pagina(html, flash.is_some())
}

/// POST /register
pub async fn register(
    State(pool): State<SqlitePool>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    // 1. Email já cadastrado volta para o formulário com aviso
    let existente = sqlx::query("SELECT 1 FROM users WHERE email = ?")
        .bind(&form.email)
        .fetch_optional(&pool)
        .await?;

    if existente.is_some() {
        return Ok(session::flash_redirect(
            "/register",
            &AppError::DuplicateEmail.to_string(),
        ));
    }

    // 2. Hash da senha
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(form.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .to_string();

    // 3. Inserir usuário
    sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
        .bind(&form.email)
        .bind(&password_hash)
        .execute(&pool)
        .await?;

    Ok(session::flash_redirect("/login", "Conta criada! Faça login."))
}

/// GET /login
pub async fn login_form(headers: HeaderMap) -> Response {
    let flash = session::take_flash(&headers);
    let html = views::login_page(flash.as_deref());
    pagina(html, flash.is_some())
}

/// POST /login
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    // 1. Buscar usuário pelo email
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&form.email)
        .fetch_optional(&pool)
        .await?;

    // 2. Verificar a senha contra o hash armazenado
    let user = match user {
        Some(user) if verifica_senha(&form.password, &user.password_hash) => user,
        _ => {
            return Ok(session::flash_redirect(
                "/login",
                &AppError::InvalidCredentials.to_string(),
            ))
        }
    };

    // 3. Abrir sessão e seguir para o dashboard
    let token = session::issue_session(user.id, &config.secret_key)?;
    let resposta = (
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Redirect::to("/dashboard"),
    );

    Ok(resposta.into_response())
}

/// GET /logout
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

fn verifica_senha(senha: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(senha.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
