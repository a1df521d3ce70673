//! Sessão assinada em cookie e mensagens flash de uma exibição.
//!
//! A sessão é um JWT HS256 com o id do usuário em `sub`, assinado com o
//! SECRET_KEY e carregado num cookie HttpOnly. Nada de sessão é
//! persistido no banco.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppError;
use crate::models::Claims;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

const SESSION_TTL_SECS: usize = 60 * 60 * 24;

/// Emite o token de sessão para o usuário autenticado.
pub fn issue_session(user_id: i64, secret: &str) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as usize
        + SESSION_TTL_SECS;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("falha ao assinar sessão: {e}")))
}

/// Valida o token e devolve o id do usuário. Qualquer problema
/// (assinatura, expiração, sub não numérico) é tratado como sessão ausente.
pub fn verify_session(token: &str, secret: &str) -> Option<i64> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    data.claims.sub.parse().ok()
}

/// Busca um cookie pelo nome no cabeçalho Cookie.
pub fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|par| {
        let (chave, valor) = par.split_once('=')?;
        (chave == name).then_some(valor)
    })
}

pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    cookie_value(headers, SESSION_COOKIE)
}

// Os valores abaixo são ASCII por construção (JWT e base64), então o
// from_str não falha.

pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .expect("valor de cookie é ASCII")
}

pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
    .expect("valor de cookie é ASCII")
}

/// A mensagem flash vai em base64 para caber com segurança num cookie
/// (acentos e espaços inclusos).
pub fn flash_cookie(mensagem: &str) -> HeaderValue {
    let codificada = URL_SAFE_NO_PAD.encode(mensagem.as_bytes());
    HeaderValue::from_str(&format!("{FLASH_COOKIE}={codificada}; Path=/; SameSite=Lax"))
        .expect("valor de cookie é ASCII")
}

pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!("{FLASH_COOKIE}=; Path=/; SameSite=Lax; Max-Age=0"))
        .expect("valor de cookie é ASCII")
}

/// Lê a mensagem flash pendente, se houver. Cookie corrompido é ignorado.
pub fn take_flash(headers: &HeaderMap) -> Option<String> {
    let codificada = cookie_value(headers, FLASH_COOKIE)?;
    let bytes = URL_SAFE_NO_PAD.decode(codificada).ok()?;
    String::from_utf8(bytes).ok()
}

/// Redireciona gravando uma mensagem flash para a próxima página.
pub fn flash_redirect(destino: &str, mensagem: &str) -> Response {
    let mut resposta = Redirect::to(destino).into_response();
    resposta
        .headers_mut()
        .append(header::SET_COOKIE, flash_cookie(mensagem));
    resposta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessao_emitida_e_verificada() {
        let token = issue_session(42, "segredo").unwrap();
        assert_eq!(verify_session(&token, "segredo"), Some(42));
    }

    #[test]
    fn sessao_com_segredo_errado_e_rejeitada() {
        let token = issue_session(42, "segredo").unwrap();
        assert_eq!(verify_session(&token, "outro"), None);
    }

    #[test]
    fn sessao_expirada_e_rejeitada() {
        let agora = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "42".to_string(),
            // Além da folga padrão de validação.
            exp: agora - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"segredo"),
        )
        .unwrap();

        assert_eq!(verify_session(&token, "segredo"), None);
    }

    #[test]
    fn cookie_value_encontra_pelo_nome() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("a=1; session=abc.def.ghi; flash=xyz"),
        );

        assert_eq!(session_token(&headers), Some("abc.def.ghi"));
        assert_eq!(cookie_value(&headers, "flash"), Some("xyz"));
        assert_eq!(cookie_value(&headers, "nada"), None);
    }

    #[test]
    fn flash_sobrevive_a_ida_e_volta_com_acentos() {
        let mensagem = "Conta criada! Faça login.";
        let cookie = flash_cookie(mensagem);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie_por_valor(&cookie));

        assert_eq!(take_flash(&headers).as_deref(), Some(mensagem));
    }

    #[test]
    fn flash_corrompido_e_ignorado() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=%%%"));
        assert_eq!(take_flash(&headers), None);
    }

    /// Converte um Set-Cookie em cabeçalho Cookie (nome=valor, sem atributos).
    fn cookie_por_valor(set_cookie: &HeaderValue) -> HeaderValue {
        let texto = set_cookie.to_str().unwrap();
        let par = texto.split(';').next().unwrap();
        HeaderValue::from_str(par).unwrap()
    }
}
