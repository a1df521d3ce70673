pub mod auth;
pub mod clients;

use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::session;

/// Responde uma página HTML. Quando uma mensagem de flash foi consumida
/// na renderização, devolve junto o cookie que a apaga.
pub(crate) fn pagina(html: String, tinha_flash: bool) -> Response {
    if tinha_flash {
        ([(header::SET_COOKIE, session::clear_flash_cookie())], Html(html)).into_response()
    } else {
        Html(html).into_response()
    }
}
