use axum::{
    extract::{Form, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::pagina,
    middleware::{ApiUser, CurrentUser},
    models::{Client, KanbanResponse, NovoClienteForm, PipelineStatus, UpdateKanbanRequest},
    pipeline::{resumo_por_status, FiltroClientes, Kpis, PeriodoFiltro},
    session, views,
};

#[derive(Debug, Deserialize)]
pub struct PeriodoParams {
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FiltroParams {
    pub filtro: Option<String>,
}

async fn clientes_do_usuario(pool: &SqlitePool, user_id: i64) -> Result<Vec<Client>, AppError> {
    let clientes =
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE user_id = ? ORDER BY id ASC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(clientes)
}

/// GET /dashboard
pub async fn dashboard(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PeriodoParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let todos = clientes_do_usuario(&pool, user.id).await?;

    // Período inválido ou incompleto desliga o filtro sem avisar
    let recorte: Vec<Client> =
        match PeriodoFiltro::parse(params.data_inicio.as_deref(), params.data_fim.as_deref()) {
            Some(periodo) => todos
                .into_iter()
                .filter(|c| periodo.contem(c.created_at))
                .collect(),
            None => todos,
        };

    let kpis = Kpis::from_clients(&recorte);

    let flash = session::take_flash(&headers);
    let html = views::dashboard_page(
        &user.email,
        &recorte,
        &kpis,
        params.data_inicio.as_deref().unwrap_or(""),
        params.data_fim.as_deref().unwrap_or(""),
        flash.as_deref(),
    );

    Ok(pagina(html, flash.is_some()))
}

/// POST /dashboard
pub async fn criar_cliente(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NovoClienteForm>,
) -> Result<Response, AppError> {
    // Nome ou telefone em branco: nada é criado, o redirect acontece igual
    if form.name.is_empty() || form.phone.is_empty() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    sqlx::query(
        "INSERT INTO clients (name, phone, value, status, created_at, user_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&form.name)
    .bind(&form.phone)
    .bind(form.valor())
    .bind(PipelineStatus::Lead)
    .bind(Utc::now().naive_utc())
    .bind(user.id)
    .execute(&pool)
    .await?;

    Ok(session::flash_redirect(
        "/dashboard",
        "Cliente adicionado com sucesso!",
    ))
}

/// GET /oportunidades
pub async fn oportunidades(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let clientes = clientes_do_usuario(&pool, user.id).await?;
    let resumo = resumo_por_status(&clientes);

    let flash = session::take_flash(&headers);
    let html = views::oportunidades_page(&user.email, &resumo, flash.as_deref());

    Ok(pagina(html, flash.is_some()))
}

/// GET /clientes?filtro=...
pub async fn clientes(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FiltroParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let todos = clientes_do_usuario(&pool, user.id).await?;

    let filtro = FiltroClientes::parse(params.filtro.as_deref());
    let selecionados: Vec<Client> = todos
        .into_iter()
        .filter(|c| filtro.aceita(c.status))
        .collect();

    let flash = session::take_flash(&headers);
    let html = views::clientes_page(
        &user.email,
        &selecionados,
        params.filtro.as_deref().unwrap_or("Todos"),
        flash.as_deref(),
    );

    Ok(pagina(html, flash.is_some()))
}

/// GET /update_status/:id/:new_status, rota legada mantida por compatibilidade.
pub async fn update_status(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path((id, new_status)): Path<(i64, String)>,
) -> Result<Response, AppError> {
    // 1. Id inexistente é 404
    let cliente = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Cliente não encontrado".to_string()))?;

    // 2. Status fora do funil não grava nada
    let status = match PipelineStatus::parse(&new_status) {
        Some(status) => status,
        None => return Ok(session::flash_redirect("/dashboard", "Status inválido.")),
    };

    // 3. Cliente de outro usuário: redirect sem alteração e sem aviso
    if cliente.user_id != user.id {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    sqlx::query("UPDATE clients SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(session::flash_redirect(
        "/dashboard",
        &format!("Cliente movido para {}!", status.as_str()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/update_kanban",
    request_body = UpdateKanbanRequest,
    responses(
        (status = 200, description = "Status atualizado", body = KanbanResponse),
        (status = 400, description = "Status inválido"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn api_update_kanban(
    State(pool): State<SqlitePool>,
    ApiUser(user): ApiUser,
    Json(payload): Json<UpdateKanbanRequest>,
) -> Result<Json<KanbanResponse>, AppError> {
    let status = PipelineStatus::parse(&payload.new_status)
        .ok_or_else(|| AppError::Validation("Status inválido.".to_string()))?;

    let cliente = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
        .bind(payload.client_id)
        .fetch_optional(&pool)
        .await?;

    // Cliente de outro usuário responde como se não existisse
    match cliente {
        Some(cliente) if cliente.user_id == user.id => {
            sqlx::query("UPDATE clients SET status = ? WHERE id = ?")
                .bind(status)
                .bind(cliente.id)
                .execute(&pool)
                .await?;

            Ok(Json(KanbanResponse { success: true }))
        }
        _ => Err(AppError::NotFound("Cliente não encontrado".to_string())),
    }
}
