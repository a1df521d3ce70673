use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use std::fmt;
use utoipa::ToSchema;

// --- Modelos de domínio (mapeados para o banco) ---

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// Etiqueta livre de tipo; o formulário atual não a expõe.
    pub tipo: String,
    pub value: f64,
    pub status: PipelineStatus,
    /// UTC, gravado uma única vez na criação.
    pub created_at: NaiveDateTime,
    pub user_id: i64,
}

/// Etapas do pipeline de vendas. A coluna `status` guarda exatamente
/// estes nomes; qualquer outro valor é rejeitado na escrita e no CHECK
/// do esquema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Lead,
    Qualificado,
    Proposta,
    Negociacao,
    Fechado,
}

impl PipelineStatus {
    /// Etapas na ordem do funil.
    pub const ALL: [PipelineStatus; 5] = [
        PipelineStatus::Lead,
        PipelineStatus::Qualificado,
        PipelineStatus::Proposta,
        PipelineStatus::Negociacao,
        PipelineStatus::Fechado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Lead => "Lead",
            PipelineStatus::Qualificado => "Qualificado",
            PipelineStatus::Proposta => "Proposta",
            PipelineStatus::Negociacao => "Negociacao",
            PipelineStatus::Fechado => "Fechado",
        }
    }

    /// Correspondência exata, sensível a maiúsculas.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Armazenado como TEXT no SQLite; os impls manuais deixam o mapeamento
// explícito em vez de depender do derive.

impl sqlx::Type<sqlx::Sqlite> for PipelineStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <&str as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for PipelineStatus {
    fn encode_by_ref(
        &self,
        args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> sqlx::encode::IsNull {
        args.push(sqlx::sqlite::SqliteArgumentValue::Text(Cow::Borrowed(
            self.as_str(),
        )));
        sqlx::encode::IsNull::No
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for PipelineStatus {
    fn decode(
        value: sqlx::sqlite::SqliteValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let texto = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        PipelineStatus::parse(texto)
            .ok_or_else(|| format!("status de pipeline desconhecido: {texto}").into())
    }
}

// --- DTOs de requisição ---

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NovoClienteForm {
    pub name: String,
    pub phone: String,
    pub value: Option<String>,
}

impl NovoClienteForm {
    /// Política de coerção do valor monetário: campo ausente, não numérico
    /// ou negativo vira 0.0 em vez de rejeitar o formulário.
    pub fn valor(&self) -> f64 {
        self.value
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| *v >= 0.0)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateKanbanRequest {
    pub client_id: i64,
    pub new_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KanbanResponse {
    pub success: bool,
}

// Claims do JWT de sessão
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Id do usuário dono da sessão.
    pub sub: String,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(value: Option<&str>) -> NovoClienteForm {
        NovoClienteForm {
            name: "Maria".to_string(),
            phone: "11 99999-0000".to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn valor_aceita_numero_valido() {
        assert_eq!(form(Some("123.45")).valor(), 123.45);
        assert_eq!(form(Some(" 10 ")).valor(), 10.0);
    }

    #[test]
    fn valor_coage_entrada_invalida_para_zero() {
        assert_eq!(form(Some("abc")).valor(), 0.0);
        assert_eq!(form(Some("")).valor(), 0.0);
        assert_eq!(form(None).valor(), 0.0);
    }

    #[test]
    fn valor_coage_negativo_para_zero() {
        assert_eq!(form(Some("-5")).valor(), 0.0);
    }

    #[test]
    fn parse_de_status_e_exato() {
        assert_eq!(
            PipelineStatus::parse("Fechado"),
            Some(PipelineStatus::Fechado)
        );
        assert_eq!(PipelineStatus::parse("fechado"), None);
        assert_eq!(PipelineStatus::parse("Novo"), None);
    }
}
