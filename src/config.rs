use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuração da aplicação, carregada do ambiente.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URL de conexão com o banco (DATABASE_URL).
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Segredo usado para assinar o cookie de sessão (SECRET_KEY).
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

fn default_database_url() -> String {
    "sqlite://crm.db".to_string()
}

fn default_secret_key() -> String {
    "dev_key_123".to_string()
}

impl Config {
    /// Carrega a configuração:
    /// 1. Lê o arquivo .env, se existir
    /// 2. Desserializa as variáveis de ambiente
    /// 3. Normaliza o esquema da DATABASE_URL
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let mut config = envy::from_env::<Config>()?;
        config.database_url = normalize_database_url(config.database_url);

        Ok(config)
    }
}

/// Plataformas de deploy ainda entregam URLs com o esquema antigo
/// `postgres://`; os drivers esperam `postgresql://`.
pub fn normalize_database_url(url: String) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{rest}"),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rewrites_postgres_scheme() {
        let url = "postgres://user:pw@host:5432/crm".to_string();
        assert_eq!(
            normalize_database_url(url),
            "postgresql://user:pw@host:5432/crm"
        );
    }

    #[test]
    fn normalize_leaves_other_schemes_alone() {
        let sqlite = "sqlite://crm.db".to_string();
        assert_eq!(normalize_database_url(sqlite.clone()), sqlite);

        let already = "postgresql://host/crm".to_string();
        assert_eq!(normalize_database_url(already.clone()), already);
    }
}
