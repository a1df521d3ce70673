use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Migrações embutidas no binário (diretório ./migrations).
/// Os testes aplicam o mesmo migrador, para manter um único esquema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn establish_connection(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Cria as tabelas na inicialização, se ainda não existirem.
    MIGRATOR.run(&pool).await?;
    tracing::info!("migrações aplicadas");

    Ok(pool)
}
