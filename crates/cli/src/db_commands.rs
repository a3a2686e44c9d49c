use {clap::Subcommand, drape_config::DrapeConfig, sqlx::SqlitePool, tracing::debug};

#[derive(Subcommand)]
pub enum DbAction {
    /// Run all pending database migrations.
    Migrate,
}

pub async fn handle_db(action: DbAction, config: &DrapeConfig) -> anyhow::Result<()> {
    match action {
        DbAction::Migrate => {
            connect(config).await?;
            println!("Migrations applied to {}", config.database.url);
            Ok(())
        },
    }
}

/// Open the configured database and bring its schema up to date.
pub async fn connect(config: &DrapeConfig) -> anyhow::Result<SqlitePool> {
    debug!(url = %config.database.url, "opening database");
    let pool = SqlitePool::connect(&config.database.url).await?;
    drape_sessions::run_migrations(&pool).await?;
    Ok(pool)
}
