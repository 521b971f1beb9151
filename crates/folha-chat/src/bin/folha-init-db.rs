use anyhow::Context;
use folha_chat::{config::Config, logging::init_logging};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    let db = &config.database;
    folha_sql::create_database(&db.path, &db.script)?;

    println!(
        "Banco de dados '{}' criado e populado com os dados de '{}'.",
        db.path.display(),
        db.script.display()
    );
    Ok(())
}
