use anyhow::Context;
use folha_chat::{app::build_graph, config::Config, logging::init_logging, render::render_message};
use folha_graph::SessionStore;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    if !config.database.path.exists() {
        tracing::warn!(
            "Database '{}' not found; run folha-init-db first",
            config.database.path.display()
        );
    }

    let graph = build_graph(&config)?;
    let sessions = SessionStore::new();
    let session = sessions.session(&uuid::Uuid::new_v4().to_string());
    tracing::info!("Chat session {} started", session.thread_id());

    println!("Conversa com a Folha de Pagamento");
    println!(
        "Mencione {} ou {} para escolher o assistente. Digite 'exit' para sair.",
        config.responders.a.mention, config.responders.b.mention
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        session.submit_human(line);

        // Queued inputs land in the log when a turn ends and need their own turn
        while session.awaiting_response() {
            match graph.run_turn(&session).await {
                Ok(delta) => {
                    for message in &delta {
                        println!("{}\n", render_message(message));
                    }
                }
                Err(e) => {
                    tracing::error!("Turn failed: {}", e);
                    println!("Erro inesperado: {}", e);
                    // Unanswered input would otherwise be folded into the next turn
                    match session.discard_unanswered() {
                        Ok(dropped) if !dropped.is_empty() => {
                            println!("A mensagem não foi registrada; envie-a novamente.\n")
                        }
                        Ok(_) => println!(),
                        Err(e) => tracing::warn!("Could not discard unanswered input: {}", e),
                    }
                    break;
                }
            }
        }
    }

    println!("Até logo!");
    Ok(())
}
