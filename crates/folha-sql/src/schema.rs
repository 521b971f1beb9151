//! Payroll schema advertised to responders, and database bootstrap.

use anyhow::{Context, Result};
use folha_llm::Tool;
use rusqlite::Connection;
use std::path::Path;

pub const QUERY_TOOL_NAME: &str = "query_folha_database";
pub const QUERY_ARGUMENT: &str = "sql_query";

pub const QUERY_TOOL_DESCRIPTION: &str = "\
Executa uma consulta SQL SOMENTE do tipo SELECT no banco de dados de Folha de Pagamento SQLite e retorna os resultados.
Use esta ferramenta para obter informações sobre servidores ou remunerações.

Tabelas disponíveis:
1. tb_servidores (colunas: id, nome, cpf, matricula, orgao, cargo)
2. tb_folha_pagamento (colunas: id, matricula, competencia, vencimentos, descontos, liquido)
As tabelas se relacionam pela coluna matricula.

Importante: forneça APENAS consultas SQL `SELECT`. Não use `UPDATE`, `DELETE`, `INSERT` ou `DROP`.

Exemplos de consultas válidas:
SELECT nome, liquido, descontos, vencimentos FROM tb_servidores s JOIN tb_folha_pagamento f ON s.matricula = f.matricula WHERE orgao = 'Secretaria da Saúde';
SELECT competencia, vencimentos, descontos, liquido FROM tb_servidores s JOIN tb_folha_pagamento f ON f.matricula = s.matricula WHERE nome = 'Servidor 3' ORDER BY competencia DESC;
SELECT COUNT(DISTINCT f1.matricula) AS total_servidores_com_aumento FROM tb_folha_pagamento AS f1 WHERE f1.vencimentos > (SELECT f2.vencimentos FROM tb_folha_pagamento AS f2 WHERE f2.matricula = f1.matricula AND f2.competencia < f1.competencia ORDER BY f2.competencia DESC LIMIT 1);";

/// DDL for the two payroll tables
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tb_servidores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    cpf TEXT,
    matricula TEXT NOT NULL UNIQUE,
    orgao TEXT,
    cargo TEXT
);

CREATE TABLE IF NOT EXISTS tb_folha_pagamento (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    matricula TEXT NOT NULL REFERENCES tb_servidores(matricula),
    competencia TEXT NOT NULL,
    vencimentos REAL,
    descontos REAL,
    liquido REAL
);

CREATE INDEX IF NOT EXISTS idx_folha_matricula ON tb_folha_pagamento(matricula);
";

/// Capability description bound to every responder
pub fn query_tool() -> Tool {
    Tool::new(
        QUERY_TOOL_NAME,
        QUERY_TOOL_DESCRIPTION,
        serde_json::json!({
            "type": "object",
            "properties": {
                "sql_query": {
                    "type": "string",
                    "description": "Consulta SQL SELECT a ser executada"
                }
            },
            "required": ["sql_query"]
        }),
    )
}

/// Build the payroll database at `db_path` from a SQL script
///
/// Any previous file is removed first. The script runs after [`SCHEMA`], so it
/// may either only insert rows or recreate the tables itself.
pub fn create_database(db_path: impl AsRef<Path>, script_path: impl AsRef<Path>) -> Result<()> {
    let db_path = db_path.as_ref();
    let script_path = script_path.as_ref();

    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("SQL script '{}' not found", script_path.display()))?;

    if db_path.exists() {
        std::fs::remove_file(db_path).with_context(|| {
            format!(
                "Permission denied removing '{}'; close any program using the database",
                db_path.display()
            )
        })?;
        tracing::info!("Removed previous database '{}'", db_path.display());
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to create database '{}'", db_path.display()))?;
    conn.execute_batch(SCHEMA).context("Failed to create payroll schema")?;
    conn.execute_batch(&script)
        .with_context(|| format!("Failed to run SQL script '{}'", script_path.display()))?;

    tracing::info!(
        "Database '{}' created from '{}'",
        db_path.display(),
        script_path.display()
    );
    Ok(())
}
