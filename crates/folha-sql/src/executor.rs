use crate::schema::{query_tool, QUERY_TOOL_NAME};
use crate::source::{DataSource, SourceError, SqliteFile};
use folha_llm::Tool;
use rusqlite::types::ValueRef;
use std::path::PathBuf;
use std::sync::Arc;

pub const SECURITY_VIOLATION: &str = "Erro: Esta ferramenta só pode executar consultas SELECT.";
pub const NO_RESULTS: &str = "Nenhum resultado encontrado para a consulta.";
pub const DEFAULT_MAX_ROWS: usize = 15;

/// Read-only query tool over the payroll database
///
/// [`SqlQueryTool::execute`] never fails: every outcome, including refused
/// statements and database errors, is rendered as text for the responder.
#[derive(Clone)]
pub struct SqlQueryTool {
    source: Arc<dyn DataSource>,
    max_rows: usize,
}

impl SqlQueryTool {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Tool backed by a SQLite file
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(SqliteFile::new(path)))
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn name(&self) -> &'static str {
        QUERY_TOOL_NAME
    }

    pub fn definition(&self) -> Tool {
        query_tool()
    }

    /// Run one statement and format its outcome
    pub fn execute(&self, query: &str) -> String {
        tracing::info!("Query tool received SQL: {}", query);

        if !is_read_only(query) {
            tracing::warn!("Refused non-SELECT statement");
            return SECURITY_VIOLATION.to_string();
        }

        match self.run(query) {
            Ok(output) => output,
            Err(SourceError::Unavailable(path)) => {
                tracing::error!("Database '{}' is unavailable", path);
                format!(
                    "Erro: Arquivo do banco de dados '{}' não encontrado. Execute 'folha-init-db' primeiro.",
                    path
                )
            }
            Err(SourceError::Query(e)) => {
                tracing::error!("SQL error: {} while running '{}'", e, query);
                format!(
                    "Erro ao executar a consulta SQL: {}. Verifique a sintaxe da sua consulta e os nomes das tabelas/colunas.",
                    e
                )
            }
        }
    }

    // The connection is dropped, and so closed, on every return path.
    fn run(&self, query: &str) -> Result<String, SourceError> {
        let conn = self.source.open()?;
        let mut stmt = conn.prepare(query)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query([])?;
        let mut rendered = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(render_value(row.get_ref(idx)?));
            }
            rendered.push(cells.join(" | "));
        }

        if rendered.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(format_table(&columns, &rendered, self.max_rows))
    }
}

/// Only statements starting with SELECT (ignoring case and surrounding whitespace) may run
pub fn is_read_only(query: &str) -> bool {
    query.trim().to_uppercase().starts_with("SELECT")
}

fn format_table(columns: &[String], rows: &[String], max_rows: usize) -> String {
    let mut output = format!(
        "Resultados da consulta ({} encontrados):\n{}\n",
        rows.len(),
        columns.join(" | ")
    );
    output.push_str(&rows[..rows.len().min(max_rows)].join("\n"));
    if rows.len() > max_rows {
        output.push_str(&format!(
            "\n... (mais {} resultados omitidos)",
            rows.len() - max_rows
        ));
    }
    output
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => render_real(f),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
    }
}

/// Shortest round-trip form; scientific below 1e-4 and from 1e16 up, with a
/// signed two-digit exponent (`1e+16`, `1.5e-05`)
fn render_real(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return f.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", f);
        return match sci.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => sci,
        };
    }

    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
