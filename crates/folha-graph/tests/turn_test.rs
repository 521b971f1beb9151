use folha_graph::{
    ConversationState, Graph, GraphConfig, GraphError, MentionRouter, Message, Node, NodeType,
    ResponderConfig, Route, Router, Session, HOP_LIMIT_MESSAGE, HOP_LIMIT_NAME, HOP_LIMIT_TOOL_RESULT,
};
use folha_llm::{ChatResponse, ScriptedClient, ToolCall};
use folha_sql::{create_database, SqlQueryTool, SECURITY_VIOLATION};
use serde_json::{json, Map};
use std::sync::Arc;

const SEED: &str = "
INSERT INTO tb_servidores (nome, cpf, matricula, orgao, cargo) VALUES
    ('Servidor 1', '***.111.111-**', 'M001', 'Secretaria da Fazenda', 'Auditor'),
    ('Servidor 2', '***.222.222-**', 'M002', 'Secretaria da Saúde', 'Enfermeiro'),
    ('Servidor 3', '***.333.333-**', 'M003', 'Secretaria da Saúde', 'Médico');
";

struct Fixture {
    _dir: tempfile::TempDir,
    groq: Arc<ScriptedClient>,
    openai: Arc<ScriptedClient>,
    graph: Graph,
}

fn fixture(groq: ScriptedClient, openai: ScriptedClient, max_hops: usize) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("folha_pagamento.db");
    let script = dir.path().join("criacao_banco.sql");
    std::fs::write(&script, SEED).unwrap();
    create_database(&db, &script).unwrap();

    let groq = Arc::new(groq);
    let openai = Arc::new(openai);
    let graph = Graph::builder()
        .sql_tool(SqlQueryTool::sqlite(&db))
        .responder_a(groq.clone(), ResponderConfig::groq())
        .responder_b(openai.clone(), ResponderConfig::openai())
        .max_hops(max_hops)
        .build()
        .unwrap();

    Fixture {
        _dir: dir,
        groq,
        openai,
        graph,
    }
}

fn query_call(id: &str, sql: &str) -> ToolCall {
    let mut args = Map::new();
    args.insert("sql_query".into(), json!(sql));
    ToolCall::new(id, "query_folha_database", args)
}

#[tokio::test]
async fn test_full_turn_alternates_between_responders() {
    let count = query_call("call_1", "SELECT COUNT(*) FROM tb_servidores");
    let f = fixture(
        ScriptedClient::new().reply(ChatResponse::with_tool_calls(vec![count.clone()])),
        ScriptedClient::new().reply(ChatResponse::text("Há 3 servidores ativos.")),
        10,
    );

    let input = ConversationState::from_messages(vec![Message::human("Quantos servidores estão ativos?")]);
    let output = f.graph.invoke(input.clone()).await.unwrap();

    assert_eq!(&output.messages[..1], &input.messages[..]);
    assert_eq!(
        output.messages_since(input.len()),
        &[
            Message::ai_with_tools("", vec![count]),
            Message::tool_result(
                "call_1",
                "query_folha_database",
                "Resultados da consulta (1 encontrados):\nCOUNT(*)\n3"
            ),
            Message::ai("Há 3 servidores ativos."),
        ]
    );

    // B sees the whole log, tool result included
    let b_requests = f.openai.requests();
    assert_eq!(b_requests.len(), 1);
    assert_eq!(b_requests[0].messages.len(), 3);
    assert_eq!(b_requests[0].model, "gpt-3.5-turbo");
    assert_eq!(f.groq.requests().len(), 1);
}

#[tokio::test]
async fn test_mention_sends_first_hop_to_b() {
    let f = fixture(
        ScriptedClient::new(),
        ScriptedClient::new().reply(ChatResponse::text("Olá!")),
        10,
    );

    let input = ConversationState::from_messages(vec![Message::human("@OpenAI olá")]);
    let output = f.graph.invoke(input).await.unwrap();

    assert_eq!(output.messages_since(1), &[Message::ai("Olá!")]);
    assert!(f.groq.requests().is_empty());
}

#[tokio::test]
async fn test_responder_failure_ends_turn_with_named_message() {
    let f = fixture(
        ScriptedClient::new().fail("invalid api key"),
        ScriptedClient::new(),
        10,
    );

    let input = ConversationState::from_messages(vec![Message::human("Quantos servidores estão ativos?")]);
    let output = f.graph.invoke(input).await.unwrap();

    let delta = output.messages_since(1);
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].name(), Some("ErroGroq"));
    assert_eq!(
        delta[0].content(),
        "[ERRO INTERNO GROQ]: Não foi possível processar com Groq. Detalhe: invalid api key"
    );
    assert!(f.openai.requests().is_empty());
}

#[tokio::test]
async fn test_write_attempt_is_answered_by_tool_not_executed() {
    let f = fixture(
        ScriptedClient::new().reply(ChatResponse::with_tool_calls(vec![query_call(
            "call_1",
            "DELETE FROM tb_servidores",
        )])),
        ScriptedClient::new()
            .reply(ChatResponse::with_tool_calls(vec![query_call(
                "call_2",
                "SELECT COUNT(*) AS total FROM tb_servidores",
            )])),
        10,
    );
    // third responder hop: even count (2) goes back to A, which has nothing scripted
    let input = ConversationState::from_messages(vec![Message::human("Apague tudo")]);
    let output = f.graph.invoke(input).await.unwrap();

    let delta = output.messages_since(1);
    assert_eq!(delta[1].content(), SECURITY_VIOLATION);
    assert_eq!(delta[3].content(), "Resultados da consulta (1 encontrados):\ntotal\n3");
    assert_eq!(delta[4].name(), Some("ErroGroq"));
    assert_eq!(delta.len(), 5);
}

#[tokio::test]
async fn test_hop_ceiling_appends_fallback() {
    let f = fixture(
        ScriptedClient::new().reply(ChatResponse::with_tool_calls(vec![query_call("a1", "SELECT 1")])),
        ScriptedClient::new().reply(ChatResponse::with_tool_calls(vec![query_call("b1", "SELECT 2")])),
        3,
    );

    let input = ConversationState::from_messages(vec![Message::human("loop")]);
    let output = f.graph.invoke(input).await.unwrap();

    let delta = output.messages_since(1);
    assert_eq!(delta.len(), 5);
    assert_eq!(
        delta[3],
        Message::tool_result("b1", "query_folha_database", HOP_LIMIT_TOOL_RESULT)
    );
    assert_eq!(delta[4], Message::ai_error(HOP_LIMIT_MESSAGE, HOP_LIMIT_NAME));
}

#[tokio::test]
async fn test_hop_ceiling_answers_every_tool_call() {
    let f = fixture(
        ScriptedClient::new().reply(ChatResponse::with_tool_calls(vec![query_call("a1", "SELECT 1")])),
        ScriptedClient::new()
            .reply(ChatResponse::with_tool_calls(vec![
                query_call("b1", "SELECT 2"),
                query_call("b2", "SELECT 3"),
            ]))
            .reply(ChatResponse::text("Depois do limite.")),
        3,
    );
    let session = Session::new("thread-1");

    session.submit_human("loop");
    f.graph.run_turn(&session).await.unwrap();

    let log = session.snapshot().messages;
    let issued: Vec<&str> = log
        .iter()
        .flat_map(|m| m.tool_calls())
        .map(|call| call.id.as_str())
        .collect();
    assert_eq!(issued, vec!["a1", "b1", "b2"]);
    for id in issued {
        assert!(
            log.iter().any(|m| matches!(m, Message::Tool { tool_call_id, .. } if tool_call_id == id)),
            "tool call {} has no result",
            id
        );
    }

    // Three AI messages so far (fallback included): the next turn goes to B
    session.submit_human("e agora?");
    let delta = f.graph.run_turn(&session).await.unwrap();
    assert_eq!(delta, vec![Message::ai("Depois do limite.")]);
}

#[tokio::test]
async fn test_empty_log_returns_unchanged() {
    let f = fixture(ScriptedClient::new(), ScriptedClient::new(), 10);
    let output = f.graph.invoke(ConversationState::new()).await.unwrap();
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_routing_fault_propagates() {
    let f = fixture(ScriptedClient::new(), ScriptedClient::new(), 10);
    let input = ConversationState::from_messages(vec![
        Message::human("oi"),
        Message::tool_result("ghost", "query_folha_database", "?"),
    ]);

    let result = f.graph.invoke(input).await;
    assert!(matches!(result, Err(GraphError::Routing(_))));
}

#[tokio::test]
async fn test_run_turn_commits_delta_to_session() {
    let f = fixture(
        ScriptedClient::new().reply(ChatResponse::text("Olá, como posso ajudar?")),
        ScriptedClient::new().reply(ChatResponse::text("Ainda aqui.")),
        10,
    );
    let session = Session::new("thread-1");

    session.submit_human("oi");
    let delta = f.graph.run_turn(&session).await.unwrap();
    assert_eq!(delta, vec![Message::ai("Olá, como posso ajudar?")]);
    assert!(!session.is_busy());

    // one AI message so far: odd count goes to B
    session.submit_human("continua?");
    let delta = f.graph.run_turn(&session).await.unwrap();
    assert_eq!(delta, vec![Message::ai("Ainda aqui.")]);
    assert_eq!(session.snapshot().len(), 4);
}

#[tokio::test]
async fn test_run_turn_refuses_busy_session() {
    let f = fixture(ScriptedClient::new(), ScriptedClient::new(), 10);
    let session = Session::new("thread-1");
    session.submit_human("oi");

    let _guard = session.begin_turn().unwrap();
    let result = f.graph.run_turn(&session).await;
    assert!(matches!(result, Err(GraphError::SessionBusy(_))));
}

#[tokio::test]
async fn test_run_turn_releases_guard_on_fault() {
    let f = fixture(ScriptedClient::new(), ScriptedClient::new(), 10);
    let session = Session::new("thread-1");
    {
        let guard = session.begin_turn().unwrap();
        guard.commit(ConversationState::from_messages(vec![Message::tool_result(
            "ghost",
            "query_folha_database",
            "?",
        )]));
    }

    assert!(f.graph.run_turn(&session).await.is_err());
    assert!(!session.is_busy());
}

/// Node answering with a fixed text
struct Canned(&'static str);

#[async_trait::async_trait]
impl Node for Canned {
    async fn execute(&self, _state: &ConversationState) -> folha_graph::GraphResult<Vec<Message>> {
        Ok(vec![Message::ai(self.0)])
    }

    fn node_type(&self) -> NodeType {
        NodeType::Responder
    }
}

#[tokio::test]
async fn test_custom_nodes_plug_into_builder() {
    let graph = Graph::builder()
        .sql_tool(SqlQueryTool::sqlite("/nonexistent/folha.db"))
        .responder_a_node(Arc::new(Canned("de A")))
        .responder_b_node(Arc::new(Canned("de B")))
        .build()
        .unwrap();

    let state = ConversationState::from_messages(vec![
        Message::human("oi"),
        Message::ai("primeira"),
        Message::human("de novo"),
    ]);
    let output = graph.invoke(state).await.unwrap();
    assert_eq!(output.last_message(), Some(&Message::ai("de B")));
}

/// Faults on any log whose last human input mentions "quebra"
struct FaultyRouter(MentionRouter);

impl Router for FaultyRouter {
    fn next(&self, state: &ConversationState) -> folha_graph::GraphResult<Route> {
        match state.last_message() {
            Some(Message::Human { content }) if content.contains("quebra") => {
                Err(GraphError::Routing("quebra".to_string()))
            }
            _ => self.0.next(state),
        }
    }
}

#[tokio::test]
async fn test_failed_input_can_be_discarded_before_next_turn() {
    let graph = Graph::new(
        Arc::new(FaultyRouter(MentionRouter::default())),
        Arc::new(Canned("de A")),
        Arc::new(Canned("de B")),
        Arc::new(Canned("ferramenta")),
        GraphConfig::default(),
    );
    let session = Session::new("thread-1");

    session.submit_human("isto quebra");
    assert!(graph.run_turn(&session).await.is_err());
    assert!(session.awaiting_response());

    let dropped = session.discard_unanswered().unwrap();
    assert_eq!(dropped, vec![Message::human("isto quebra")]);

    session.submit_human("oi");
    let delta = graph.run_turn(&session).await.unwrap();
    assert_eq!(delta, vec![Message::ai("de A")]);
    assert_eq!(
        session.snapshot().messages,
        vec![Message::human("oi"), Message::ai("de A")]
    );
}
