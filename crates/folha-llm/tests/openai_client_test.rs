use folha_llm::{ChatClient, ChatOptions, ChatRequest, Message, OpenAIClient, Tool};
use mockito::Matcher;
use serde_json::json;

fn request() -> ChatRequest {
    ChatRequest::new("llama-3.1-8b-instant", vec![Message::human("Quantos servidores estão ativos?")])
        .with_system("Você é um assistente de Folha de Pagamento")
        .with_options(ChatOptions::new().temperature(0.2).tools(vec![Tool::new(
            "query_folha_database",
            "Consulta SELECT",
            json!({"type": "object"}),
        )]))
}

#[tokio::test]
async fn test_chat_parses_tool_calls() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer gsk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.1-8b-instant",
            "stream": false,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1,
                "model": "llama-3.1-8b-instant",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {
                                "name": "query_folha_database",
                                "arguments": "{\"sql_query\": \"SELECT COUNT(*) FROM tb_servidores\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAIClient::new("gsk-test").unwrap().with_base_url(server.url());
    let response = client.chat(request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, None);
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].id, "call_abc");
    assert_eq!(
        response.tool_calls[0].str_argument("sql_query"),
        Some("SELECT COUNT(*) FROM tb_servidores")
    );
    assert_eq!(response.finish_reason.as_deref(), Some("tool_calls"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
}

#[tokio::test]
async fn test_chat_parses_text_reply() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Há 42 servidores ativos."},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAIClient::new("sk-test").unwrap().with_base_url(server.url());
    let message = client.chat(request()).await.unwrap().into_message();

    assert_eq!(message, Message::ai("Há 42 servidores ativos."));
}

#[tokio::test]
async fn test_chat_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limit reached")
        .create_async()
        .await;

    let client = OpenAIClient::new("sk-test").unwrap().with_base_url(server.url());
    let error = client.chat(request()).await.unwrap_err().to_string();

    assert!(error.contains("429"));
    assert!(error.contains("rate limit reached"));
}

#[tokio::test]
async fn test_chat_without_choices_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;

    let client = OpenAIClient::new("sk-test").unwrap().with_base_url(server.url());
    assert!(client.chat(request()).await.is_err());
}
