use folha_llm::Message;

/// Terminal rendering of one log entry with its sender label
pub fn render_message(message: &Message) -> String {
    match message {
        Message::Human { content } => format!("Usuário: {}", content),
        Message::AI {
            name: Some(name),
            content,
            ..
        } => format!("Sistema ({}): {}", name, content),
        Message::AI {
            content,
            tool_calls,
            ..
        } => {
            let mut out = format!("Assistente: {}", content);
            if !tool_calls.is_empty() {
                let calls = serde_json::to_string_pretty(tool_calls)
                    .unwrap_or_else(|_| format!("{:?}", tool_calls));
                if !content.is_empty() {
                    out.push('\n');
                }
                out.push_str(&format!("Chamando ferramentas:\n{}", calls));
            }
            out
        }
        Message::Tool {
            content,
            tool_call_id,
            name,
        } => format!("Ferramenta ({}) [{}]:\n{}", name, tool_call_id, content),
    }
}
