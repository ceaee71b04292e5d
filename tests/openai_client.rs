//! OpenAI client tests against a mock HTTP server

use cooking_assistant_api::assistant::{AssistantError, ChatMessage, ChatModel, ChatRequest};
use cooking_assistant_api::config::OpenAiSettings;
use cooking_assistant_api::infrastructure::OpenAiClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(&OpenAiSettings {
        api_key: "sk-test".to_string(),
        model: "gpt-4o".to_string(),
        vision_model: "gpt-4o".to_string(),
        api_base: server.uri(),
    })
    .expect("client builds")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

#[tokio::test]
async fn json_mode_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 150,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": "Classify" },
                { "role": "user", "content": "I bought eggs" }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"action":"general_conversation"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![
        ChatMessage::system("Classify"),
        ChatMessage::user("I bought eggs"),
    ])
    .max_tokens(150)
    .json();

    let content = client(&server).complete(request).await.expect("completion");
    assert_eq!(content, r#"{"action":"general_conversation"}"#);
}

#[tokio::test]
async fn model_override_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![ChatMessage::user("hi")]).model("gpt-4o-mini");
    assert_eq!(client(&server).complete(request).await.unwrap(), "ok");
}

#[tokio::test]
async fn http_error_becomes_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    match err {
        AssistantError::Llm(message) => assert!(message.contains("rate limited")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = client(&server)
        .complete(ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await;

    assert!(matches!(result, Err(AssistantError::Llm(_))));
}
