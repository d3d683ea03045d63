mod common;
use common::{app_for, request_count};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, verb: &str, route: &str, response: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let request = requests.last().expect("one request");
    serde_json::from_slice(&request.body).expect("json body")
}

#[tokio::test]
async fn generate_sends_options_and_returns_the_text() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/generate",
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "The sky is blue.",
            "done": true,
            "eval_count": 6
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call(
            "ollama_generate",
            json!({
                "model": "llama3.2",
                "prompt": "Why is the sky blue?",
                "system": "Be brief.",
                "temperature": 0,
                "max_tokens": 64
            }),
        )
        .await;
    assert!(!outcome.is_error, "{}", outcome.text);
    assert_eq!(outcome.text, "The sky is blue.");
    assert_eq!(
        last_body(&server).await,
        json!({
            "model": "llama3.2",
            "prompt": "Why is the sky blue?",
            "system": "Be brief.",
            "stream": false,
            "options": {"temperature": 0.0, "num_predict": 64}
        })
    );
}

#[tokio::test]
async fn chat_returns_the_assistant_message() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/chat",
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "Hello!"},
            "done": true
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call(
            "ollama_chat",
            json!({
                "model": "llama3.2",
                "messages": [
                    {"role": "system", "content": "You are terse."},
                    {"role": "user", "content": "Hi"}
                ]
            }),
        )
        .await;
    assert_eq!(outcome.text, "Hello!");
    let body = last_body(&server).await;
    assert_eq!(body["messages"][1], json!({"role": "user", "content": "Hi"}));
    assert_eq!(body["stream"], false);
    assert!(body.get("options").is_none());
}

#[tokio::test]
async fn generate_inlines_image_files_as_base64() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/generate",
        ResponseTemplate::new(200).set_body_json(json!({"response": "a cat", "done": true})),
    )
    .await;
    let app = app_for(&server.uri());

    let image = std::env::temp_dir().join(format!("{}-cat.png", uuid::Uuid::new_v4()));
    std::fs::write(&image, b"hello").expect("write image");
    let outcome = app
        .tool_executor
        .call(
            "ollama_generate",
            json!({
                "model": "llava",
                "prompt": "What is this?",
                "images": [image.to_string_lossy(), "data:image/png;base64,iVBORw0KGgo="]
            }),
        )
        .await;
    let _ = std::fs::remove_file(&image);

    assert_eq!(outcome.text, "a cat");
    assert_eq!(last_body(&server).await["images"], json!(["aGVsbG8=", "iVBORw0KGgo="]));
}

#[tokio::test]
async fn not_found_maps_to_list_guidance() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/show",
        ResponseTemplate::new(404).set_body_json(json!({"error": "model 'ghost' not found"})),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_show", json!({"model": "ghost"})).await;
    assert!(outcome.is_error);
    assert_eq!(
        outcome.text,
        "Error: Model not found. Use ollama_list to see available models."
    );
    assert_eq!(last_body(&server).await, json!({"model": "ghost"}));
}

#[tokio::test]
async fn server_errors_do_not_leak_the_body() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/pull",
        ResponseTemplate::new(500).set_body_string("panic: out of memory at 0xdeadbeef"),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_pull", json!({"model": "llama3.2"})).await;
    assert_eq!(
        outcome.text,
        "Error: Ollama server error. Please check if the model is loaded correctly."
    );
    assert!(!outcome.text.contains("deadbeef"));
}

#[tokio::test]
async fn missing_response_field_is_a_shape_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/generate",
        ResponseTemplate::new(200).set_body_json(json!({"done": true, "secret_payload": "s3cr3t"})),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call("ollama_generate", json!({"model": "llama3.2", "prompt": "hi"}))
        .await;
    assert!(outcome.is_error);
    assert_eq!(
        outcome.text,
        "Error: Unexpected response from Ollama. The API may have changed."
    );
    assert!(!outcome.text.contains("s3cr3t"));
}

#[tokio::test]
async fn non_json_success_body_is_a_shape_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/tags",
        ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_list", json!({})).await;
    assert_eq!(
        outcome.text,
        "Error: Unexpected response from Ollama. The API may have changed."
    );
}

#[tokio::test]
async fn list_renders_models_in_backend_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/tags",
        ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "llama3.2:latest",
                    "size": 2_019_393_189u64,
                    "digest": "a80c4f17acd5",
                    "modified_at": "2024-10-01T12:00:00Z",
                    "details": {"family": "llama", "parameter_size": "3.2B"}
                },
                {
                    "name": "nomic-embed-text:latest",
                    "size": 274_302_450u64,
                    "digest": "0a109f422b47",
                    "modified_at": "2024-09-01T08:30:00Z"
                }
            ]
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_list", Value::Null).await;
    assert_eq!(
        outcome.text,
        "Available models:\n- llama3.2:latest (1.88 GB)\n- nomic-embed-text:latest (0.26 GB)"
    );
}

#[tokio::test]
async fn empty_list_suggests_pulling() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/tags",
        ResponseTemplate::new(200).set_body_json(json!({"models": []})),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_list", json!({})).await;
    assert_eq!(outcome.text, "No models found. Use ollama_pull to download a model.");
}

#[tokio::test]
async fn show_renders_only_documented_members() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/show",
        ResponseTemplate::new(200).set_body_json(json!({
            "modelfile": "FROM llama3.2",
            "parameters": "stop \"<|eot_id|>\"",
            "details": {"family": "llama"},
            "license": "very long license text"
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_show", json!({"model": "llama3.2"})).await;
    assert!(!outcome.is_error, "{}", outcome.text);
    let rendered: Value = serde_json::from_str(&outcome.text).expect("pretty json");
    assert_eq!(rendered["modelfile"], "FROM llama3.2");
    assert_eq!(rendered["details"]["family"], "llama");
    assert!(rendered.get("license").is_none());
    assert!(outcome.text.contains('\n'));
}

#[tokio::test]
async fn pull_reports_success_with_the_model_name() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/pull",
        ResponseTemplate::new(200).set_body_json(json!({"status": "success"})),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app.tool_executor.call("ollama_pull", json!({"model": "codellama:7b"})).await;
    assert_eq!(outcome.text, "Successfully pulled model: codellama:7b");
    assert_eq!(
        last_body(&server).await,
        json!({"model": "codellama:7b", "stream": false})
    );
}

#[tokio::test]
async fn embeddings_report_dimensions_and_exact_vectors() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/embed",
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "nomic-embed-text",
            "embeddings": [[0.125, -0.5, 0.75, 1.0]]
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call(
            "ollama_embeddings",
            json!({"model": "nomic-embed-text", "input": "hello world"}),
        )
        .await;
    assert!(!outcome.is_error, "{}", outcome.text);
    let rendered: Value = serde_json::from_str(&outcome.text).expect("pretty json");
    assert_eq!(rendered["dimensions"], 4);
    assert_eq!(rendered["model"], "nomic-embed-text");
    assert_eq!(rendered["embeddings"], json!([[0.125, -0.5, 0.75, 1.0]]));
    assert_eq!(
        last_body(&server).await,
        json!({"model": "nomic-embed-text", "input": "hello world"})
    );
}

#[tokio::test]
async fn batch_embeddings_send_the_array() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/embed",
        ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[0.1, 0.2], [0.3, 0.4]]})),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call(
            "ollama_embeddings",
            json!({"model": "nomic-embed-text", "input": ["a", "b"]}),
        )
        .await;
    let rendered: Value = serde_json::from_str(&outcome.text).expect("pretty json");
    assert_eq!(rendered["dimensions"], 2);
    assert_eq!(last_body(&server).await["input"], json!(["a", "b"]));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn embeddings_echo_full_precision_values() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/embed",
        ResponseTemplate::new(200).set_body_raw(
            r#"{"embeddings":[[0.18017933438838418,-0.5,0.75,1.0]]}"#,
            "application/json",
        ),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call(
            "ollama_embeddings",
            json!({"model": "nomic-embed-text", "input": "hello"}),
        )
        .await;
    assert!(!outcome.is_error, "{}", outcome.text);
    assert!(outcome.text.contains("0.18017933438838418"), "{}", outcome.text);
}

#[tokio::test]
async fn fractional_counters_are_a_shape_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/generate",
        ResponseTemplate::new(200).set_body_json(json!({
            "response": "hi",
            "done": true,
            "eval_count": 6.5
        })),
    )
    .await;
    let app = app_for(&server.uri());

    let outcome = app
        .tool_executor
        .call("ollama_generate", json!({"model": "llama3.2", "prompt": "hi"}))
        .await;
    assert_eq!(
        outcome.text,
        "Error: Unexpected response from Ollama. The API may have changed."
    );
}

#[tokio::test]
async fn execute_without_schema_returns_the_raw_value() {
    use ollama_mcp::services::config::BackendConfig;
    use ollama_mcp::services::endpoint::{EndpointCall, Operation};
    use ollama_mcp::services::logger::Logger;
    use ollama_mcp::services::ollama_client::OllamaClient;
    use std::sync::Arc;

    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/tags",
        ResponseTemplate::new(200).set_body_json(json!({"anything": [1, 2, 3]})),
    )
    .await;
    let config = Arc::new(BackendConfig::parse(&server.uri()).expect("config"));
    let client = OllamaClient::new(config, Logger::new("test")).expect("client");

    let value = client
        .execute(&EndpointCall::new(Operation::List, None), None)
        .await
        .expect("no schema, no shape check");
    assert_eq!(value, json!({"anything": [1, 2, 3]}));
}
