#[tokio::main]
async fn main() {
    if let Err(err) = ollama_mcp::mcp::server::run_stdio().await {
        eprintln!("ollama-mcp: {}", err);
        std::process::exit(1);
    }
}
