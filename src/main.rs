#[tokio::main]
async fn main() {
    if let Err(err) = certify_ai::run().await {
        eprintln!("certify-ai: {err}");
        std::process::exit(1);
    }
}
