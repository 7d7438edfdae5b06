use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    caretpad::cli::run().await
}
