//! Entrypoint for the `reelpick` binary.

#[tokio::main]
async fn main() {
    let exit_code = reelpick_cli::run().await;
    std::process::exit(exit_code);
}
