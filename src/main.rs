mod config;
mod error;
mod handlers;
mod pagination;
mod server;
mod store;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    if let Err(err) = server::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
