//! Giftpack storefront CLI

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    giftpack_app::logging::init(&cli.config.log_level);

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
