use clap::{Parser, Subcommand};
use giftpack_app::{config::AppConfig, context::AppContext};

mod cart;
mod checkout;
mod coupon;
mod orders;
mod pincode;
mod session;

#[derive(Debug, Parser)]
#[command(name = "giftpack", about = "Giftpack storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Coupon(coupon::CouponCommand),
    Pincode(pincode::PincodeCommand),
    Session(session::SessionCommand),
    Orders(orders::OrdersCommand),
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Coupon(command) => coupon::run(&ctx, command).await,
            Commands::Pincode(command) => pincode::run(&ctx, command).await,
            Commands::Session(command) => session::run(&ctx, command).await,
            Commands::Orders(command) => orders::run(&ctx, command).await,
            Commands::Checkout(args) => checkout::run(&ctx, args).await,
        }
    }
}
