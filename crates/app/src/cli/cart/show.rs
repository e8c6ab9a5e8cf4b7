use std::io;

use clap::Args;
use giftpack::summary::OrderSummary;
use giftpack_app::context::AppContext;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct ShowCartArgs {
    /// Coupon code to price the cart with
    #[arg(long)]
    coupon: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, args: ShowCartArgs) -> Result<(), String> {
    let store = ctx.cart_store().await;

    if store.cart().is_empty() {
        println!("your cart is empty");
        return Ok(());
    }

    let catalog = ctx
        .load_catalog()
        .await
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    let mut gate = ctx.coupon_gate();

    if let Some(code) = args.coupon {
        gate.apply(&code, Timestamp::now())
            .await
            .map_err(|error| error.to_string())?;
    }

    let summary = OrderSummary::new(store.cart(), &catalog, gate.applied(), &ctx.pricing);

    summary
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print cart: {error}"))?;

    let above_max = gate
        .applied()
        .is_some_and(|coupon| coupon.exceeds_max_discount(summary.totals().coupon_discount));

    if above_max {
        println!("note: this discount is above the coupon's advertised maximum");
    }

    Ok(())
}
