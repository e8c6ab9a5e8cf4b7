use std::sync::Arc;

use clap::Args;
use giftpack::{orders::PaymentId, validation::DeliveryAddress};
use giftpack_app::{backend::payments::PresetPayment, context::AppContext};
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name
    #[arg(long)]
    name: String,

    /// Street address
    #[arg(long)]
    street: String,

    /// City
    #[arg(long)]
    city: String,

    /// State
    #[arg(long)]
    state: String,

    /// Ten digit phone number
    #[arg(long)]
    phone: String,

    /// Six digit pincode
    #[arg(long)]
    pincode: String,

    /// Reference of the payment completed with the payment provider
    #[arg(long)]
    payment_id: String,

    /// Coupon code to redeem
    #[arg(long)]
    coupon: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let address = DeliveryAddress {
        name: args.name,
        street: args.street,
        city: args.city,
        state: args.state,
        phone: args.phone,
        pincode: args.pincode,
    };

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

    let mut store = ctx.cart_store().await;
    let payments = Arc::new(PresetPayment::new(PaymentId::new(args.payment_id)));

    let order = ctx
        .checkout(payments)
        .place_order(&ctx.auth_state(), &address, &catalog, &mut store, &mut gate)
        .await
        .map_err(|error| error.to_string())?;

    println!("order_id: {}", order.id);
    println!("status: {}", order.status);
    println!("total_amount: {}", order.total_amount);

    Ok(())
}
