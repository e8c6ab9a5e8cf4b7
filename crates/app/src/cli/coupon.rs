use clap::{Args, Subcommand};
use giftpack_app::context::AppContext;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Check(CheckCouponArgs),
}

#[derive(Debug, Args)]
struct CheckCouponArgs {
    /// Coupon code, any case
    code: String,
}

pub(crate) async fn run(ctx: &AppContext, command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Check(args) => check(ctx, args).await,
    }
}

async fn check(ctx: &AppContext, args: CheckCouponArgs) -> Result<(), String> {
    let coupon = ctx
        .coupon_gate()
        .check(&args.code, Timestamp::now())
        .await
        .map_err(|error| error.to_string())?;

    println!("code: {}", coupon.code);
    println!("discount: {}%", coupon.discount_percentage);
    println!(
        "remaining: {} of {}",
        coupon.remaining_quantity, coupon.total_quantity
    );
    println!("expires_at: {}", coupon.expiration_date);

    if let Some(max) = coupon.max_discount_amount {
        println!("max_discount_amount: {max}");
    }

    if coupon.below_min_percentage() {
        println!("note: discount is below the advertised minimum");
    }

    Ok(())
}
