use clap::{Args, Subcommand};
use giftpack_app::{context::AppContext, history::order_history};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    List,
}

pub(crate) async fn run(ctx: &AppContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => list(ctx).await,
    }
}

async fn list(ctx: &AppContext) -> Result<(), String> {
    let auth = ctx.auth_state();
    let user = auth
        .user()
        .ok_or_else(|| "sign in (--user) to see your orders".to_string())?;

    let orders = order_history(ctx.orders.as_ref(), user)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    for order in orders {
        println!("order_id: {}", order.id);
        println!("status: {}", order.status);
        println!("placed_at: {}", order.created_at);
        println!("items: {}", order.items.len());
        println!("total_amount: {}", order.total_amount);
        println!(
            "coupon: {}",
            order
                .coupon_code
                .map_or_else(|| "none".to_string(), |code| code.to_string())
        );
        println!();
    }

    Ok(())
}
