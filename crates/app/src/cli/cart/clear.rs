use clap::Args;
use giftpack_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ClearCartArgs {
    /// Also clear the signed-in user's server cart
    #[arg(long)]
    everywhere: bool,
}

pub(crate) async fn run(ctx: &AppContext, args: ClearCartArgs) -> Result<(), String> {
    let mut store = ctx.cart_store().await;

    if !args.everywhere {
        store.clear().await;
        println!("cart cleared");
        return Ok(());
    }

    let auth = ctx.auth_state();
    let user = auth
        .user()
        .ok_or_else(|| "--everywhere requires a signed-in user (--user)".to_string())?;

    store.clear_everywhere(ctx.carts.as_ref(), user).await;

    println!("cart cleared for {user}");

    Ok(())
}
