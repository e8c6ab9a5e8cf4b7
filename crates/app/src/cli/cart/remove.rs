use clap::Args;
use giftpack::products::ProductRef;
use giftpack_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct RemoveItemArgs {
    /// Product or pack reference
    product: String,
}

pub(crate) async fn run(ctx: &AppContext, args: RemoveItemArgs) -> Result<(), String> {
    let product = ProductRef::new(args.product);
    let mut store = ctx.cart_store().await;

    let removed = store.remove_item(&product).await;

    if removed == 0 {
        println!("{product} was not in the cart");
    } else {
        println!("removed {removed} line item(s) for {product}");
    }

    Ok(())
}
