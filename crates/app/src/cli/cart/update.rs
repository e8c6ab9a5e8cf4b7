use clap::Args;
use giftpack::products::ProductRef;
use giftpack_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct UpdateQuantityArgs {
    /// Product or pack reference
    product: String,

    /// New quantity; zero removes the product
    quantity: u64,
}

pub(crate) async fn run(ctx: &AppContext, args: UpdateQuantityArgs) -> Result<(), String> {
    let product = ProductRef::new(args.product);
    let mut store = ctx.cart_store().await;

    let result = match ctx.auth_state().user() {
        Some(user) => {
            store
                .update_quantity_everywhere(ctx.carts.as_ref(), user, &product, args.quantity)
                .await
        }
        None => store.update_quantity(&product, args.quantity).await,
    };

    result.map_err(|error| error.to_string())?;

    if args.quantity == 0 {
        println!("removed {product}");
    } else {
        println!("set {product} to {}", args.quantity);
    }

    Ok(())
}
