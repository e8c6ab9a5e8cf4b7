use clap::Args;
use giftpack::items::LineItem;
use giftpack_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct AddItemArgs {
    /// Product or pack reference
    product: String,

    /// Number of units to add
    #[arg(long, short, default_value_t = 1)]
    quantity: u64,

    /// Gift card message
    #[arg(long)]
    message: Option<String>,

    /// Wrapping option
    #[arg(long)]
    wrapping: Option<String>,
}

pub(crate) async fn run(ctx: &AppContext, args: AddItemArgs) -> Result<(), String> {
    let mut item = LineItem::new(args.product, args.quantity).map_err(|error| error.to_string())?;

    if let Some(message) = args.message {
        item = item.with_custom_message(message);
    }

    if let Some(wrapping) = args.wrapping {
        item = item.with_wrapping_option(wrapping);
    }

    let mut store = ctx.cart_store().await;
    let added = format!("added {} x {}", item.quantity(), item.product());

    store.add_item(item).await;

    println!("{added}");
    println!("cart now holds {} item(s)", store.item_count());

    Ok(())
}
