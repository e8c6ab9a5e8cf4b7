//! Order history

use giftpack::orders::{Order, UserId, sort_newest_first};
use tracing::debug;

use crate::backend::{BackendError, OrdersService};

/// Fetch a user's orders, most recent first.
///
/// # Errors
///
/// Returns the backend error if the orders cannot be listed.
#[tracing::instrument(name = "history.order_history", skip(orders), fields(user_id = %user), err)]
pub async fn order_history(
    orders: &dyn OrdersService,
    user: &UserId,
) -> Result<Vec<Order>, BackendError> {
    let mut history = orders.list_orders(user).await?;

    sort_newest_first(&mut history);

    debug!(orders = history.len(), "fetched order history");

    Ok(history)
}
