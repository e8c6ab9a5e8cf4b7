use clap::Args;
use giftpack_app::{context::AppContext, session::AuthState};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct LogoutArgs {}

pub(crate) async fn run(ctx: &AppContext, _args: LogoutArgs) -> Result<(), String> {
    let auth = ctx.auth_state();

    if auth == AuthState::Anonymous {
        return Err("nobody is signed in (--user)".to_string());
    }

    let mut store = ctx.cart_store().await;
    let mut reconciler = ctx.session(auth);

    let outcome = reconciler.observe(AuthState::Anonymous, &mut store).await;

    println!("signed out: {}", describe(outcome));

    Ok(())
}
