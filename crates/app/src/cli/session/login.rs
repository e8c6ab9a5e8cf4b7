use clap::Args;
use giftpack_app::{context::AppContext, session::AuthState};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// User signing in
    #[arg(long = "as")]
    user: String,
}

pub(crate) async fn run(ctx: &AppContext, args: LoginArgs) -> Result<(), String> {
    let user = args.user.trim();

    if user.is_empty() {
        return Err("user cannot be empty".to_string());
    }

    let mut store = ctx.cart_store().await;
    let mut reconciler = ctx.session(ctx.auth_state());

    let outcome = reconciler
        .observe(AuthState::Authenticated(user.into()), &mut store)
        .await;

    println!("signed in as {user}: {}", describe(outcome));

    Ok(())
}
