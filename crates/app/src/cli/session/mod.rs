use clap::{Args, Subcommand};
use giftpack_app::{context::AppContext, session::ReconcileOutcome};

mod login;
mod logout;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Login(args) => login::run(ctx, args).await,
        SessionSubcommand::Logout(args) => logout::run(ctx, args).await,
    }
}

fn describe(outcome: ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Unchanged => "nothing changed",
        ReconcileOutcome::AdoptedRemote => "restored your saved cart",
        ReconcileOutcome::PushedLocal => "saved this cart to your account",
        ReconcileOutcome::NothingToSync => "both carts are empty",
        ReconcileOutcome::ClearedLocal => "cleared the local cart",
        ReconcileOutcome::Failed => "could not sync carts; your local cart was kept",
    }
}
