use clap::{Args, Subcommand};
use giftpack_app::context::AppContext;

mod add;
mod clear;
mod remove;
mod show;
mod update;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    Show(show::ShowCartArgs),
    Add(add::AddItemArgs),
    Update(update::UpdateQuantityArgs),
    Remove(remove::RemoveItemArgs),
    Clear(clear::ClearCartArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show::run(ctx, args).await,
        CartSubcommand::Add(args) => add::run(ctx, args).await,
        CartSubcommand::Update(args) => update::run(ctx, args).await,
        CartSubcommand::Remove(args) => remove::run(ctx, args).await,
        CartSubcommand::Clear(args) => clear::run(ctx, args).await,
    }
}
