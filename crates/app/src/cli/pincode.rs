use clap::{Args, Subcommand};
use giftpack::validation::validate_pincode;
use giftpack_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct PincodeCommand {
    #[command(subcommand)]
    command: PincodeSubcommand,
}

#[derive(Debug, Subcommand)]
enum PincodeSubcommand {
    Check(CheckPincodeArgs),
}

#[derive(Debug, Args)]
struct CheckPincodeArgs {
    /// Six digit pincode
    pincode: String,
}

pub(crate) async fn run(ctx: &AppContext, command: PincodeCommand) -> Result<(), String> {
    match command.command {
        PincodeSubcommand::Check(args) => check(ctx, args).await,
    }
}

async fn check(ctx: &AppContext, args: CheckPincodeArgs) -> Result<(), String> {
    let pincode = args.pincode.trim();

    if !validate_pincode(pincode) {
        return Err(format!("{pincode:?} is not a valid pincode"));
    }

    let serviceable = ctx
        .delivery
        .is_pincode_serviceable(pincode)
        .await
        .map_err(|error| format!("failed to check pincode: {error}"))?;

    if serviceable {
        println!("we deliver to {pincode}");
    } else {
        println!("we do not deliver to {pincode} yet");
    }

    Ok(())
}
