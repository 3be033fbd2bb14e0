use commands::command_argument_builder;
use outrider::handlers::{handle_connect, handle_followup, handle_save_state};
use outrider::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("connect", primary_command)) => handle_connect(primary_command).await,
        Some(("followup", primary_command)) => handle_followup(primary_command).await,
        Some(("save-state", primary_command)) => handle_save_state(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
