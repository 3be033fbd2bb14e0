// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

use colored::Colorize;

// Re-export commonly used handler functions for convenience
pub use handlers::{expand_path, results_dir_override, target_override};

// Re-export the campaign surface from outrider-core
pub use outrider_core::{
    run_campaign, run_followup, CampaignOptions, CampaignReport, FollowupOptions, SessionOptions,
};

pub fn print_banner() {
    println!();
    println!(
        "{}",
        r"   ___  __  ____________  ________  ___________
  / _ \/ / / /_  __/ _ \/  _/ _ \/ __/ _ \
 / // / /_/ / / / / , _// // // / _// , _/
 \___/\____/ /_/ /_/|_/___/____/___/_/|_|"
            .bright_cyan()
            .bold()
    );
    println!(
        "  {} v{}",
        "outreach campaign runner".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
}
