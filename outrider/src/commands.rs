use clap::{arg, command};
use clap_cargo::style::CLAP_STYLING;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("outrider")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("outrider")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("connect")
                .about(
                    "Run an outreach campaign over a people search: send connection requests \
                with a note and log every net-new profile.",
                )
                .arg(
                    arg!([QUERY])
                        .required(false)
                        .help("Search keywords for the people search")
                        .default_value("cto"),
                )
                .arg(
                    arg!(-t --"target" <COUNT>)
                        .required(false)
                        .help("Stop after logging this many net-new profiles")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("120"),
                )
                .arg(
                    arg!(-d --"results-dir" <PATH>)
                        .required(false)
                        .help("Directory holding the result logs and the dedup history")
                        .default_value("~/.outrider/results"),
                )
                .arg(
                    arg!(--"state-dir" <PATH>)
                        .required(false)
                        .help("Chrome profile directory holding the saved login session")
                        .default_value("~/.outrider/chrome-profile"),
                )
                .arg(
                    arg!(--"note" <TEXT>)
                        .required(false)
                        .help("Override the note sent with every connection request"),
                )
                .arg(
                    arg!(--"stagnation-limit" <PAGES>)
                        .required(false)
                        .help("Stop after this many consecutive pages with no new profiles")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"headed")
                        .required(false)
                        .help("Show the browser window (default: headless)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("followup")
                .about(
                    "Scan the message inbox for replies to the campaign note and send a \
                follow-up message.",
                )
                .arg(
                    arg!(--"max-send" <COUNT>)
                        .required(false)
                        .help("Send at most this many follow-up messages per run")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"scroll-passes" <COUNT>)
                        .required(false)
                        .help("Upper bound on conversation list scroll passes")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("15"),
                )
                .arg(
                    arg!(--"snippet" <TEXT>)
                        .required(false)
                        .help("Override the phrase that identifies campaign conversations"),
                )
                .arg(
                    arg!(--"state-dir" <PATH>)
                        .required(false)
                        .help("Chrome profile directory holding the saved login session")
                        .default_value("~/.outrider/chrome-profile"),
                )
                .arg(
                    arg!(--"headed")
                        .required(false)
                        .help("Show the browser window (default: headless)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("save-state")
                .about(
                    "Open a headed browser for a manual login and persist the session into \
                the Chrome profile directory.",
                )
                .arg(
                    arg!(--"state-dir" <PATH>)
                        .required(false)
                        .help("Chrome profile directory to persist the session into")
                        .default_value("~/.outrider/chrome-profile"),
                ),
        )
}
