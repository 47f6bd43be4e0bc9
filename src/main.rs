//! # Command Line Interface
//!
//! Dispatch commands to `commands` module.

use env_logger;
use fwkit::commands;
use fwkit::commands::CommandError;
mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    let main_cmd = cli::build_cli();
    let matches = main_cmd.get_matches();

    // repeatable -v on unpack raises the default log level, RUST_LOG
    // still has the final word
    let mut default_filter = "warn";
    if let Some(cmd) = matches.subcommand_matches("unpack") {
        default_filter = match cmd.get_count("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace"
        };
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // Scan a file and carve or extract what is found

    if let Some(cmd) = matches.subcommand_matches("unpack") {
        return commands::unpack::unpack(cmd);
    }

    // Decode a cramfs image

    if let Some(cmd) = matches.subcommand_matches("uncram") {
        return commands::uncram::uncram(cmd);
    }

    // Reassemble an Intel-HEX firmware file

    if let Some(cmd) = matches.subcommand_matches("hexbin") {
        return commands::hexbin::hexbin(cmd);
    }

    // Encode typed values into byte needles

    if let Some(cmd) = matches.subcommand_matches("encode") {
        return commands::encode::encode(cmd);
    }

    // Completions

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    log::error!("No subcommand was found, try `fwkit --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
