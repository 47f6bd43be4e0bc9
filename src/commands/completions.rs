use clap_complete::shells;
use crate::STDRESULT;
use super::CommandError;

pub fn generate(mut main_cmd: clap::Command,cmd: &clap::ArgMatches) -> STDRESULT {
    match cmd.get_one::<String>("shell").expect("required arg").as_str() {
        "bash" => clap_complete::generate(shells::Bash,&mut main_cmd,"fwkit",&mut std::io::stdout()),
        "elvish" => clap_complete::generate(shells::Elvish,&mut main_cmd,"fwkit",&mut std::io::stdout()),
        "fish" => clap_complete::generate(shells::Fish,&mut main_cmd,"fwkit",&mut std::io::stdout()),
        "powershell" => clap_complete::generate(shells::PowerShell,&mut main_cmd,"fwkit",&mut std::io::stdout()),
        "zsh" => clap_complete::generate(shells::Zsh,&mut main_cmd,"fwkit",&mut std::io::stdout()),
        _ => return Err(Box::new(CommandError::InvalidCommand))
    }
    Ok(())
}
