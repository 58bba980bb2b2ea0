mod cli;
mod config;
mod discover;
mod generate;
mod init;
mod inventory_cmd;
mod project;
mod render;
mod report;
mod templates;
mod write;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Init(args) => init::run(args),
        cli::Command::Gen(args) => generate::run(args).await,
        cli::Command::Inventory(args) => inventory_cmd::run(args).await,
    }
}
