use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidrelay")]
#[command(author, version, about = "Telegram bot that converts uploaded videos to another format", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Verify ffmpeg and the staging directories, then exit
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["vidrelay"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_check_subcommand() {
        let cli = Cli::try_parse_from(["vidrelay", "check"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["vidrelay", "download"]).is_err());
    }
}
