use crate::commands::{run_check, run_normalize, CheckArgs, NormalizeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use papel_checker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "papel-checker",
    about = "Grade Filipino concept papers against the Konseptong Papel rubric",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a single essay against the configured model and print the result
    Check(CheckArgs),
    /// Normalize a saved model response offline, without calling the API
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args).await,
        Command::Normalize(args) => run_normalize(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["papel-checker"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn check_requires_exactly_one_essay_source() {
        assert!(Cli::try_parse_from(["papel-checker", "check"]).is_err());
        assert!(Cli::try_parse_from([
            "papel-checker",
            "check",
            "--file",
            "papel.txt",
            "--text",
            "Ang wika ay buhay."
        ])
        .is_err());

        let cli = Cli::try_parse_from(["papel-checker", "check", "--text", "Ang wika ay buhay."])
            .expect("parses");
        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.text.as_deref(), Some("Ang wika ay buhay."));
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["papel-checker", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
