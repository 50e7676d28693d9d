use crate::demo::{run_cnp_validate, run_demo, run_replay, DemoArgs, ReplayArgs};
use crate::server;
use appointment_eval::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Appointment Exercise Evaluator",
    about = "Run and score the medical appointment booking exercise from the command line",
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
    /// Play a scripted booking session and print how the score evolves
    Demo(DemoArgs),
    /// Score a recorded action log (CSV with `kind,value` columns)
    Replay(ReplayArgs),
    /// Personal numeric code (CNP) utilities
    Cnp {
        #[command(subcommand)]
        command: CnpCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CnpCommand {
    /// Check a 13-digit CNP against its control digit
    Validate {
        /// The identifier to check
        id: String,
    },
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
        Command::Demo(args) => run_demo(args),
        Command::Replay(args) => run_replay(args),
        Command::Cnp {
            command: CnpCommand::Validate { id },
        } => {
            run_cnp_validate(&id);
            Ok(())
        }
    }
}
