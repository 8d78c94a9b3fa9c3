use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use common::api::ConfirmRequest;
use common::ScheduleForm;
use console::style;

use schedule_cli::input::read_image;
use schedule_cli::output::{exit_code, write_outcome, write_report};
use schedule_cli::{ClientError, Endpoint, Outcome, SubmissionClient};

#[derive(Parser)]
#[command(name = "schedule-submit", version, about = "Submit a class schedule photo")]
struct Cli {
    /// Base URL of the schedule intake server
    #[arg(
        long,
        global = true,
        env = "SCHEDULE_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send name, grade and schedule image
    Submit(SubmitArgs),
    /// Save a schedule returned by `submit --endpoint verify`
    Confirm(ConfirmArgs),
    /// List saved schedules
    List,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    grade: String,
    /// PNG or JPEG photo of the schedule
    #[arg(long)]
    image: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = EndpointArg::Verify)]
    endpoint: EndpointArg,
}

#[derive(Args)]
struct ConfirmArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    grade: String,
    #[arg(long)]
    schedule: String,
    /// Image hash reported by the verification step
    #[arg(long)]
    image_hash: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EndpointArg {
    Verify,
    Upload,
}

impl From<EndpointArg> for Endpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Verify => Endpoint::Verify,
            EndpointArg::Upload => Endpoint::Upload,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = SubmissionClient::new(&cli.server)?;

    let result = match cli.command {
        Command::Submit(args) => submit(&client, args),
        Command::Confirm(args) => client.confirm(&ConfirmRequest {
            name: args.name,
            grade: args.grade,
            schedule: args.schedule,
            image_hash: args.image_hash,
        }),
        Command::List => return list(&client),
    };

    let code = exit_code(&result);
    match result {
        Ok(outcome) => {
            write_outcome(
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
                &cli.server,
                &outcome,
            )?;
        }
        Err(ClientError::Invalid(report)) => write_report(&mut io::stderr().lock(), &report)?,
        Err(e) => return Err(e.into()),
    }
    Ok(ExitCode::from(code))
}

fn submit(client: &SubmissionClient, args: SubmitArgs) -> Result<Outcome, ClientError> {
    // An unreadable image counts as "no image selected".
    let image = args.image.as_deref().and_then(|path| match read_image(path) {
        Ok(image) => Some(image),
        Err(e) => {
            eprintln!("{} {e:#}", style("error:").red().bold());
            None
        }
    });

    let form = ScheduleForm {
        name: args.name,
        grade: args.grade,
        image,
    };
    client.submit(args.endpoint.into(), &form)
}

fn list(client: &SubmissionClient) -> anyhow::Result<ExitCode> {
    let listing = client
        .list_schedules()
        .context("Failed to fetch schedules")?;

    for schedule in &listing.schedules {
        println!(
            "{} {} (grade {})",
            style(format!("#{}", schedule.id)).dim(),
            style(&schedule.name).bold(),
            schedule.grade
        );
        for line in schedule.schedule.lines() {
            println!("    {line}");
        }
    }
    println!("{} schedule(s)", listing.total);

    Ok(ExitCode::SUCCESS)
}
