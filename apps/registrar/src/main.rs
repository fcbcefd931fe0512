use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    connect_login, connect_registration, load_settings, FileTokenStore, LoginOutcome,
    LookupApplied, Navigator, RegistrationSession, SubmissionOutcome,
};
use shared::domain::DraftField;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Register business clients from the command line")]
struct Cli {
    /// Path to the TOML config file (defaults to ./registrar.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and store the session token.
    Login {
        #[arg(long)]
        document_number: String,
        #[arg(long)]
        password: String,
    },
    /// Fill the registration form, enrich the address and submit it.
    Register(RegisterArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    document_number: String,
    #[arg(long)]
    representative_name: String,
    #[arg(long)]
    representative_phone: String,
    #[arg(long)]
    representative_email: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    number: String,
    /// Overrides the street returned by the postal-code lookup.
    #[arg(long)]
    street: Option<String>,
    #[arg(long, default_value = "")]
    complement: String,
    #[arg(long, default_value = "")]
    reference: String,
    /// Only needed when the postal-code lookup cannot fill them.
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    neighbourhood: Option<String>,
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "navigate");
        println!("-> {route}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    let tokens = Arc::new(FileTokenStore::new(settings.token_path.clone()));
    let navigator = Arc::new(ConsoleNavigator);

    match cli.command {
        Command::Login {
            document_number,
            password,
        } => {
            let mut flow = connect_login(&settings, tokens, navigator)?;
            match flow.login(&document_number, &password).await {
                LoginOutcome::LoggedIn => {
                    println!("Logged in; token saved to {}", settings.token_path.display());
                    Ok(())
                }
                LoginOutcome::Rejected(error) => bail!("{error}"),
            }
        }
        Command::Register(args) => {
            let mut session = connect_registration(&settings, tokens.as_ref(), navigator).await?;
            register(&mut session, args).await
        }
    }
}

async fn register(session: &mut RegistrationSession, args: RegisterArgs) -> Result<()> {
    session.edit(DraftField::CompanyName, args.company_name);
    session.edit(DraftField::DocumentNumber, args.document_number);
    session.edit(DraftField::RepresentativeName, args.representative_name);
    session.edit(DraftField::RepresentativePhone, args.representative_phone);
    session.edit(DraftField::RepresentativeEmail, args.representative_email);
    session.edit(DraftField::Number, args.number);
    session.edit(DraftField::Complement, args.complement);
    session.edit(DraftField::Reference, args.reference);

    match session.update_postal_code(args.postal_code).await {
        LookupApplied::Merged => {
            let address = &session.draft().address;
            println!(
                "Address found: {}, {} - {} ({})",
                address.street, address.neighbourhood, address.city, address.state
            );
        }
        LookupApplied::Failed => {
            if let Some(error) = session.error() {
                eprintln!("warning: {error}");
            }
            session.dismiss_error();
        }
        LookupApplied::Skipped | LookupApplied::Stale => {}
    }

    let overrides = [
        (DraftField::Street, args.street),
        (DraftField::City, args.city),
        (DraftField::State, args.state),
        (DraftField::Neighbourhood, args.neighbourhood),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            session.edit(field, value);
        }
    }

    match session.submit().await {
        SubmissionOutcome::Accepted => {
            println!("Client registered");
            Ok(())
        }
        SubmissionOutcome::Rejected(error) => bail!("{error}"),
        SubmissionOutcome::Blocked(blocked) => bail!("{blocked}"),
        SubmissionOutcome::Ignored => bail!("submission response was not for this session"),
    }
}
