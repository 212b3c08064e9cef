use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use laundry_studio::admin::AdminPanel;
use laundry_studio::config::{ClientOptions, StoreConfig};
use laundry_studio::error::Error;
use laundry_studio::form::{Field, RegistrationForm, SubmitError};
use laundry_studio::models::{RecordId, ServiceKind};
use laundry_studio::store::{MemoryProviderStore, PostgrestProviderStore, ProviderStore};
use laundry_studio::Supabase;

/// Register laundry service providers and manage the registrations
#[derive(Parser, Debug)]
#[clap(name = "laundry-studio", version)]
struct Cli {
    /// Use an empty in-process store instead of the backend
    #[clap(long, global = true)]
    memory: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one provider registration
    Register {
        /// Business name
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: Option<String>,
        /// 10 digit phone number
        #[clap(long)]
        phone: String,
        /// One of: HBR Layout, Hebbal, Whitefield
        #[clap(long)]
        address: String,
        /// Offered service as kind=price, e.g. washOnly=50 (repeatable)
        #[clap(long = "service", parse(try_from_str = parse_service))]
        services: Vec<(ServiceKind, String)>,
    },
    /// Admin operations
    Admin {
        #[clap(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[clap(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// List every registered provider
    List,
    /// Delete one provider by id
    Delete { id: String },
}

fn parse_service(arg: &str) -> Result<(ServiceKind, String), String> {
    let (kind, price) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected kind=price, got {:?}", arg))?;
    let kind = kind.parse::<ServiceKind>().map_err(|e| e.to_string())?;
    Ok((kind, price.to_string()))
}

fn build_store(memory: bool, options: &ClientOptions) -> Result<Arc<dyn ProviderStore>, Error> {
    if memory {
        return Ok(Arc::new(MemoryProviderStore::new()));
    }
    let supabase = Supabase::init_global(StoreConfig::from_env()?, options.clone())?;
    Ok(Arc::new(PostgrestProviderStore::from_client(supabase)))
}

async fn run(cli: Cli) -> Result<(), String> {
    let options = ClientOptions::from_env();
    let store = build_store(cli.memory, &options).map_err(|e| e.to_string())?;

    match cli.command {
        Command::Register {
            name,
            email,
            phone,
            address,
            services,
        } => {
            let mut form = RegistrationForm::with_options(store, &options);
            form.set_field(Field::Name, &name);
            form.set_field(Field::Email, email.as_deref().unwrap_or_default());
            form.set_field(Field::Phone, &phone);
            form.set_field(Field::Address, &address);
            for (kind, price) in services {
                form.set_service_selected(kind, true);
                form.set_service_price(kind, &price);
            }

            match form.submit().await {
                Ok(id) => {
                    if let Some(notice) = form.notice() {
                        println!("{}", notice.message);
                    }
                    println!("id: {}", id);
                    Ok(())
                }
                Err(SubmitError::Invalid(errors)) => Err(errors
                    .iter()
                    .map(|(field, msg)| format!("{}: {}", field, msg))
                    .collect::<Vec<_>>()
                    .join("\n")),
                Err(SubmitError::Remote(_)) => Err(form
                    .notice()
                    .map(|notice| notice.message.clone())
                    .unwrap_or_default()),
            }
        }
        Command::Admin { password, action } => {
            let mut admin = AdminPanel::with_options(store, &options);
            admin.login(&password).await.map_err(|alert| alert.to_string())?;

            if let AdminAction::Delete { id } = action {
                let id: RecordId = id.parse().unwrap_or_else(|never| match never {});
                admin.delete(&id).await.map_err(|alert| alert.to_string())?;
                println!("deleted {}", id);
            }
            println!("{}", admin.render());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
