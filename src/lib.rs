pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod settings;

use std::io;

use azrm_azure::commands::subnet::new_subnet_config;
use azrm_azure::service::AzureService;
use log::debug;

use cli::{Cli, Command, SubnetCommand, SubscriptionCommand, VaultCommand, VnetCommand};
use error::AppError;
use output::{emit, FormatWriter, OutputWriter};
use settings::Settings;

/// Load settings, build the service and run one command, writing its
/// result to stdout.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let Cli { global, command } = cli;

    let mut settings = Settings::load(global.config.as_deref())?.with_env();
    global.credentials.apply(&mut settings.credentials);
    let format = global.output.unwrap_or(settings.output);
    debug!("output format {:?}, batch {}", format, global.batch);

    let mut service = AzureService::new(settings.azure)?;
    service.set_credentials(settings.credentials);
    service.set_default_resource_group(settings.default_resource_group);

    let mut out = FormatWriter::new(io::stdout(), format);
    execute(&mut service, command, &mut out, !global.batch).await
}

pub async fn execute<O: OutputWriter>(
    service: &mut AzureService,
    command: Command,
    out: &mut O,
    enumerate: bool,
) -> Result<(), AppError> {
    match command {
        Command::Vnet { command } => match command {
            VnetCommand::Set(args) => {
                let mode = args.into_mode(service)?;
                let vnet = service.set_virtual_network(mode).await?;
                out.write_object(&vnet)?;
            }
            VnetCommand::Get(args) => {
                let query = args.into_query(service)?;
                emit(out, service.get_virtual_network(query).await?, enumerate)?;
            }
            VnetCommand::Subnet { command } => match command {
                SubnetCommand::Add(args) => {
                    let (mode, config) = args.into_parts(service)?;
                    let vnet = service.add_subnet(mode, config).await?;
                    out.write_object(&vnet)?;
                }
                SubnetCommand::New(args) => {
                    let subnet = new_subnet_config(args.subnet.into_config()?)?;
                    out.write_object(&subnet)?;
                }
            },
        },
        Command::Subscription { command } => match command {
            SubscriptionCommand::Get(args) => {
                let query = args.into_query()?;
                emit(out, service.get_subscription(query).await?, enumerate)?;
            }
        },
        Command::Vault { command } => match command {
            VaultCommand::Get(args) => {
                let query = args.into_query(service)?;
                emit(out, service.get_vault(query).await?, enumerate)?;
            }
            VaultCommand::Remove(args) => {
                let target = args.into_target(service)?;
                out.write_object(&service.remove_vault(target).await?)?;
            }
        },
    }
    Ok(())
}
