use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ndi_monitor::{
    cancel::CancelToken,
    config::Config,
    display::OpenCvWindow,
    find::NDISourceFinderBuilder,
    monitor::{self, ndi::NDIConnector},
    sdk::{NDIRuntime, library_path_from_env},
};

fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("NAME")
                .help("Exact name of the NDI source to show, e.g. \"MACHINE (Channel)\""),
        )
        .arg(
            Arg::new("groups")
                .long("groups")
                .value_name("GROUPS")
                .help("Comma separated list of NDI groups to search"),
        )
        .arg(
            Arg::new("extra-ips")
                .long("extra-ips")
                .value_name("IPS")
                .help("Comma separated list of IPs to query in addition to mDNS"),
        )
        .arg(
            Arg::new("no-local-sources")
                .long("no-local-sources")
                .help("Ignore sources running on this machine")
                .action(ArgAction::SetTrue),
        )
}

fn load_config() -> Result<Config> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(source) = matches.get_one::<String>("source") {
        config.source_name = source.clone();
    }
    if let Some(groups) = matches.get_one::<String>("groups") {
        config.discovery.groups = Some(groups.clone());
    }
    if let Some(extra_ips) = matches.get_one::<String>("extra-ips") {
        config.discovery.extra_ips = Some(extra_ips.clone());
    }
    if matches.get_flag("no-local-sources") {
        config.discovery.show_local_sources = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        info!("stopping");
        handler_token.cancel();
    })
    .context("failed to install the Ctrl-C handler")?;

    let library = library_path_from_env(&config.runtime.env_var, &config.runtime.library_name)?;
    let runtime = NDIRuntime::load(&library)?;
    info!(
        version = runtime.version().unwrap_or("unknown"),
        library = %library.display(),
        "NDI runtime loaded"
    );

    let mut window = OpenCvWindow::open(&config.window_title(), config.window_size())
        .context("failed to open window")?;

    let finder = NDISourceFinderBuilder::new()
        .show_local_sources(config.discovery.show_local_sources)
        .groups(config.discovery.groups.clone())
        .extra_ips(config.discovery.extra_ips.clone())
        .build(&runtime)?;
    let connector = NDIConnector::new(&runtime, config.receiver.clone());

    match monitor::run(
        finder,
        connector,
        &mut window,
        &config.monitor_settings(),
        &cancel,
    ) {
        Ok(stats) => {
            info!(?stats, "done");
            Ok(())
        }
        Err(err) if err.is_cancelled() => {
            info!("cancelled");
            Ok(())
        }
        Err(err) if err.is_clean_exit() => {
            error!(%err, "lost the connection");
            Ok(())
        }
        Err(err) => {
            error!(%err, "monitor stopped");
            Err(err.into())
        }
    }
}
