// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::{DemoRuntime, FetchRuntime};
use std::env;
use std::path::PathBuf;
use tracing::info;
use trxview_app::ViewController;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `trxview --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let log_file = config.log_file();
    logging::init(
        &logging::filter_directive(config.log_level()),
        log_file.as_deref(),
    )?;

    let settings = config.view_settings()?;
    let mut controller = ViewController::new(settings);

    if options.demo {
        info!("starting with generated demo records");
        if options.check_only {
            return Ok(());
        }
        return trxview_tui::run_app(&mut controller, &mut DemoRuntime::new());
    }

    let endpoint = options
        .url
        .as_deref()
        .or_else(|| config.source_url())
        .ok_or_else(|| {
            anyhow!(
                "no snapshot endpoint configured; set [source] url in {} or pass --url (or use --demo)",
                options.config_path.display()
            )
        })?;
    let client = trxview_fetch::Client::new(endpoint, config.source_timeout()?).with_context(|| {
        format!(
            "invalid [source] config in {}; fix url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    info!(endpoint = client.endpoint(), "starting");
    trxview_tui::run_app(&mut controller, &mut FetchRuntime::new(client))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    url: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        url: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--url requires an endpoint"))?;
                options.url = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("trxview");
    println!("  --config <path>          Use a specific config path");
    println!("  --url <endpoint>         Fetch records from this endpoint instead of [source] url");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Browse generated records instead of fetching");
    println!("  --check                  Validate config and endpoint, then exit");
    println!("  --help                   Show this help");
}
