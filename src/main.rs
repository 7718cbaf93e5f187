//! Property Binder - Main CLI Application
//!
//! Loads the layered configuration sources, binds the person record and
//! prints it.

use clap::Parser;
use property_binder::{
    cli::Cli,
    config::{load_config, EnvManager},
    error::{AppError, ErrorReporter, Result},
    log_debug, log_info,
    logging::{LogSettings, LoggerFactory},
    output::OutputFormatterFactory,
    BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::process;

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("This is a bug; please report it with the command line that triggered it.");
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::config)?;

    if cli.example_env {
        print!("{}", EnvManager::create_example_env_content(cli.prefix.trim()));
        return Ok(());
    }

    let settings = LogSettings::from_cli(&cli);
    let factory = LoggerFactory::new(settings);
    let logger = factory.create_logger("MAIN");
    log_debug!(
        logger,
        "{} v{} ({}, {}, built {}) session {}",
        PKG_NAME,
        VERSION,
        GIT_COMMIT,
        TARGET_TRIPLE,
        BUILD_TIME,
        factory.session_id()
    );
    log_debug!(logger, "{}", cli.get_config_summary().trim_end());

    let binding = factory.create_binding_logger();
    binding.logger().add_context_field("prefix".to_string(), cli.prefix.trim());
    let correlation_id = binding.logger().start_operation("bind");

    let loaded = match load_config(cli.clone()) {
        Ok(loaded) => loaded,
        Err(e) => {
            if cli.debug {
                factory
                    .create_error_logger()
                    .log_error(&e, Some("Binding failed"), Some(&correlation_id));
            }
            binding.logger().end_operation(&correlation_id, "bind", false);
            return Err(e);
        }
    };

    binding.log_sources(&loaded, &correlation_id);
    binding.log_outcome(&loaded, &correlation_id);
    binding.log_warnings(&loaded, &correlation_id);
    binding.logger().end_operation(&correlation_id, "bind", true);

    let formatter = OutputFormatterFactory::create_formatter(cli.format, cli.use_colors());
    println!("{}", formatter.format_record(&loaded.record)?);

    if cli.verbose {
        eprintln!("{}", formatter.format_summary(&loaded)?);
    }
    log_info!(logger, "Record bound from {} source(s)", loaded.sources.len());

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Bind { key, .. } => {
            eprintln!();
            eprintln!("Binding help:");
            eprintln!("  - Run with --verbose to list the sources in precedence order");
            eprintln!("  - Override the value with --set {}=<value>", key);
            eprintln!("  - Dates accept yyyy/MM/dd, yyyy-MM-dd, an optional HH:mm:ss time, or RFC 3339");
        }
        AppError::UnsupportedNestedAccess { .. } | AppError::UnknownProperty { .. } => {
            eprintln!();
            eprintln!("Key help:");
            eprintln!("  - Maps take sub-keys (person.maps.k1=v1), lists take indices (person.list[0]=a)");
            eprintln!("  - Field names match loosely: last-name, lastName and LAST_NAME are the same key");
        }
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check the paths given with --config and --source");
            eprintln!("  - Supported documents: .yml, .yaml, .json, .properties");
            eprintln!("  - Run with --example-env to see the environment variable layout");
        }
        _ => {}
    }
}
