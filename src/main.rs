//! load-diversity entry point: CLI wiring and installation loading.

use std::path::Path;
use std::process;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use load_diversity::config::InstallationConfig;
use load_diversity::io::export::export_csv;
use load_diversity::rules::RuleTable;

/// Parsed CLI arguments.
struct CliArgs {
    installation_path: Option<String>,
    preset: Option<String>,
    voltage_override: Option<f64>,
    breakdown_out: Option<String>,
    show_rules: bool,
    verbose: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("load-diversity: diversified maximum demand (IET On-Site Guide allowances)");
    eprintln!();
    eprintln!("Usage: load-diversity [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --installation <path>    Load installation from TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        InstallationConfig::PRESETS.join(", ")
    );
    eprintln!("  --voltage <V>            Override supply voltage");
    eprintln!("  --breakdown-out <path>   Export per-type breakdown to CSV");
    eprintln!("  --rules                  Print the diversity table for the installation");
    eprintln!("  --verbose                Log each evaluated group");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the calculation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --installation or --preset is given, the domestic preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        installation_path: None,
        preset: None,
        voltage_override: None,
        breakdown_out: None,
        show_rules: false,
        verbose: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--installation" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --installation requires a path argument");
                    process::exit(1);
                }
                cli.installation_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--voltage" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --voltage requires a numeric argument");
                    process::exit(1);
                }
                if let Ok(v) = args[i].parse::<f64>() {
                    cli.voltage_override = Some(v);
                } else {
                    eprintln!("error: --voltage value \"{}\" is not a number", args[i]);
                    process::exit(1);
                }
            }
            "--breakdown-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --breakdown-out requires a path argument");
                    process::exit(1);
                }
                cli.breakdown_out = Some(args[i].clone());
            }
            "--rules" => {
                cli.show_rules = true;
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {e}");
    }
}

fn main() {
    let cli = parse_args();
    init_logging(cli.verbose);

    // --installation takes priority, then --preset, then the domestic default
    let mut installation = if let Some(ref path) = cli.installation_path {
        match InstallationConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match InstallationConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        InstallationConfig::domestic()
    };

    if let Some(voltage) = cli.voltage_override {
        installation.supply.voltage_v = voltage;
    }

    let errors = installation.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let result = match installation.to_schedule().recompute() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.show_rules {
        println!("{}", RuleTable::for_location(installation.location));
    }
    println!("{result}");

    if let Some(ref path) = cli.breakdown_out {
        if let Err(e) = export_csv(&result, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Breakdown written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(load_diversity::api::AppState {
            supply: installation.supply(),
            result: Some(result),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(load_diversity::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
