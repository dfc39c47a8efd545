use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};

use libixn_assembler::assembler::StackOutcome;
use libixn_assembler::config::Config;
use libixn_assembler::session::Session;

fn make_template_config(path: &Path) {
    match Config::default().write_config_file(path) {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Could not write template config: {e}"),
    }
}

/// Discover the experiment a config points at and report what was found
fn discover(config: &Config) -> Option<Session> {
    let mut session = Session::new();
    if let Err(e) = session.apply_config(config) {
        log::error!("{e}");
        return None;
    }
    if let Some(descriptor) = session.descriptor() {
        match serde_yaml::to_string(descriptor) {
            Ok(yaml_str) => log::info!("Discovered experiment:\n{yaml_str}"),
            Err(e) => log::error!("Unable to describe experiment, serializer error: {e}"),
        }
    }
    for (idx, name) in session.channel_names().slots().iter().enumerate() {
        log::info!("Channel name w{}: {name}", idx + 1);
    }
    Some(session)
}

fn main() {
    // Create a cli
    let matches = Command::new("ixn_assembler_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("discover").about("Describe the experiment named in a configuration"),
        )
        .subcommand(Command::new("run").about("Assemble the stacks named in a configuration"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }

    // Parse the cli
    let Some(config_path) = matches.get_one::<String>("path").map(PathBuf::from) else {
        log::error!("A configuration path is required");
        return;
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Data Path: {}", config.data_path.to_string_lossy());
    log::info!("Queue all positions: {}", config.all_positions);

    let Some(session) = discover(&config) else {
        return;
    };
    if let Some(("discover", _)) = matches.subcommand() {
        return;
    }

    let targets = session.write_list().targets();
    if targets.is_empty() {
        log::warn!("No positions were queued, nothing to do.");
        return;
    }
    log::info!("Queued positions: {}", targets.join(", "));

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(targets.len() as u64));
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let report = match session.write_all(|status| {
        pb.set_position(status.targets_done as u64);
        pb.set_message(status.stub);
    }) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Assembly failed with error: {e}");
            return;
        }
    };
    pb.finish();

    for outcome in report.outcomes.iter() {
        if let StackOutcome::Written { path, frames } = outcome {
            log::info!("Wrote {} ({frames} frames)", path.display());
        }
    }
    for (target, e) in report.failures.iter() {
        log::error!("Failed to assemble {target}: {e}");
    }
    log::info!(
        "{} stacks written, {} already present, {} positions failed",
        report.n_written(),
        report.n_skipped(),
        report.failures.len()
    );

    log::info!("Done.");
}
