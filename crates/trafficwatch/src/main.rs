//! `trafwatch` - CLI for trafficwatch
//!
//! This binary renders the dashboard views in the terminal: lane status and
//! density chart, the violation log, reports and local settings.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use trafficwatch::api::FetchOrigin;
use trafficwatch::cli::{
    Cli, Command, ConfigCommand, HomeCommand, LanesCommand, ReportsCommand, SettingsCommand,
    ViolationsCommand,
};
use trafficwatch::dashboard::{load_home, load_report, load_violation_log, to_json, watch_home};
use trafficwatch::filter::FilterState;
use trafficwatch::model::{DensityStatus, CHART_LANES};
use trafficwatch::reports::{totals, TimeFrame};
use trafficwatch::settings::NotificationKind;
use trafficwatch::{init_logging, ApiClient, Config, DensitySnapshot, Error, Fetched, Poller};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<Error>())
                .map_or(1, Error::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands load the file themselves so `validate` can report errors
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(cli.config, config_cmd),
        command => command,
    };

    let config = Config::load_from(cli.config).context("failed to load configuration")?;

    match command {
        Command::Home(cmd) => handle_home(&config, &cmd).await,
        Command::Violations(cmd) => handle_violations(&config, &cmd).await,
        Command::Lanes(cmd) => handle_lanes(&config, &cmd).await,
        Command::Reports(cmd) => handle_reports(&config, &cmd).await,
        Command::Settings(cmd) => handle_settings(&config, cmd),
        Command::Config(_) => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

fn print_origin_notice(origin: &FetchOrigin) {
    if let FetchOrigin::Fallback { reason } = origin {
        println!("! Backend unavailable ({reason}); showing sample data.");
        println!();
    }
}

async fn handle_home(config: &Config, cmd: &HomeCommand) -> Result<()> {
    let client = ApiClient::from_config(config).context("failed to build API client")?;

    if !cmd.watch {
        let home = load_home(&client).await;
        return render_home(&home, cmd.json);
    }

    let poller = Poller::new("home", config.density_interval());
    let handle = poller.handle();
    if !cmd.json {
        println!(
            "Refreshing every {}s; press Ctrl-C to stop.",
            poller.period().as_secs()
        );
        println!();
    }

    tokio::spawn(handle.clone().cancel_on(tokio::signal::ctrl_c()));

    let mut failure = None;
    watch_home(&client, poller, |home| {
        if let Err(e) = render_home(&home, cmd.json) {
            failure.get_or_insert(e);
            handle.cancel();
        }
    })
    .await;

    failure.map_or(Ok(()), Err)
}

fn render_home(home: &Fetched<DensitySnapshot>, json: bool) -> Result<()> {
    if json {
        return print_json(home);
    }

    print_origin_notice(&home.origin);
    let snapshot = &home.data;
    if snapshot.is_empty() {
        println!("No lane data available.");
        return Ok(());
    }

    println!("Lane Status");
    println!("===========");
    for lane in &snapshot.lanes {
        let legend = lane.status.legend();
        println!(
            "  {:<10} {:<9} {:>4}  {}",
            lane.lane_label, legend.short_label, lane.density, legend.label
        );
    }

    println!();
    println!("Density (last {} minutes with readings)", snapshot.chart.len());
    print!("  {:<6}", "Time");
    for lane in 1..=CHART_LANES {
        print!(" {:>7}", format!("Lane {lane}"));
    }
    println!();
    for point in &snapshot.chart {
        print!("  {:<6}", point.time_bucket);
        for lane_id in (1..).take(CHART_LANES) {
            let density = point.density_for(lane_id).unwrap_or_default();
            print!(" {density:>7}");
        }
        println!();
    }

    println!();
    println!("Legend");
    for status in DensityStatus::ALL {
        let legend = status.legend();
        println!(
            "  {:<9} {:<7} {}",
            legend.short_label, legend.sensor_band, legend.description
        );
    }
    Ok(())
}

async fn handle_violations(config: &Config, cmd: &ViolationsCommand) -> Result<()> {
    let settings = &config.settings;
    let client = ApiClient::from_config(config).context("failed to build API client")?;
    let fetched = load_violation_log(&client, cmd.filter_state()).await;

    if cmd.json {
        return print_json(&fetched.map(|log| {
            serde_json::json!({
                "filters": log.filters(),
                "total": log.all().len(),
                "violations": log.filtered(),
            })
        }));
    }

    let log = &fetched.data;
    print_origin_notice(&fetched.origin);
    if !log.filters().is_unfiltered() {
        let filters = log.filters();
        println!(
            "Filters: date {}, speed {}, lane {}",
            filters.active_date().unwrap_or("any"),
            filters.speed_range,
            filters.lane
        );
    }
    println!("{}", log.summary());
    if log.filtered().is_empty() {
        println!("No violations match the current filters.");
        return Ok(());
    }

    println!();
    println!(
        "  {:<6} {:<8} {:<11} {:<9} {:>5} {:>5} {:>6} {:>7}",
        "ID", "Lane", "Date", "Time", "Speed", "Limit", "Excess", "Set"
    );
    for v in log.filtered() {
        // Local limit from settings, next to the one the camera recorded.
        let configured = settings
            .speed_limit_for(&v.lane)
            .map_or_else(|| "-".to_string(), |limit| limit.to_string());
        println!(
            "  {:<6} {:<8} {:<11} {:<9} {:>5} {:>5} {:>+6} {:>7}",
            v.id,
            v.lane,
            v.observed_date,
            v.observed_time,
            v.speed,
            v.speed_limit,
            v.excess_speed(),
            configured
        );
    }
    Ok(())
}

async fn handle_lanes(config: &Config, cmd: &LanesCommand) -> Result<()> {
    let client = ApiClient::from_config(config).context("failed to build API client")?;
    let fetched = load_violation_log(&client, FilterState::default()).await;
    let lanes = fetched.data.unique_lanes();

    if cmd.json {
        return print_json(&fetched.map(|_| lanes));
    }

    print_origin_notice(&fetched.origin);
    if lanes.is_empty() {
        println!("No lanes recorded.");
    }
    for lane in lanes {
        println!("{lane}");
    }
    Ok(())
}

async fn handle_reports(config: &Config, cmd: &ReportsCommand) -> Result<()> {
    let client = ApiClient::from_config(config).context("failed to build API client")?;
    let time_frame = TimeFrame::from(cmd.time_frame);
    let report = load_report(&client, time_frame).await;

    if cmd.json {
        return print_json(&report);
    }

    print_origin_notice(&report.origin);
    println!("Traffic report ({time_frame})");
    println!();
    println!("  {:<8} {:>8} {:>10}", time_frame.axis_label(), "Traffic", "Violations");
    for point in &report.data {
        println!(
            "  {:<8} {:>8} {:>10}",
            point.label, point.traffic, point.violations
        );
    }

    let sums = totals(&report.data);
    println!();
    println!("  Total violations: {}", sums.violations);
    if let Some(peak) = sums.peak_traffic {
        println!("  Peak traffic:     {peak}");
    }
    Ok(())
}

fn handle_settings(config: &Config, cmd: SettingsCommand) -> Result<()> {
    let mut settings = config.settings.clone();
    let changed = !cmd.set_limit.is_empty() || !cmd.toggle.is_empty();

    for assignment in &cmd.set_limit {
        settings
            .set_speed_limit(&assignment.lane, &assignment.value)
            .with_context(|| format!("cannot set speed limit for {}", assignment.lane))?;
    }
    for switch in cmd.toggle {
        settings.toggle(switch.into());
    }
    if changed {
        warn!("Settings changes are not saved; edit the config file to keep them");
    }

    if cmd.json {
        return print_json(&settings);
    }

    println!("Speed Limits");
    println!("============");
    for lane in &settings.lanes {
        println!("  {:<10} {:>3} km/h", lane.name, lane.speed_limit);
    }
    println!();
    println!("Notifications");
    println!("=============");
    for kind in NotificationKind::ALL {
        let state = if settings.notifications.get(kind) {
            "on"
        } else {
            "off"
        };
        println!("  {:<28} {state}", kind.label());
    }
    println!();
    println!("Theme: {}", settings.theme);
    Ok(())
}

fn handle_config(config_path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                print_json(&config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.base_url());
                println!(
                    "  Hosting domain:     {}",
                    config.api.hosting_domain.as_deref().unwrap_or("-")
                );
                println!("  Request timeout:    {}s", config.api.request_timeout_secs);
                println!();
                println!("[Polling]");
                println!(
                    "  Density interval:   {}s",
                    config.polling.density_interval_secs
                );
                println!();
                println!("[Settings]");
                println!("  Lanes:              {}", config.settings.lanes.len());
                println!("  Theme:              {}", config.settings.theme);
            }
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                config_path
                    .unwrap_or_else(Config::default_config_path)
                    .display()
            );
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
