// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Terminal view for the devices screen.
//!
//! Usage: `home-switches [CONFIG]`. Without an argument the configuration
//! is read from the platform config directory
//! (`<config_dir>/home-switches/config.json`).
//!
//! Type a device id and press enter to flip it, `q` to quit. Logs go to
//! stderr and honour `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use home_switches::config::AppConfig;
use home_switches::event::ScreenEvent;
use home_switches::screen::{DevicesScreen, ScreenHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let Some(path) = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(AppConfig::default_path)
    else {
        tracing::error!("Could not determine config directory, pass a config path");
        return ExitCode::FAILURE;
    };

    let config = match AppConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    let registry = match config.registry() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "Invalid device list");
            return ExitCode::FAILURE;
        }
    };

    let screen = DevicesScreen::connect_mqtt(registry, config.broker);
    let mut events = screen.subscribe();
    let handle = screen.mount();
    let mut snapshots = handle.watch();
    render(&handle);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let input = line.trim();
                    if input.eq_ignore_ascii_case("q") {
                        break;
                    }
                    if input.is_empty() {
                        continue;
                    }
                    if let Err(e) = handle.toggle(input).await {
                        println!("{e}");
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read input");
                    break;
                }
            },

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&handle);
            },

            event = events.recv() => match event {
                Ok(ScreenEvent::Alert { title, message }) => println!("{title}: {message}"),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "View lagged behind screen events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.unmount().await;
    ExitCode::SUCCESS
}

fn render(handle: &ScreenHandle) {
    println!("\n{}", handle.snapshot());
    println!("type a device id to toggle it, q to quit");
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
