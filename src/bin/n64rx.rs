// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! n64rx entry point
//!
//! Parses the command line, runs one console lifecycle, and exits with the
//! code of the first failing startup stage (0 on a clean stop).

use n64rx::core::config::{Config, CONFIG_ENV_VAR};
use n64rx::core::lifecycle::{Backend, Lifecycle};
use n64rx::frontend::cli::{self, Invocation};
use n64rx::frontend::HeadlessBackend;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the port advertisement
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let default_config = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);

    let config = match cli::parse_args(std::env::args(), default_config.as_deref()) {
        Ok(Invocation::Usage(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run(config)) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if config.is_headless() {
        launch(HeadlessBackend, &config)
    } else {
        launch_windowed(&config)
    }
}

#[cfg(feature = "window")]
fn launch_windowed(config: &Config) -> ExitCode {
    launch(n64rx::frontend::DesktopBackend, config)
}

#[cfg(not(feature = "window"))]
fn launch_windowed(config: &Config) -> ExitCode {
    log::warn!("Built without window support; running headless");
    launch(HeadlessBackend, config)
}

fn launch<B: Backend>(backend: B, config: &Config) -> ExitCode {
    let mut lifecycle = Lifecycle::new(backend);

    match lifecycle.execute(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
