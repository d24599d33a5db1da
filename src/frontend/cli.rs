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

//! Command-line parsing
//!
//! The command line is `[options] <pifrom> <cart>`. Options take a `-`, `--`
//! or `/` prefix. Unknown options and options missing their value are
//! reported and skipped; malformed values are errors. The surviving options
//! are validated by clap.

use crate::core::config::{Config, ConfigFile, ControllerType};
use crate::core::error::{EmulatorError, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Program name plus the two mandatory images
const MIN_ARGS: usize = 3;

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Too few arguments: print this text and exit successfully
    Usage(String),
    /// Start the console
    Run(Config),
}

/// Validated option set
#[derive(Parser, Debug)]
#[command(name = "n64rx", no_binary_name = true, args_override_self = true)]
struct CliArgs {
    /// Input-device emulation profile
    #[arg(long, value_enum)]
    controller: Option<ControllerType>,

    /// EEPROM backing file
    #[arg(long)]
    eeprom: Option<PathBuf>,

    /// Control-channel port (0 = ephemeral)
    #[arg(long)]
    port: Option<u16>,

    /// SRAM backing file
    #[arg(long)]
    sram: Option<PathBuf>,

    /// TOML file with default options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without opening a window
    #[arg(long, overrides_with = "windowed")]
    headless: bool,

    /// Open a window even if the config file says headless
    #[arg(long, overrides_with = "headless")]
    windowed: bool,

    /// PIF boot ROM
    pif_rom: PathBuf,

    /// Cartridge image
    cartridge: PathBuf,
}

/// Whether an option consumes the following token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Value,
    Switch,
}

const OPTIONS: [(&str, Arity); 7] = [
    ("controller", Arity::Value),
    ("eeprom", Arity::Value),
    ("port", Arity::Value),
    ("sram", Arity::Value),
    ("config", Arity::Value),
    ("headless", Arity::Switch),
    ("windowed", Arity::Switch),
];

/// Usage text
///
/// # Example
///
/// ```
/// let text = n64rx::frontend::cli::usage("n64rx");
/// assert!(text.starts_with("Usage: n64rx [options] <pifrom> <cart>"));
/// ```
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {} [options] <pifrom> <cart>\n\n\
         Options:\n  \
         -controller [keyboard,mayflash64,retrolink,wiiu,x360]\n  \
         -eeprom <file>\n  \
         -port 0, <1..65535>\n  \
         -sram <file>\n  \
         -config <file>\n  \
         -headless\n  \
         -windowed\n\n",
        program
    )
}

/// Parse a full command line, program name included
///
/// # Arguments
///
/// * `args` - Command line, `args[0]` being the program name
/// * `default_config` - Defaults file used when `-config` is not given
///
/// # Errors
///
/// Returns `EmulatorError::InvalidArgument` for malformed or out-of-range
/// option values, or an unreadable config file.
///
/// # Example
///
/// ```
/// use n64rx::frontend::cli::{parse_args, Invocation};
///
/// let invocation = parse_args(["n64rx", "-port", "0", "pifrom.bin", "game.z64"], None)?;
/// match invocation {
///     Invocation::Run(config) => assert_eq!(config.port, Some(0)),
///     Invocation::Usage(_) => unreachable!(),
/// }
/// # Ok::<(), n64rx::EmulatorError>(())
/// ```
pub fn parse_args<I, S>(args: I, default_config: Option<&Path>) -> Result<Invocation>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    if args.len() < MIN_ARGS {
        let program = args.first().map(String::as_str).unwrap_or("n64rx");
        return Ok(Invocation::Usage(usage(program)));
    }

    let (options, images) = args[1..].split_at(args.len() - MIN_ARGS);
    let mut normalized = normalize_options(options);
    normalized.push("--".to_string());
    normalized.extend(images.iter().cloned());

    let cli = CliArgs::try_parse_from(normalized)
        .map_err(|e| EmulatorError::InvalidArgument(e.to_string().trim_end().to_string()))?;

    let mut config = Config::new(cli.pif_rom, cli.cartridge);
    config.controller = cli.controller;
    config.eeprom = cli.eeprom;
    config.sram = cli.sram;
    config.port = cli.port;
    config.headless = match (cli.headless, cli.windowed) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let config = match cli.config.as_deref().or(default_config) {
        Some(path) => config.with_defaults(&ConfigFile::load(path)?),
        None => config,
    };

    Ok(Invocation::Run(config))
}

/// Rewrite recognized options as `--name=value`, dropping the rest
fn normalize_options(tokens: &[String]) -> Vec<String> {
    let mut normalized = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        let name = token
            .strip_prefix("--")
            .or_else(|| token.strip_prefix('-'))
            .or_else(|| token.strip_prefix('/'));

        let arity = name.and_then(|name| {
            OPTIONS
                .iter()
                .find(|(option, _)| *option == name)
                .map(|(_, arity)| *arity)
        });

        match (name, arity) {
            (Some(name), Some(Arity::Switch)) => normalized.push(format!("--{}", name)),
            (Some(name), Some(Arity::Value)) => match tokens.get(i) {
                Some(value) => {
                    normalized.push(format!("--{}={}", name, value));
                    i += 1;
                }
                None => log::warn!("-{}: Missing argument; ignoring.", name),
            },
            _ => log::warn!("{}: Unrecognized option; ignoring.", token),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> Config {
        match parse_args(args.iter().copied(), None).unwrap() {
            Invocation::Run(config) => config,
            Invocation::Usage(text) => panic!("unexpected usage: {}", text),
        }
    }

    fn parse_err(args: &[&str]) -> EmulatorError {
        parse_args(args.iter().copied(), None).unwrap_err()
    }

    #[test]
    fn test_too_few_arguments_prints_usage() {
        for args in [&["n64rx"][..], &["n64rx", "pifrom.bin"][..]] {
            match parse_args(args.iter().copied(), None).unwrap() {
                Invocation::Usage(text) => assert!(text.contains("-controller")),
                Invocation::Run(config) => panic!("unexpected run: {:?}", config),
            }
        }
    }

    #[test]
    fn test_empty_command_line() {
        let args: [&str; 0] = [];
        assert!(matches!(
            parse_args(args, None).unwrap(),
            Invocation::Usage(_)
        ));
    }

    #[test]
    fn test_positionals_only() {
        let config = run(&["n64rx", "pifrom.bin", "game.z64"]);
        assert_eq!(config, Config::new("pifrom.bin", "game.z64"));
    }

    #[test]
    fn test_all_options() {
        let config = run(&[
            "n64rx",
            "-controller",
            "wiiu",
            "-eeprom",
            "game.eep",
            "-port",
            "7000",
            "-sram",
            "save.bin",
            "-headless",
            "pifrom.bin",
            "game.z64",
        ]);

        assert_eq!(config.controller, Some(ControllerType::WiiU));
        assert_eq!(config.eeprom, Some(PathBuf::from("game.eep")));
        assert_eq!(config.port, Some(7000));
        assert_eq!(config.sram, Some(PathBuf::from("save.bin")));
        assert!(config.is_headless());
        assert_eq!(config.pif_rom, PathBuf::from("pifrom.bin"));
        assert_eq!(config.cartridge, PathBuf::from("game.z64"));
    }

    #[test]
    fn test_sram_path() {
        let config = run(&["n64rx", "-sram", "save.bin", "pifrom.bin", "game.z64"]);
        assert_eq!(config.sram, Some(PathBuf::from("save.bin")));
    }

    #[test]
    fn test_prefix_styles() {
        let config = run(&[
            "n64rx", "--port", "1", "/sram", "a.sra", "-eeprom", "b.eep", "pifrom.bin", "game.z64",
        ]);
        assert_eq!(config.port, Some(1));
        assert_eq!(config.sram, Some(PathBuf::from("a.sra")));
        assert_eq!(config.eeprom, Some(PathBuf::from("b.eep")));
    }

    #[test]
    fn test_port_out_of_range() {
        let err = parse_err(&["n64rx", "-port", "70000", "pifrom.bin", "game.z64"]);
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 255);
    }

    #[test]
    fn test_port_not_numeric() {
        let err = parse_err(&["n64rx", "-port", "abc", "pifrom.bin", "game.z64"]);
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
    }

    #[test]
    fn test_port_negative() {
        let err = parse_err(&["n64rx", "-port", "-1", "pifrom.bin", "game.z64"]);
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_controller() {
        let err = parse_err(&["n64rx", "-controller", "joystick", "pifrom.bin", "game.z64"]);
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
    }

    #[test]
    fn test_unrecognized_options_ignored() {
        let config = run(&["n64rx", "-fullscreen", "stray", "pifrom.bin", "game.z64"]);
        assert_eq!(config, Config::new("pifrom.bin", "game.z64"));
    }

    #[test]
    fn test_missing_value_ignored() {
        let config = run(&["n64rx", "-eeprom", "pifrom.bin", "game.z64"]);
        assert_eq!(config.eeprom, None);
    }

    #[test]
    fn test_last_value_wins() {
        let config = run(&["n64rx", "-port", "1", "-port", "2", "pifrom.bin", "game.z64"]);
        assert_eq!(config.port, Some(2));
    }

    #[test]
    fn test_image_paths_starting_with_dash() {
        let config = run(&["n64rx", "-pifrom.bin", "-game.z64"]);
        assert_eq!(config.pif_rom, PathBuf::from("-pifrom.bin"));
        assert_eq!(config.cartridge, PathBuf::from("-game.z64"));
    }

    #[test]
    fn test_config_file_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n64rx.toml");
        std::fs::write(&path, "controller = \"x360\"\nport = 9000\n").unwrap();
        let path_arg = path.to_str().unwrap();

        let config = run(&[
            "n64rx", "-config", path_arg, "-port", "0", "pifrom.bin", "game.z64",
        ]);

        assert_eq!(config.controller, Some(ControllerType::X360));
        assert_eq!(config.port, Some(0));
    }

    #[test]
    fn test_default_config_used_without_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n64rx.toml");
        std::fs::write(&path, "headless = true\n").unwrap();

        let invocation = parse_args(["n64rx", "pifrom.bin", "game.z64"], Some(&path)).unwrap();
        match invocation {
            Invocation::Run(config) => assert!(config.is_headless()),
            Invocation::Usage(_) => panic!("unexpected usage"),
        }
    }

    #[test]
    fn test_windowed_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n64rx.toml");
        std::fs::write(&path, "headless = true\n").unwrap();

        let invocation =
            parse_args(["n64rx", "-windowed", "pifrom.bin", "game.z64"], Some(&path)).unwrap();
        match invocation {
            Invocation::Run(config) => assert_eq!(config.headless, Some(false)),
            Invocation::Usage(_) => panic!("unexpected usage"),
        }
    }

    #[test]
    fn test_last_display_switch_wins() {
        let config = run(&["n64rx", "-headless", "-windowed", "pifrom.bin", "game.z64"]);
        assert_eq!(config.headless, Some(false));

        let config = run(&["n64rx", "-windowed", "-headless", "pifrom.bin", "game.z64"]);
        assert_eq!(config.headless, Some(true));
    }

    #[test]
    fn test_unreadable_config_file() {
        let err = parse_err(&["n64rx", "-config", "/nonexistent.toml", "pifrom.bin", "game.z64"]);
        assert_eq!(err.exit_code(), 255);
    }

    proptest! {
        #[test]
        fn prop_any_u16_port_accepted(port in any::<u16>()) {
            let text = port.to_string();
            let config = run(&["n64rx", "-port", text.as_str(), "pifrom.bin", "game.z64"]);
            prop_assert_eq!(config.port, Some(port));
        }

        #[test]
        fn prop_ports_above_range_rejected(port in 65536u64..=u64::from(u32::MAX)) {
            let text = port.to_string();
            let err = parse_err(&["n64rx", "-port", text.as_str(), "pifrom.bin", "game.z64"]);
            prop_assert!(matches!(err, EmulatorError::InvalidArgument(_)));
        }
    }
}
