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

//! Exit codes and port advertisement of the `n64rx` binary

mod common;

use common::fixture;
use std::io::{BufRead, BufReader};
use std::net::{Ipv4Addr, TcpStream};
use std::process::{Command, Stdio};

fn n64rx() -> Command {
    Command::new(env!("CARGO_BIN_EXE_n64rx"))
}

#[test]
fn test_usage_exits_zero() {
    let output = n64rx().arg("pifrom.bin").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Usage: "));
    assert!(stdout.contains("-port 0, <1..65535>"));
}

#[test]
fn test_bad_port_exits_255() {
    let output = n64rx()
        .args(["-headless", "-port", "70000", "pifrom.bin", "game.z64"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(255));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_pif_rom_exits_3() {
    let fixture = fixture();
    let output = n64rx()
        .arg("-headless")
        .arg(fixture.dir.path().join("missing.bin"))
        .arg(&fixture.config.cartridge)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_bad_cartridge_exits_5() {
    let fixture = fixture();
    let output = n64rx()
        .arg("-headless")
        .arg(&fixture.config.pif_rom)
        .arg(fixture.dir.path().join("missing.z64"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_port_advertised_on_stdout() {
    let fixture = fixture();
    let mut child = n64rx()
        .args(["-headless", "-port", "0"])
        .arg(&fixture.config.pif_rom)
        .arg(&fixture.config.cartridge)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut line = String::new();
    let stdout = child.stdout.take().unwrap();
    BufReader::new(stdout).read_line(&mut line).unwrap();
    let port: u16 = line.trim_end().parse().unwrap();
    assert!(line.ends_with('\n'));

    let attached = TcpStream::connect((Ipv4Addr::LOCALHOST, port));

    child.kill().unwrap();
    child.wait().unwrap();
    assert!(attached.is_ok());
}
