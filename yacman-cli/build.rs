//! Build script for yacman-cli.
//!
//! Renders a man page with clap_mangen into OUT_DIR. The command tree is
//! declared here rather than imported, since a build script cannot depend
//! on the crate it builds.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keep in step with src/cli.rs.
fn build_cli() -> Command {
    let file = || Arg::new("file").value_name("FILE").required(true);
    let key = || Arg::new("key").value_name("KEY").required(true);
    let expand = || {
        Arg::new("expand")
            .long("expand")
            .help("Expand ~ and environment variables in string values")
            .action(ArgAction::SetTrue)
    };
    let format = || {
        Arg::new("format")
            .long("format")
            .value_parser(["yaml", "json"])
            .default_value("yaml")
            .help("Output format")
    };

    Command::new("yacman")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit lock-protected YAML configuration files")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("wait-max")
                .long("wait-max")
                .help("Maximum time to wait for a locked file (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("YACMAN_WAIT_MAX"),
        )
        .arg(
            Arg::new("skip-read-lock")
                .long("skip-read-lock")
                .help("Read files without taking the read lock")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands([
            Command::new("show")
                .about("Print a configuration file")
                .args([file(), expand(), format()]),
            Command::new("get")
                .about("Print the value under a key")
                .args([file(), key(), expand(), format()]),
            Command::new("set")
                .about("Set a key and write the file")
                .args([
                    file(),
                    key(),
                    Arg::new("value").value_name("VALUE").required(true),
                    Arg::new("create")
                        .long("create")
                        .help("Create the file if it does not exist")
                        .action(ArgAction::SetTrue),
                ]),
            Command::new("unset")
                .about("Remove a key and write the file")
                .args([file(), key()]),
            Command::new("validate")
                .about("Validate a configuration file against a schema")
                .args([
                    file(),
                    Arg::new("schema")
                        .long("schema")
                        .value_name("SOURCE")
                        .required(true)
                        .help("Schema file path or URL"),
                ]),
            Command::new("lock-status")
                .about("Report whether a file is locked")
                .arg(file()),
            Command::new("unlock")
                .about("Remove a stale lock left behind by a crashed process")
                .arg(file()),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").value_name("SHELL").required(true)),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(
        std::env::var_os("OUT_DIR").ok_or_else(|| io::Error::other("OUT_DIR not set"))?,
    );
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("yacman.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
