// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Command-line surface (component C11). `clap`'s derive API covers the global flags
//! (`--xrm`, `--help`, `--version`) cleanly, but the repeated `[-n <name>]
//! [--working-directory <dir>] [<command>]` tab grammar — where `-n` and
//! `--working-directory` apply only to the *next* positional and then reset — has no
//! clean derive expression, so the trailing arguments are captured raw and walked by
//! hand in [`parse_tab_specs`].

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, TerminalCoreError};

#[derive(Parser, Debug)]
#[command(name = "terminator", about = "A terminal emulator core", version)]
pub struct Cli {
    /// Set or override a resource, as `key: value` (repeatable).
    #[arg(long = "xrm", value_name = "RESOURCE")]
    pub xrm: Vec<String>,

    /// `[-n <name>] [--working-directory <dir>] [<command>]...`, repeated; parsed by
    /// hand in [`parse_tab_specs`] since clap's derive has no "flag resets after the
    /// next positional" grammar.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// One requested tab: the command to spawn (a login/non-login shell if `None`), its
/// title override, and its working directory override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabSpec {
    pub name: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub command: Option<String>,
}

/// Walk the trailing tokens, yielding one [`TabSpec`] per positional `<command>`
/// (or one empty spec if no positionals were given at all, meaning "spawn the login
/// shell"). `-n`/`--working-directory` apply to the next positional and then reset.
///
/// # Errors
/// Returns [`TerminalCoreError::ConfigParseError`] if `-n` or `--working-directory` is
/// given without a following value.
pub fn parse_tab_specs(tokens: &[String]) -> Result<Vec<TabSpec>> {
    let mut specs = Vec::new();
    let mut pending = TabSpec::default();
    let mut saw_anything = false;

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        saw_anything = true;
        match token.as_str() {
            "-n" => {
                let value = next_value(&mut iter, "-n")?;
                pending.name = Some(value);
            }
            "--working-directory" => {
                let value = next_value(&mut iter, "--working-directory")?;
                pending.working_directory = Some(PathBuf::from(value));
            }
            command => {
                pending.command = Some(command.to_string());
                specs.push(std::mem::take(&mut pending));
            }
        }
    }

    // A trailing `-n`/`--working-directory` with no command after it still describes
    // one tab (a shell with just a title or cwd override).
    if pending.name.is_some() || pending.working_directory.is_some() {
        specs.push(pending);
    }

    if !saw_anything {
        specs.push(TabSpec::default());
    }

    Ok(specs)
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String> {
    iter.next().cloned().ok_or_else(|| {
        miette::Report::new(TerminalCoreError::ConfigParseError {
            source_desc: "command line".into(),
            reason: format!("{flag} requires a value"),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &[&str]) -> Vec<String> { s.iter().map(|t| t.to_string()).collect() }

    #[test]
    fn no_arguments_spawns_one_login_shell() {
        let specs = parse_tab_specs(&[]).unwrap();
        assert_eq!(specs, vec![TabSpec::default()]);
    }

    #[test]
    fn bare_command_spawns_one_tab() {
        let specs = parse_tab_specs(&tokens(&["bash"])).unwrap();
        assert_eq!(specs, vec![TabSpec { command: Some("bash".into()), ..Default::default() }]);
    }

    #[test]
    fn name_and_cwd_apply_to_next_command_then_reset() {
        let specs = parse_tab_specs(&tokens(&[
            "-n", "build", "--working-directory", "/tmp", "cargo", "vim",
        ]))
        .unwrap();
        assert_eq!(
            specs,
            vec![
                TabSpec {
                    name: Some("build".into()),
                    working_directory: Some("/tmp".into()),
                    command: Some("cargo".into()),
                },
                TabSpec { command: Some("vim".into()), ..Default::default() },
            ]
        );
    }

    #[test]
    fn missing_flag_value_is_a_config_parse_error() {
        let err = parse_tab_specs(&tokens(&["-n"]));
        assert!(err.is_err());
    }
}
