//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::TransformService;
use crate::cli::args::{Cli, Commands, ConfigCommands, ParseArgs, RenderArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Render {
            notation,
            parse,
            render,
        }) => cmd_render(cli, notation.as_deref(), parse, render),
        Some(Commands::Check { notation, parse }) => cmd_check(cli, notation.as_deref(), parse),
        Some(Commands::Batch {
            file,
            parse,
            render,
        }) => cmd_batch(cli, file, parse, render),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "treestr", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'treestr --help'".into(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

/// Notation from the argument, or stdin when absent or "-".
fn read_notation(notation: Option<&str>) -> CliResult<String> {
    match notation {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => read_stdin(),
    }
}

fn read_stdin() -> CliResult<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CliError::io("read stdin", e))?;
    Ok(buf)
}

#[instrument(skip(cli))]
fn cmd_render(
    cli: &Cli,
    notation: Option<&str>,
    parse: &ParseArgs,
    render: &RenderArgs,
) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    parse.apply(&mut settings);
    render.apply(&mut settings);
    let format = settings.render.format;

    let raw = read_notation(notation)?;
    let service = TransformService::new(settings);
    let rendered = service.transform(&raw, format)?;
    output::info(&rendered);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_check(cli: &Cli, notation: Option<&str>, parse: &ParseArgs) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    parse.apply(&mut settings);

    let raw = read_notation(notation)?;
    let service = TransformService::new(settings);
    let tree = service.parse(&raw)?;
    let stats = service.stats(&tree);
    debug!("cmd_check: {:?}", stats);

    output::success(&format!("valid tree rooted at {}", tree.label()));
    output::detail(&format!("nodes:  {}", stats.nodes));
    output::detail(&format!("leaves: {}", stats.leaves));
    output::detail(&format!("depth:  {}", stats.depth));
    if stats.duplicates > 0 {
        for (parent, label) in tree.duplicate_siblings() {
            output::warning(&format!("label {label} repeats under {parent}"));
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_batch(cli: &Cli, file: &Path, parse: &ParseArgs, render: &RenderArgs) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    parse.apply(&mut settings);
    render.apply(&mut settings);
    let format = settings.render.format;

    let content = if file == Path::new("-") {
        read_stdin()?
    } else {
        if !file.exists() {
            return Err(CliError::InputNotFound(file.to_path_buf()));
        }
        std::fs::read_to_string(file)
            .map_err(|e| CliError::io(format!("read {}", file.display()), e))?
    };

    let service = TransformService::new(settings);
    let results = service.transform_batch(&content, format);
    let total = results.len();
    let mut failed = 0;
    for entry in results {
        match entry.result {
            Ok(rendered) => output::info(&rendered),
            Err(e) => {
                failed += 1;
                output::error(&format!("line {}: {}", entry.line, e));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this system"),
        },
    }
    Ok(())
}
