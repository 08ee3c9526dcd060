//! The compiler for the Hashline Templating Engine.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    clap::{
        Parser,
        Subcommand,
    },
    hashline_core::{
        read_context,
        read_file,
        Context,
        Engine,
        EngineConfig,
        Error,
        Result,
    },
    std::{
        io::stderr,
        path::{
            Path,
            PathBuf,
        },
        process::ExitCode,
    },
    tracing_subscriber::EnvFilter,
};


const NOTICE: &str = include_str!("../NOTICE.txt");

#[derive(Debug, Parser)]
#[command(name = "hlc", version, about = "Render and verify hashline templates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log compile and render steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the license notice
    #[arg(short, long = "license-notice")]
    license_notice: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a template and print its output
    Render {
        template: PathBuf,

        /// A json object to render against
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Engine settings as json
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check a template's structure and print its outline as json
    Verify {
        template: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    }
    else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}

fn render(template: PathBuf, context: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(p) => EngineConfig::read(p)?,
        None => EngineConfig::default(),
    };

    let context = match context {
        Some(p) => read_context(p)?,
        None => Context::new(),
    };

    let content = read_file(&template)?;
    let output = Engine::with_config(config).evaluate(&content, &context)?;

    println!("{output}");

    Ok(())
}

fn outline_json(template: &Path) -> Result<String> {
    let content = read_file(template)?;
    let outline = Engine::new().verify(&content)?;

    serde_json::to_string_pretty(&outline).map_err(|e| Error::JsonParse(e, template.into()))
}

fn verify(template: PathBuf) -> Result<()> {
    let json = outline_json(&template)?;
    tracing::debug!(bytes = json.len(), "serialized outline");

    println!("{json}");

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.license_notice {
        println!("{NOTICE}");
        return ExitCode::SUCCESS;
    }

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Command::Render { template, context, config, }) => render(template, context, config),
        Some(Command::Verify { template, }) => verify(template),
        None => {
            eprintln!("A command must be given, see --help.");
            return ExitCode::FAILURE;
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
