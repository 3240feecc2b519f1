//! addon-build CLI
//!
//! Entry point for the `addon-build` command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use addon_build::{
    pipeline, BuildEnv, BuildError, InterruptGuard, Profile, Toolchain, EXIT_CODE_INTERRUPTED,
};

#[derive(Parser)]
#[command(name = "addon-build")]
#[command(about = "Build a Rust native addon and publish native/index.node", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the native addon and publish it to native/index.node
    Build {
        /// Build with the release profile
        #[arg(long)]
        release: bool,

        /// Rust toolchain to build with, routed through rustup
        #[arg(long, default_value = "default")]
        toolchain: String,

        /// Project root containing the native/ directory (default: current directory)
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },

    /// Print the cargo invocation that `build` would run, without running it
    Explain {
        /// Build with the release profile
        #[arg(long)]
        release: bool,

        /// Rust toolchain to build with, routed through rustup
        #[arg(long, default_value = "default")]
        toolchain: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            release,
            toolchain,
            path,
        } => {
            run_build(release, &toolchain, path);
        }
        Commands::Explain {
            release,
            toolchain,
            json,
        } => {
            run_explain(release, &toolchain, json);
        }
    }
}

fn load_env(path: Option<PathBuf>) -> BuildEnv {
    let mut env = match BuildEnv::from_process() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error reading process environment: {}", e);
            process::exit(1);
        }
    };
    if let Some(root) = path {
        env.project_root = root;
    }
    env
}

fn run_build(release: bool, toolchain: &str, path: Option<PathBuf>) {
    let env = load_env(path);

    let guard = match InterruptGuard::install() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: could not install interrupt handler: {}", e);
            None
        }
    };
    let interrupt = guard.as_ref().map(|g| g.state());

    let result = pipeline::build(
        &env,
        Toolchain::parse(toolchain),
        Profile::from_release_flag(release),
        interrupt.as_deref(),
    );

    match result {
        Ok(()) => {}
        Err(BuildError::Interrupted) => {
            eprintln!("Build interrupted; native/index.node was not updated");
            process::exit(EXIT_CODE_INTERRUPTED);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_explain(release: bool, toolchain: &str, json: bool) {
    let env = load_env(None);
    let invocation = pipeline::plan(
        &env,
        Toolchain::parse(toolchain),
        Profile::from_release_flag(release),
    );

    if json {
        match invocation.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", invocation.command_line());
    }
}
