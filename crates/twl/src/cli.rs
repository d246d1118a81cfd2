//! CLI definitions.

use std::path::PathBuf;

use clap::Parser;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "twl")]
#[command(about = "Link-time trace instrumentation - wraps functions via symbol wrapping")]
#[command(version)]
pub struct Cli {
    /// Tracer configuration file (YAML)
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Base path (without extension) for the retained wrapper source and
    /// object files
    #[arg(short = 'W', long = "wrapper", value_name = "PATH")]
    pub wrapper: Option<PathBuf>,

    /// Target C compiler command (e.g. cc, gcc-13, arm-none-eabi-gcc)
    #[arg(short = 'c', long = "cc", value_name = "CC")]
    pub cc: Option<String>,

    /// Extra C compiler flag, may be given multiple times
    #[arg(short = 'f', long = "cflags", value_name = "FLAG")]
    pub cflags: Vec<String>,

    /// Emit CTF metadata alongside the wrapper code
    #[arg(long)]
    pub ctf: bool,

    /// Keep temporary files
    #[arg(short, long)]
    pub keep: bool,

    /// Enable verbose output, can be given multiple times
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Objects and flags handed to the final link; omit to stop after
    /// compiling the wrapper
    #[arg(last = true, value_name = "LINK-ARGS")]
    pub link_args: Vec<String>,
}
