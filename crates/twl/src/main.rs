//! twl CLI - link-time trace instrumentation generator.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};
use twl::{Compiler, RunConfig, TraceLinker, config};

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "twl=info",
        1 => "twl=debug",
        _ => "twl=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("parsing log directive")),
        )
        .with_target(false)
        .init();

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let tracer = match config::load(&cli.config) {
        Ok(tracer) => tracer,
        Err(e) => {
            eprintln!("error: {}: {e}", cli.config.display());
            return EXIT_FAILURE;
        }
    };

    // CLI takes precedence over configured options for the compiler.
    let mut compiler = cli.cc.as_ref().map_or_else(
        || tracer.option("cc").map_or_else(Compiler::default, Compiler::new),
        Compiler::new,
    );
    if let Some(flags) = tracer.option("cflags") {
        for flag in flags.split_whitespace() {
            compiler.push_cflag(flag);
        }
    }
    for flag in &cli.cflags {
        compiler.push_cflag(flag);
    }

    let run = RunConfig {
        dump_on_error: tracer.option("dump-on-error").is_some(),
        keep: cli.keep,
        wrapper_base: cli.wrapper.clone(),
        compiler,
        ctf: cli.ctf || tracer.options.is("gen-metadata", "ctf"),
    };

    let verbose = cli.verbose > 0 || tracer.option("verbose").is_some();

    let mut linker = TraceLinker::new(tracer, run);
    let artifacts = match linker.generate() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_FAILURE;
        }
    };

    if verbose {
        let _ = linker.tracer().dump(&mut std::io::stderr());
    }

    if !cli.link_args.is_empty() {
        if let Err(e) = linker.link(&artifacts.wrapper_o, &cli.link_args) {
            eprintln!("error: {e}");
            return EXIT_FAILURE;
        }
    }

    EXIT_SUCCESS
}
