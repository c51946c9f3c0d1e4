mod commands;

use clap::{Parser, Subcommand};
use commands::EXIT_FAILURE;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "binrpm",
    version,
    about = "Generate binary RPM packages from a declarative descriptor"
)]
struct Cli {
    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the spec file and print it to standard output.
    GenerateSpec {
        /// Path to the package descriptor.
        #[arg(short, long, default_value = "rpm.json")]
        file: PathBuf,
        /// Target architecture of the build.
        #[arg(short, long)]
        arch: Option<String>,
        /// Target version of the build.
        #[arg(long = "version", value_name = "VERSION")]
        pkg_version: Option<String>,
    },
    /// Build the package and deliver it into the output directory.
    Generate {
        /// Path to the package descriptor.
        #[arg(short, long, default_value = "rpm.json")]
        file: PathBuf,
        /// Target architecture of the build.
        #[arg(short, long)]
        arch: Option<String>,
        /// Target version of the build.
        #[arg(long = "version", value_name = "VERSION")]
        pkg_version: Option<String>,
        /// Path to the build area.
        #[arg(short = 'b', long, default_value = "pkg-build")]
        build_area: PathBuf,
        /// Directory the finished package is delivered into.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Packaging backend: rpmbuild or mock.
        #[arg(long, default_value = "rpmbuild")]
        builder: String,
    },
    /// Check that the descriptor file parses.
    Test {
        /// Path to the package descriptor.
        #[arg(short, long, default_value = "rpm.json")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BINRPM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::GenerateSpec {
            file,
            arch,
            pkg_version,
        } => commands::generate_spec::run(
            &file,
            commands::resolve_arch(arch).as_deref(),
            pkg_version.as_deref(),
        ),
        Commands::Generate {
            file,
            arch,
            pkg_version,
            build_area,
            output,
            builder,
        } => commands::generate::run(
            &file,
            commands::resolve_arch(arch).as_deref(),
            pkg_version.as_deref(),
            &build_area,
            output.as_deref(),
            &builder,
        ),
        Commands::Test { file } => commands::test::run(&file),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
