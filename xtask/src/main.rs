use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

type TaskResult = Result<(), Box<dyn Error>>;

const LAMBDA_PACKAGE: &str = "release_pipeline_lambda";

/// Binaries shipped as CodePipeline Lambda actions, with their zip names.
const LAMBDA_BINARIES: [(&str, &str); 3] = [
    ("release_api", "release-api.zip"),
    ("release_function", "release-function.zip"),
    ("release_function_inputs", "release-function-inputs.zip"),
];

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the release pipeline actions workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build the Lambda actions and zip each one as a `bootstrap` executable
    Package {
        /// Compilation target triple of the Lambda runtime
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Package unoptimized binaries
        #[arg(long)]
        debug: bool,
        /// Directory receiving the zip archives
        #[arg(long, env = "RELEASE_DIST_DIR", default_value = "dist")]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    Lint,
    Test,
    /// Lint then test
    Check,
}

fn cargo(label: &str, args: &[&str]) -> TaskResult {
    eprintln!("\n=== {label} ===\n+ cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` exited with {status}", args.join(" ")).into())
    }
}

fn ci(job: CiJob) -> TaskResult {
    if matches!(job, CiJob::Lint | CiJob::Check) {
        cargo("Formatting", &["fmt", "--all", "--", "--check"])?;
        cargo(
            "Clippy",
            &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        )?;
    }
    if matches!(job, CiJob::Test | CiJob::Check) {
        cargo("Tests", &["test", "--workspace"])?;
    }
    Ok(())
}

fn package(target: &str, debug: bool, output_dir: &Path) -> TaskResult {
    let mut args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for (bin_name, _) in LAMBDA_BINARIES {
        args.extend(["--bin", bin_name]);
    }
    if !debug {
        args.push("--release");
    }
    cargo("Build release actions", &args)?;

    let profile_dir = if debug { "debug" } else { "release" };
    let build_dir = Path::new("target").join(target).join(profile_dir);
    fs::create_dir_all(output_dir)?;
    for (bin_name, zip_name) in LAMBDA_BINARIES {
        let zip_path = output_dir.join(zip_name);
        write_bootstrap_zip(&build_dir.join(bin_name), &zip_path)?;
        eprintln!("packaged {}", zip_path.display());
    }
    Ok(())
}

/// The provided runtime executes the archive entry named `bootstrap`.
fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) -> TaskResult {
    let binary = fs::read(binary_path)
        .map_err(|error| format!("cannot read {}: {error}", binary_path.display()))?;
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    let mut zip = ZipWriter::new(File::create(zip_path)?);
    zip.start_file("bootstrap", options)?;
    zip.write_all(&binary)?;
    zip.finish()?;
    Ok(())
}

fn main() -> ExitCode {
    let result = match Cli::parse().command {
        Commands::Ci { job } => ci(job),
        Commands::Package {
            target,
            debug,
            output_dir,
        } => package(&target, debug, &output_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("xtask failed: {error}");
            ExitCode::FAILURE
        }
    }
}
