//! xtask - Development automation for taskboard
//!
//! Usage: cargo xtask <command>
//!
//! This provides type-safe, cross-platform build automation that replaces
//! shell scripts with Rust code.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "taskboard development automation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all checks (compile, clippy, tests) - fast pre-commit validation
    Check,

    /// Run clippy across the workspace
    Clippy {
        /// Fix warnings automatically
        #[arg(long)]
        fix: bool,
    },

    /// Run tests
    Test {
        /// Run only lib tests (faster)
        #[arg(long)]
        lib: bool,
        /// Filter test name
        #[arg(long)]
        filter: Option<String>,
    },

    /// Format code
    Fmt {
        /// Check only, don't modify
        #[arg(long)]
        check: bool,
    },

    /// Build the WASM bundle into crates/taskboard-ui/static/wasm
    Wasm {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },

    /// Full CI pipeline (fmt, clippy, test, wasm)
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cli.command {
        Command::Check => check(&sh),
        Command::Clippy { fix } => clippy(&sh, fix),
        Command::Test { lib, filter } => test(&sh, lib, filter),
        Command::Fmt { check } => fmt(&sh, check),
        Command::Wasm { release } => build_wasm(&sh, release),
        Command::Ci => ci(&sh),
    }
}

fn project_root() -> Result<std::path::PathBuf> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR not set")?;
    let path = std::path::PathBuf::from(manifest_dir);
    // xtask lives at <root>/xtask, so go up one level
    Ok(path
        .parent()
        .context("xtask has no parent directory")?
        .to_path_buf())
}

fn check(sh: &Shell) -> Result<()> {
    println!("Running checks...");

    println!("  Checking compilation...");
    cmd!(sh, "cargo check --workspace").run()?;

    println!("  Running clippy...");
    cmd!(sh, "cargo clippy --workspace -- -D warnings").run()?;

    println!("  Running tests...");
    cmd!(sh, "cargo test --workspace --lib").run()?;

    println!("All checks passed!");
    Ok(())
}

fn clippy(sh: &Shell, fix: bool) -> Result<()> {
    if fix {
        cmd!(sh, "cargo clippy --workspace --fix --allow-dirty").run()?;
    } else {
        cmd!(sh, "cargo clippy --workspace -- -D warnings").run()?;
    }
    Ok(())
}

fn test(sh: &Shell, lib: bool, filter: Option<String>) -> Result<()> {
    let mut args = vec!["test", "--workspace"];
    if lib {
        args.push("--lib");
    }
    if let Some(filter) = &filter {
        args.push(filter);
    }
    cmd!(sh, "cargo {args...}").run()?;
    Ok(())
}

fn fmt(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

fn build_wasm(sh: &Shell, release: bool) -> Result<()> {
    let root = project_root()?;
    let wasm_out = root.join("crates/taskboard-ui/static/wasm");

    // Ensure wasm-pack is installed
    if cmd!(sh, "which wasm-pack").run().is_err() {
        println!("Installing wasm-pack...");
        cmd!(sh, "cargo install wasm-pack").run()?;
    }

    println!("\n=== Building taskboard-ui WASM ===");
    let crate_dir = root.join("crates/taskboard-ui");
    sh.change_dir(&crate_dir);

    let out_dir = wasm_out.to_str().context("Invalid wasm output path")?;
    if release {
        cmd!(
            sh,
            "wasm-pack build --release --target web --out-dir {out_dir}"
        )
        .run()
        .context("Failed to build taskboard-ui WASM")?;
    } else {
        cmd!(sh, "wasm-pack build --dev --target web --out-dir {out_dir}")
            .run()
            .context("Failed to build taskboard-ui WASM")?;
    }

    sh.change_dir(root);
    println!("\nWASM bundle built to: {}", wasm_out.display());
    println!("Serve crates/taskboard-ui/static/ with any static file server.");
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("\n=== Format Check ===");
    fmt(sh, true)?;

    println!("\n=== Clippy ===");
    cmd!(sh, "cargo clippy --workspace -- -D warnings").run()?;

    println!("\n=== Tests ===");
    cmd!(sh, "cargo test --workspace").run()?;

    println!("\n=== WASM Build ===");
    build_wasm(sh, true)?;

    println!("\nCI pipeline passed!");
    Ok(())
}
