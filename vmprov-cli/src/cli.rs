use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vmprov", about = "Provision and tear down VMs through helper scripts")]
pub struct Cli {
    /// Directory containing getvmip.sh and destroyvm.sh
    #[arg(long, env = "VMPROV_SCRIPT_DIR", global = true)]
    pub script_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wait until a VM reports an IP address and print it
    GetIp {
        #[command(flatten)]
        target: TargetArgs,

        /// Total polling budget in seconds
        #[arg(long, default_value_t = 600)]
        timeout: u64,

        /// Seconds between attempts
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Print the full poll outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Destroy a VM and print the script's output
    Destroy {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print a password with `!` escaped for the shell
    EscapePassword { password: String },

    /// Check that the helper scripts are present
    Check,
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Management endpoint address
    #[arg(long)]
    pub host: String,

    /// Login user
    #[arg(long)]
    pub user: String,

    /// Login password
    #[arg(long, env = "VMPROV_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Name of the target VM
    pub vm: String,
}
