use std::path::PathBuf;

use structopt::StructOpt;

const PKG_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, StructOpt)]
#[structopt(
    name = PKG_NAME,
    about = "Cleans embedded-toolchain compile command databases for host static analyzers"
)]
pub struct CcscrubOptions {
    /// Compilation database to clean.
    #[structopt(parse(from_os_str))]
    pub input_file_path: PathBuf,

    /// Where the cleaned database is written.
    /// Defaults to rewriting the input file in place.
    #[structopt(parse(from_os_str))]
    pub output_file_path: Option<PathBuf>,

    /// Keep unresolvable `@file` tokens as-is instead of aborting the run.
    #[structopt(long)]
    pub keep_missing_arg_files: bool,

    /// Leave each entry's compiler executable and target untouched.
    #[structopt(long)]
    pub no_host_identity: bool,

    /// Append the host target flag even when an identical token is already
    /// present.
    #[structopt(long)]
    pub always_append_target: bool,

    /// Path to a YAML file extending the flag denylist or overriding the
    /// host compiler and target.
    #[structopt(parse(from_os_str), short, long = "config")]
    pub config_file_path: Option<PathBuf>,
}
