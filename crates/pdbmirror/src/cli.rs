use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pdbmirror", version, about, long_about = None, propagate_version = true)]
pub struct App {
    /// Local mirror tree root. Defaults to the current directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Mirror to use: a registry id (WW, US, UK, JP) or a legacy string
    /// address such as "ftp://ftp.wwpdb.org". Fastest mirror when omitted.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Transport protocol: https or ftp.
    #[arg(long, global = true)]
    pub protocol: Option<String>,

    /// File format: pdb, pdb-assembly, mmcif, mmcif-assembly, pdbml,
    /// bundle or mmtf.
    #[arg(short, long, global = true, default_value = "mmcif")]
    pub format: String,

    /// Store entries directly under the root, without short-code sharding.
    #[arg(short = 'd', long, global = true)]
    pub flat: bool,

    /// Overwrite files that already exist locally.
    #[arg(short, long, global = true)]
    pub overwrite: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(alias = "g", about = "Retrieve one or more entries by code")]
    Get(GetArgs),
    #[command(alias = "asm", about = "Retrieve every biological assembly of an entry")]
    Assemblies(AssembliesArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Four-character structure codes, e.g. 127d 3j92.
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Fetch the obsolete variant into the obsolete tree.
    #[arg(long)]
    pub obsolete: bool,

    /// Also retrieve the biological assemblies of each entry.
    #[arg(long)]
    pub with_assemblies: bool,
}

#[derive(Debug, Args)]
pub struct AssembliesArgs {
    /// Four-character structure code.
    pub code: String,
}
