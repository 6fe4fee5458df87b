use std::path::PathBuf;

use clap::Parser;

const LONG_ABOUT: &str = "\
pomerge is a 3-way merging tool for gettext PO files.
It is intended to be used as a merge driver for git.

Install the driver with:
    git config merge.merge-po-files.driver \"pomerge %A %O %B\"

Git attributes must be set up to use the driver. Add the following
lines to .gitattributes in the repository:
    [attr]POFILE merge=merge-po-files
    *.po POFILE";

#[derive(Parser, Debug)]
#[command(
    name = "pomerge",
    about = "3-way merging tool for gettext PO files",
    long_about = LONG_ABOUT,
    version,
)]
pub struct Cli {
    /// Current version of the file (git's %A)
    pub local: PathBuf,

    /// Common ancestor (git's %O)
    pub base: PathBuf,

    /// Version being merged in (git's %B)
    pub other: PathBuf,

    /// Where to write the result [default: LOCAL]
    pub out: Option<PathBuf>,

    /// Narrate each merge stage on stdout
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of pipeline tasks to run at once
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Read settings from a TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// The output location, defaulting to the local file.
    pub fn output(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| self.local.clone())
    }
}
