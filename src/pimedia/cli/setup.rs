use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pimedia", bin_name = "pimedia", version)]
#[command(about = "Multi-tenant media library with favorites and a reversible trash", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage directory (overrides the config file and PIMEDIA_STORAGE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file to read instead of the default pimedia.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Owner whose storage to operate on
    #[arg(short, long, global = true)]
    pub owner: Option<String>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the storage dirs and the metadata file
    Init,

    /// List items
    #[command(alias = "list")]
    Ls {
        /// Show trashed items instead of live ones
        #[arg(long)]
        trash: bool,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,

        /// Print the items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a folder
    Mkdir {
        /// Logical path of the parent (e.g. "My Files/Trip")
        parent: String,

        /// Name of the new folder
        name: String,
    },

    /// Copy local files into a folder
    Add {
        /// Logical path of the destination folder
        folder: String,

        /// Local files to add
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Move items to the trash
    #[command(alias = "rm")]
    Trash {
        /// Item ids, as printed by `ls`
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Move trashed items back where they came from
    Restore {
        /// Item ids, as printed by `ls --trash`
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Permanently delete items
    Purge {
        /// Item ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Toggle the favorite flag of items
    Fav {
        /// Item ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Check files against metadata records
    Doctor {
        /// Fix what was found
        #[arg(long)]
        fix: bool,
    },

    /// Print the physical path of a file
    Locate {
        /// Logical path of the folder
        folder: String,

        /// File name
        name: String,
    },
}
