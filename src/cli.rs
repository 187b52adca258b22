use crate::content::Side;
use crate::translate::Table;
use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "janus")]
#[command(version)]
#[command(about = "Translate text line by line through a synchronized source/derived buffer pair")]
pub struct CliArgs {
    /// File to load (stdin when omitted)
    pub file: Option<PathBuf>,

    /// Load the input into the derived buffer and print the source buffer
    #[arg(long, short = 'b')]
    pub backward: bool,

    /// Translation table: identity or ascii-braille (overrides the config file)
    #[arg(long, short = 't')]
    pub table: Option<Table>,

    /// Config file to use instead of the default location
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Log propagation details at debug level
    #[arg(long)]
    pub trace: bool,
}

impl CliArgs {
    /// Buffer the input is loaded into.
    pub fn input_side(&self) -> Side {
        if self.backward {
            Side::Derived
        } else {
            Side::Source
        }
    }

    pub fn read_input(&self) -> io::Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path),
            None => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
        }
    }
}

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
