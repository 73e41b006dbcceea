use std::path::PathBuf;

use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};

use textme_formats::Platform;

use crate::app::error::RuntimeError;

// CLI Arg Names
pub const OPTION_SOURCE_FORMAT: &str = "from";
pub const OPTION_DEST_FORMAT: &str = "to";
pub const OPTION_PHONE: &str = "phone";
pub const OPTION_SORT: &str = "sort";
pub const OPTION_NORMALIZE: &str = "normalize";
pub const OPTION_DIAGNOSTIC: &str = "diagnostics";
pub const OPTION_OUTPUT: &str = "output";
pub const ARG_INPUTS: &str = "inputs";

// Other CLI Text
pub const SUPPORTED_PLATFORMS: &str = "android, win10";
pub const ABOUT: &str = concat!(
    "The `textme-converter` binary translates SMS/MMS backups between\n",
    "Android and Windows 10 Mobile devices. When either format option\n",
    "is omitted, that side of the conversion uses a neutral JSON form."
);

pub struct Options {
    /// Format of ALL input files; `None` reads the neutral JSON form
    pub source_format: Option<Platform>,
    /// Format to convert into; `None` dumps the neutral JSON form
    pub dest_format: Option<Platform>,
    /// The backup owner's own phone number, needed to encode Android backups
    pub phone: Option<String>,
    /// If true, sort messages from oldest to newest
    pub sort: bool,
    /// If true, normalize sender and recipient phone numbers while decoding
    pub normalize: bool,
    /// If true, emit backup statistics to stdout instead of converting
    pub diagnostic: bool,
    /// Where the converted output is written; `None` writes to stdout
    pub output: Option<PathBuf>,
    /// Input files to convert; empty reads a single source from stdin
    pub inputs: Vec<PathBuf>,
}

impl Options {
    pub fn from_args(args: &ArgMatches) -> Result<Self, RuntimeError> {
        let source_format = parse_platform(args, OPTION_SOURCE_FORMAT)?;
        let dest_format = parse_platform(args, OPTION_DEST_FORMAT)?;
        let phone = args.get_one::<String>(OPTION_PHONE).cloned();
        let sort = args.get_flag(OPTION_SORT);
        let normalize = args.get_flag(OPTION_NORMALIZE);
        let diagnostic = args.get_flag(OPTION_DIAGNOSTIC);
        let output = args.get_one::<String>(OPTION_OUTPUT).map(PathBuf::from);
        let inputs = args
            .get_many::<String>(ARG_INPUTS)
            .map(|inputs| inputs.map(PathBuf::from).collect())
            .unwrap_or_default();

        // Android backups name an explicit address for every slot, so they
        // cannot be written without the owner's own number
        if dest_format == Some(Platform::Android) && phone.is_none() {
            return Err(RuntimeError::InvalidOptions(format!(
                "`--{OPTION_DEST_FORMAT} android` requires `--{OPTION_PHONE}`"
            )));
        }

        // Ensure that if diagnostics are enabled, no conversion output is
        if diagnostic && dest_format.is_some() {
            return Err(RuntimeError::InvalidOptions(format!(
                "Diagnostics are enabled; {OPTION_DEST_FORMAT} is disallowed"
            )));
        }
        if diagnostic && output.is_some() {
            return Err(RuntimeError::InvalidOptions(format!(
                "Diagnostics are enabled; {OPTION_OUTPUT} is disallowed"
            )));
        }

        Ok(Options {
            source_format,
            dest_format,
            phone,
            sort,
            normalize,
            diagnostic,
            output,
            inputs,
        })
    }
}

fn parse_platform(args: &ArgMatches, option: &str) -> Result<Option<Platform>, RuntimeError> {
    match args.get_one::<String>(option) {
        Some(platform) => Platform::from_cli(platform).map(Some).ok_or_else(|| {
            RuntimeError::InvalidOptions(format!(
                "{platform} is not a valid format! Must be one of <{SUPPORTED_PLATFORMS}>"
            ))
        }),
        None => Ok(None),
    }
}

fn build_command() -> Command {
    Command::new("TextMe Converter")
        .version(crate_version!())
        .about(ABOUT)
        .arg(
            Arg::new(OPTION_SOURCE_FORMAT)
                .short('f')
                .long(OPTION_SOURCE_FORMAT)
                .help("Specify the format of ALL input files\nIf omitted, inputs are read as the neutral JSON form")
                .display_order(0)
                .value_name(SUPPORTED_PLATFORMS),
        )
        .arg(
            Arg::new(OPTION_DEST_FORMAT)
                .short('t')
                .long(OPTION_DEST_FORMAT)
                .help("Specify the format to convert into\nIf omitted, messages are dumped in the neutral JSON form")
                .display_order(1)
                .value_name(SUPPORTED_PLATFORMS),
        )
        .arg(
            Arg::new(OPTION_PHONE)
                .short('p')
                .long(OPTION_PHONE)
                .help("Specify your own phone number\nOnly required when converting to Android")
                .display_order(2)
                .value_name("number"),
        )
        .arg(
            Arg::new(OPTION_SORT)
                .short('s')
                .long(OPTION_SORT)
                .action(ArgAction::SetTrue)
                .help("Sort messages from oldest to newest")
                .display_order(3),
        )
        .arg(
            Arg::new(OPTION_NORMALIZE)
                .short('n')
                .long(OPTION_NORMALIZE)
                .action(ArgAction::SetTrue)
                .help("Normalize phone numbers while decoding\ne.g. +1 123-456-7890 and (123)-456-7890 both become 1234567890")
                .display_order(4),
        )
        .arg(
            Arg::new(OPTION_DIAGNOSTIC)
                .short('d')
                .long(OPTION_DIAGNOSTIC)
                .action(ArgAction::SetTrue)
                .help("Print backup statistics and exit")
                .display_order(5),
        )
        .arg(
            Arg::new(OPTION_OUTPUT)
                .short('o')
                .long(OPTION_OUTPUT)
                .help("Write the converted output to a file instead of stdout")
                .display_order(6)
                .value_name("path/to/output"),
        )
        .arg(
            Arg::new(ARG_INPUTS)
                .help("Input files to convert\nIf omitted, a single backup is read from stdin")
                .action(ArgAction::Append)
                .value_name("FILE"),
        )
}

pub fn from_command_line() -> ArgMatches {
    build_command().get_matches()
}
