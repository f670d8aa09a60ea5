use std::env::args_os;
use std::process::ExitCode;

use netpbm_bitmap::{print_decoded_files, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match print_decoded_files(&arguments) {
        0 => ExitCode::SUCCESS,
        failures => {
            eprintln!("Decoding failed for {} file(s)", failures);
            ExitCode::FAILURE
        }
    }
}
