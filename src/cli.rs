use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_files_argument(command);
        let command = Self::register_palette_argument(command);
        let command = Self::register_render_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_input_files_argument(command: Command) -> Command {
        command.arg(Self::create_input_files_argument())
    }

    fn register_palette_argument(command: Command) -> Command {
        command.arg(Self::create_palette_argument())
    }

    fn register_render_argument(command: Command) -> Command {
        command.arg(Self::create_render_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_files_argument() -> Arg {
        Arg::new("input_files")
            .help("Paths to NetPBM input files (P1 to P6)")
            .value_parser(value_parser!(PathBuf))
            .num_args(1..)
            .required(true)
    }

    fn create_palette_argument() -> Arg {
        arg!(-p --palette "Also decode the palette the pixel values index into")
    }

    fn create_render_argument() -> Arg {
        arg!(-r --render "Print the pixel values of every decoded bitmap")
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of files decoded in parallel")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_files: Self::extract_input_files_argument(matches),
            palette: Self::extract_palette_argument(matches),
            render: Self::extract_render_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
        }
    }

    fn extract_input_files_argument(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("input_files")
            .expect("Required argument input_files not provided")
            .cloned()
            .collect()
    }

    fn extract_palette_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("palette")
    }

    fn extract_render_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("render")
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::CLIParser;

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_input_files_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_input_files_argument(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "first.pbm", "second.pgm"]);
        let input_files = CLIParser::extract_input_files_argument(&matches);
        assert_eq!(input_files.len(), 2);
        assert_eq!(input_files[0].file_name().unwrap(), "first.pbm");
        assert_eq!(input_files[1].file_name().unwrap(), "second.pgm");
    }

    #[test]
    fn missing_input_files() {
        let command = Command::new("test");
        let command = CLIParser::register_input_files_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        } else {
            panic!("Missing input files not detected");
        }
    }

    #[test]
    fn parse_flags() {
        let command = Command::new("test");
        let command = CLIParser::register_palette_argument(command);
        let command = CLIParser::register_render_argument(command);
        let matches = command.clone().get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-p"]);
        assert!(CLIParser::extract_palette_argument(&matches));
        assert!(!CLIParser::extract_render_argument(&matches));
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--render"]);
        assert!(!CLIParser::extract_palette_argument(&matches));
        assert!(CLIParser::extract_render_argument(&matches));
    }

    #[test]
    fn parse_number_of_threads_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--threads", "5"]);
        let actual = CLIParser::extract_threads_argument(&matches);
        assert_eq!(actual, 5);
    }

    #[test]
    fn parse_illegal_number_of_threads() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-t", "many"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Illegal value for threads not detected");
        }
    }

    #[test]
    fn parse_required_arguments_only() {
        let input_file_name = "inputfile.pbm";
        let input_file_path = format!("/input_directory/{}", input_file_name);
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![PROGRAM_NAME_ARGUMENT, &input_file_path, "-t", "8"]);
        assert_eq!(arguments.input_files.len(), 1, "input files do not match");
        assert_eq!(
            arguments.input_files[0].file_name().unwrap(),
            input_file_name,
            "input file does not match"
        );
        assert!(!arguments.palette, "palette does not match");
        assert!(!arguments.render, "render does not match");
        assert_eq!(
            arguments.number_of_threads, 8,
            "number_of_threads does not match"
        );
    }
}
