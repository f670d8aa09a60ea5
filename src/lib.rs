use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    sync::mpsc,
};

pub use cli::CLIParser;
pub use error::Error;
pub use image::{Bitmap, DecodeOptions, DecodedImage, ImageReader, NetpbmFormat, Palette};
use image::reader::NetpbmImageReader;
use threadpool::ThreadPool;

pub mod binary_stream;
mod cli;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_files: Vec<PathBuf>,
    palette: bool,
    render: bool,
    number_of_threads: usize,
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.to_string_lossy().into_owned(), e)
    })
}

/// Decodes one NetPBM image from a stream positioned at its magic token.
pub fn load<R: Read>(reader: R, options: &DecodeOptions) -> Result<DecodedImage> {
    NetpbmImageReader::new(reader, *options).read_image()
}

pub fn load_file(file_path: &Path, options: &DecodeOptions) -> Result<DecodedImage> {
    let input_file = open_input_file(file_path)?;
    load(BufReader::new(input_file), options)
}

/// Decodes every input file on its own worker. Results keep the order of the
/// input files.
pub fn decode_files(arguments: &Arguments) -> Vec<(PathBuf, Result<DecodedImage>)> {
    let options = DecodeOptions::from(arguments);
    let threadpool = ThreadPool::new(arguments.number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();
    for (position, file_path) in arguments.input_files.iter().cloned().enumerate() {
        let sender = sender.clone();
        threadpool.execute(move || {
            let result = load_file(&file_path, &options);
            // the receiver outlives every worker
            let _ = sender.send((position, file_path, result));
        });
    }
    drop(sender);
    let mut results: Vec<_> = receiver.iter().collect();
    results.sort_by_key(|(position, _, _)| *position);
    results
        .into_iter()
        .map(|(_, file_path, result)| (file_path, result))
        .collect()
}

pub fn describe(image: &DecodedImage) -> String {
    let bitmap = &image.bitmap;
    let mut description = format!(
        "{} {}x{}, {} colors, {} bpp",
        image.format,
        bitmap.width(),
        bitmap.height(),
        bitmap.colors(),
        bitmap.bits_per_pixel()
    );
    if let Some(palette) = &image.palette {
        description.push_str(&format!(", palette of {}", palette.num_colors()));
    }
    description
}

/// Decodes and prints every input file, returning the number of failures.
pub fn print_decoded_files(arguments: &Arguments) -> usize {
    let mut failures = 0;
    for (file_path, result) in decode_files(arguments) {
        match result {
            Ok(image) => {
                println!("{}: {}", file_path.display(), describe(&image));
                if arguments.render {
                    print!("{}", image.bitmap);
                }
            }
            Err(e) => {
                logger::log_decode_failure(&file_path, &e);
                println!("{}: {}", file_path.display(), e);
                failures += 1;
            }
        }
    }
    failures
}
