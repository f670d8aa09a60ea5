use std::path::Path;

use crate::error::Error;

const CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    if let Err(e) = log4rs::init_file(CONFIG_FILE, Default::default()) {
        eprintln!("Logging disabled, unable to load '{}': {}", CONFIG_FILE, e);
    }
}

pub fn log_decode_failure(path: &Path, error: &Error) {
    log::warn!("Decoding of '{}' failed: {}", path.display(), error);
}
