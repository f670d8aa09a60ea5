mod format;
mod header;
mod netpbm;
mod samples;

pub use format::NetpbmFormat;
pub use header::NetpbmHeader;
pub use netpbm::NetpbmImageReader;
