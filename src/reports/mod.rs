//! Report generation and publication
//!
//! - **CSV**: renders the collected rows with a fixed header and writes them to a
//!   timestamped file
//! - **Attachment**: uploads that file to a Confluence page as a multipart form
//!
//! Both stages are fatal on failure: a report that cannot be written or
//! published ends the run with an error.

mod attachment;
mod csv;

pub use attachment::AttachmentUploader;
pub use csv::file_name as csv_file_name;
pub use csv::generate as generate_csv;
pub use csv::write_file as write_csv_file;
