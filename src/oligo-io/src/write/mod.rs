mod generic_writer;
pub use generic_writer::GenericWriter;

pub mod error;
pub use error::WriterError;
