mod sequence;
pub use sequence::Sequence;

mod fasta;
pub use fasta::{FastaReader, count_fasta_records};

mod residues;
pub use residues::ResidueReader;

pub mod error;
pub use error::ReadError;
