pub mod observation_reader;
pub mod record_parser;

pub use observation_reader::ObservationReader;
pub use record_parser::RecordParser;
