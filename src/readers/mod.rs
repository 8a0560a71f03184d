pub mod discovery;
pub mod observation_reader;

pub use discovery::{discover_files, station_id_from_path, DiscoveredFile};
pub use observation_reader::ObservationReader;
