//! JSON configuration for the command-line tools.

pub mod track_sequence;

pub use track_sequence::{load_config, ContourSpec, OutputConfig, TrackSequenceConfig};
