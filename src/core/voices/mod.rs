//! Voice catalog: the set of voice identifiers the gateway accepts.
//!
//! The catalog is read from `Voices.json` in the configuration directory at
//! startup. When the file is missing or invalid the built-in defaults are used
//! and written back so operators have a file to edit.

mod catalog;
mod defaults;

pub use catalog::{
    CatalogError, CatalogSource, VOICES_FILE_NAME, VoiceCatalog, VoiceItem, voices_file_path,
};
pub use defaults::DEFAULT_VOICES;
