//! Built-in scan modules. Deliberately small: they prove the plugin
//! contract end to end without carrying any real detection logic.

pub mod file_hashes;
pub mod file_metadata;
pub mod file_type;

pub use file_hashes::FileHashesModule;
pub use file_metadata::FileMetadataModule;
pub use file_type::FileTypeModule;
