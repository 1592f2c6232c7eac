//! PCM conversion: backends, their plumbing and the fallback dispatcher.

pub mod backend;
pub mod command;
pub mod debug_dump;
pub mod external;
pub mod library;
pub mod native;
pub mod scratch;
pub mod transcoder;

pub use backend::ConversionBackend;
pub use command::{CommandExecutor, SystemCommandExecutor};
pub use debug_dump::DebugDump;
pub use external::ExternalProcessBackend;
pub use library::{AudioAttributes, EncodingAttributes, LibraryBackend, LibraryEncoder};
pub use native::NativeEncoder;
pub use scratch::ScratchDir;
pub use transcoder::Transcoder;
