//! Core domain modules
//!
//! File intake, validation and the upload session state machine. Nothing in
//! here talks to the network directly; submission goes through the
//! [`traits::PredictionTransport`] seam.

pub mod candidate;
pub mod errors;
pub mod session;
pub mod traits;
pub mod validation;

pub use candidate::{format_size, CandidateFile, ImageFormat, Preview};
pub use errors::{SessionError, ValidationError};
pub use session::{Generation, SessionState, UploadSession};
pub use traits::{HistorySource, PredictionTransport};
pub use validation::{ValidationPolicy, MAX_FILE_SIZE};
