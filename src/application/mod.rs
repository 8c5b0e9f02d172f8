// Application layer - the Ledger Service and its error taxonomy.
// Every balance- or point-affecting operation lives here; the CLI and the
// statement exporter are pure consumers.

pub mod credentials;
pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
