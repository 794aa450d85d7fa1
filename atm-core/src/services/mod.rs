//! Service layer - business logic orchestration
//!
//! `AccountStore` and `Session` carry the ATM itself; the rest are operator
//! services around the data file.

mod backup;
mod doctor;
pub mod logging;
pub mod session;
mod status;
pub mod store;

pub use backup::{BackupService, ClearResult};
pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use session::{Command, Notice, Screen, Session};
pub use status::{StatusService, StatusSummary};
pub use store::{AccountStore, Authentication};
