// Collaborator shells around the core: request validation, spooler dispatch,
// availability polling. The bus transport itself lives outside this crate.

pub mod availability;
pub mod dispatch;
pub mod request;
pub mod worker;

pub use availability::{spawn_availability_poller, LogStatusSink, PrinterStatus, StatusSink};
pub use dispatch::{LpDispatcher, PrintDispatcher};
pub use request::PrintRequest;
pub use worker::{
    process_payload, process_request, run_job_loop, JobLoopSummary, JobOptions, JobOutcome,
};
