pub mod record;

pub use record::{PatientRecord, RetrieveRequest, SummaryRequest, SummaryResponse};
