use super::model::JobOutcome;

/// Messages a worker sends back to the interactive task, in this order:
/// exactly one `Finished`, then exactly one `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Finished,
    Outcome(JobOutcome),
}
