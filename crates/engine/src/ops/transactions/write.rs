mod batch;
mod common;
mod create;
mod delete;
mod transition;

pub use batch::BatchCreditOutcome;
