/// Use cases module containing application business logic orchestration
mod run_curation;

pub use run_curation::RunCurationUseCase;
