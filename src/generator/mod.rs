pub mod context;
pub mod news;
pub mod orchestrator;
pub mod outlet;
pub mod planner;
pub mod progress;
pub mod verifier;
pub mod workflow;
