//! Core modules for ExoQuest

pub mod api;
pub mod catalog;
pub mod orchestrator;
pub mod random;
pub mod range_classifier;
pub mod remote;
pub mod session;
pub mod similarity;
pub mod units;
pub mod win;

pub use api::{create_router, run_server, AppState};
pub use catalog::ArchetypeCatalog;
pub use orchestrator::FallbackOrchestrator;
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use range_classifier::{LocalClassifier, RangeClassifier};
pub use remote::{map_label, map_response, parse_response, HttpRemoteClassifier, RemoteClassifier, RemoteResponse};
pub use session::{draw_target, AttemptTicket, GameSession};
pub use similarity::SimilarityScorer;
pub use units::{RemoteFeatures, UnitConverter};
pub use win::{WinConditionEvaluator, WinVerdict};
