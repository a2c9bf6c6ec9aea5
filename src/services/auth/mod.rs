pub mod bypass;
pub mod client;
pub mod factory;
pub mod gate;
pub mod outcome;
pub mod validator;

pub use client::AuthServiceClient;
pub use factory::build_token_gate;
pub use gate::{GateConfig, TokenGate};
pub use outcome::GateDecision;
