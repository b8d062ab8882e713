pub mod engine;
pub mod states;

pub use engine::{DeleteFlow, DeleteFlowError};
pub use states::{DeleteAction, DeleteEvent, DeleteState, TransitionOutcome};
