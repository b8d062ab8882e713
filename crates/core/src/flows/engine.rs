use thiserror::Error;
use tracing::debug;

use crate::flows::states::{DeleteAction, DeleteEvent, DeleteState, TransitionOutcome};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeleteFlowError {
    #[error("delete event {event:?} is not valid in state {state:?}")]
    InvalidTransition { state: DeleteState, event: DeleteEvent },
}

/// Two-phase delete confirmation: an intent parks the product in
/// `ConfirmPending` and nothing is sent until the operator confirms.
#[derive(Clone, Debug, Default)]
pub struct DeleteFlow {
    state: DeleteState,
}

impl DeleteFlow {
    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn apply(&mut self, event: DeleteEvent) -> Result<TransitionOutcome, DeleteFlowError> {
        let outcome = transition(&self.state, event)?;
        debug!(
            event_name = "catalog.delete.transition",
            from = ?outcome.from,
            to = ?outcome.to,
            "delete flow transition applied"
        );
        self.state = outcome.to.clone();
        Ok(outcome)
    }
}

fn transition(
    current: &DeleteState,
    event: DeleteEvent,
) -> Result<TransitionOutcome, DeleteFlowError> {
    use DeleteAction::{
        IssueDelete, PromptConfirmation, RefreshProducts, ReportError, ReportSuccess,
    };

    let (to, actions) = match (current, &event) {
        (DeleteState::Idle, DeleteEvent::DeleteRequested { product_id, product_name }) => (
            DeleteState::ConfirmPending {
                product_id: *product_id,
                product_name: product_name.clone(),
            },
            vec![PromptConfirmation],
        ),
        (DeleteState::ConfirmPending { .. }, DeleteEvent::Cancelled) => {
            (DeleteState::Idle, Vec::new())
        }
        (DeleteState::ConfirmPending { product_id, .. }, DeleteEvent::Confirmed) => {
            (DeleteState::Deleting { product_id: *product_id }, vec![IssueDelete])
        }
        (DeleteState::Deleting { .. }, DeleteEvent::Succeeded) => {
            (DeleteState::Idle, vec![RefreshProducts, ReportSuccess])
        }
        (DeleteState::Deleting { .. }, DeleteEvent::Failed) => {
            (DeleteState::Idle, vec![ReportError])
        }
        _ => {
            return Err(DeleteFlowError::InvalidTransition { state: current.clone(), event });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, event, actions })
}
