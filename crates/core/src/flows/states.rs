use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteState {
    #[default]
    Idle,
    ConfirmPending {
        product_id: ProductId,
        product_name: Option<String>,
    },
    Deleting {
        product_id: ProductId,
    },
}

impl DeleteState {
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::Idle => None,
            Self::ConfirmPending { product_id, .. } | Self::Deleting { product_id } => {
                Some(*product_id)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteEvent {
    DeleteRequested { product_id: ProductId, product_name: Option<String> },
    Cancelled,
    Confirmed,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteAction {
    PromptConfirmation,
    IssueDelete,
    RefreshProducts,
    ReportSuccess,
    ReportError,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: DeleteState,
    pub to: DeleteState,
    pub event: DeleteEvent,
    pub actions: Vec<DeleteAction>,
}
