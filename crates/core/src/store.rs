//! The product listing's state: the full list last fetched from the Product
//! Service and the subset currently displayed.
//!
//! Both sets are only ever replaced wholesale. The full set changes only on a
//! successful fetch; the displayed set changes only through a search or a
//! reset to the full set.

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::product::{Product, ProductDraft, ProductId};
use crate::errors::{ServiceError, ServiceResult};
use crate::filter::{filter_products, FilterQuery};
use crate::flows::{DeleteEvent, DeleteFlow, DeleteFlowError, DeleteState};
use crate::service::ProductService;

pub const DEFAULT_NO_MATCH_RESET: Duration = Duration::from_millis(1250);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { count: usize },
    /// The previous sets were kept.
    Failed(ServiceError),
}

impl RefreshOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed { .. })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Matched { count: usize },
    NoMatch(NoMatchRecovery),
}

/// Returned when a search matches nothing. The displayed set is left as it
/// was; handing this back to [`ProductStore::recover`] restores the full list
/// once `delay` has elapsed.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a no-match result should be offered to the operator for recovery"]
pub struct NoMatchRecovery {
    query: FilterQuery,
    delay: Duration,
}

impl NoMatchRecovery {
    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletePrompt {
    pub product_id: ProductId,
    pub product_name: Option<String>,
}

impl DeletePrompt {
    pub fn message(&self) -> String {
        match &self.product_name {
            Some(name) => format!("Delete product \"{name}\"?"),
            None => format!("Delete product #{}?", self.product_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { product_id: ProductId, refresh: RefreshOutcome },
    Failed { product_id: ProductId, error: ServiceError },
}

pub struct ProductStore<S> {
    service: S,
    full: Vec<Product>,
    displayed: Vec<Product>,
    delete_flow: DeleteFlow,
    reset_delay: Duration,
}

impl<S> ProductStore<S>
where
    S: ProductService,
{
    pub fn new(service: S) -> Self {
        Self {
            service,
            full: Vec::new(),
            displayed: Vec::new(),
            delete_flow: DeleteFlow::default(),
            reset_delay: DEFAULT_NO_MATCH_RESET,
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn full(&self) -> &[Product] {
        &self.full
    }

    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    pub fn delete_state(&self) -> &DeleteState {
        self.delete_flow.state()
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.full.iter().find(|product| product.id == id)
    }

    /// Initial load when the listing is opened.
    pub async fn activate(&mut self) -> RefreshOutcome {
        self.refresh().await
    }

    /// Re-fetches the full list. Failures are logged and leave both sets as
    /// they were.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        match self.service.list_products().await {
            Ok(products) => {
                let count = products.len();
                self.displayed = products.clone();
                self.full = products;
                info!(event_name = "catalog.store.refreshed", count, "product list refreshed");
                RefreshOutcome::Refreshed { count }
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.store.refresh_failed",
                    error = %error,
                    kept = self.full.len(),
                    "product list fetch failed; keeping previous list"
                );
                RefreshOutcome::Failed(error)
            }
        }
    }

    pub fn search(&mut self, query: &FilterQuery) -> SearchOutcome {
        let matched = filter_products(&self.full, query);
        if matched.is_empty() {
            info!(
                event_name = "catalog.store.no_match",
                term = %query.term,
                brand_id = ?query.brand_id,
                category_id = ?query.category_id,
                "search matched no products"
            );
            return SearchOutcome::NoMatch(NoMatchRecovery {
                query: query.clone(),
                delay: self.reset_delay,
            });
        }

        let count = matched.len();
        self.displayed = matched;
        SearchOutcome::Matched { count }
    }

    pub fn reset(&mut self) {
        self.displayed = self.full.clone();
    }

    /// Waits out the recovery delay, then shows the full list again.
    pub async fn recover(&mut self, recovery: NoMatchRecovery) {
        tokio::time::sleep(recovery.delay).await;
        self.reset();
    }

    pub async fn create(&mut self, draft: &ProductDraft) -> ServiceResult<Product> {
        let created = self.service.create_product(draft).await?;
        info!(
            event_name = "catalog.product.created",
            product_id = created.id.0,
            "product created"
        );
        self.refresh().await;
        Ok(created)
    }

    pub async fn update(&mut self, id: ProductId, draft: &ProductDraft) -> ServiceResult<Product> {
        let updated = self.service.update_product(id, draft).await?;
        info!(event_name = "catalog.product.updated", product_id = id.0, "product updated");
        self.refresh().await;
        Ok(updated)
    }

    /// First phase of a delete: nothing is sent until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: ProductId) -> Result<DeletePrompt, DeleteFlowError> {
        let product_name = self.find(id).map(|product| product.name.clone());
        self.delete_flow.apply(DeleteEvent::DeleteRequested {
            product_id: id,
            product_name: product_name.clone(),
        })?;
        Ok(DeletePrompt { product_id: id, product_name })
    }

    pub fn cancel_delete(&mut self) -> Result<(), DeleteFlowError> {
        self.delete_flow.apply(DeleteEvent::Cancelled)?;
        Ok(())
    }

    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome, DeleteFlowError> {
        let outcome = self.delete_flow.apply(DeleteEvent::Confirmed)?;
        let product_id = match outcome.to {
            DeleteState::Deleting { product_id } => product_id,
            other => {
                return Err(DeleteFlowError::InvalidTransition {
                    state: other,
                    event: DeleteEvent::Confirmed,
                });
            }
        };

        info!(
            event_name = "catalog.delete.confirmed",
            product_id = product_id.0,
            "deleting product"
        );
        match self.service.delete_product(product_id).await {
            Ok(()) => {
                self.delete_flow.apply(DeleteEvent::Succeeded)?;
                info!(
                    event_name = "catalog.delete.succeeded",
                    product_id = product_id.0,
                    "product deleted"
                );
                let refresh = self.refresh().await;
                Ok(DeleteOutcome::Deleted { product_id, refresh })
            }
            Err(error) => {
                self.delete_flow.apply(DeleteEvent::Failed)?;
                warn!(
                    event_name = "catalog.delete.failed",
                    product_id = product_id.0,
                    error = %error,
                    "product delete failed"
                );
                Ok(DeleteOutcome::Failed { product_id, error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::{DeleteOutcome, ProductStore, RefreshOutcome, SearchOutcome};
    use crate::domain::lookup::{BrandId, CategoryId};
    use crate::domain::product::{Product, ProductDraft, ProductId};
    use crate::errors::ServiceErrorKind;
    use crate::filter::FilterQuery;
    use crate::flows::{DeleteFlowError, DeleteState};
    use crate::service::{InMemoryCatalog, ProductService};

    fn product(id: u64, name: &str, brand: u64) -> Product {
        Product::from_draft(
            ProductId(id),
            &ProductDraft {
                name: name.to_string(),
                description: String::new(),
                unit_price: Decimal::new(id as i64 * 10, 0),
                stock: 1,
                brand_id: BrandId(brand),
                category_id: CategoryId(1),
            },
        )
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new().with_products(vec![
            product(1, "Apple", 10),
            product(2, "Banana", 11),
            product(3, "Avocado", 10),
        ])
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.name.as_str()).collect()
    }

    async fn active_store() -> ProductStore<InMemoryCatalog> {
        let mut store = ProductStore::new(catalog()).with_reset_delay(Duration::from_millis(5));
        assert_eq!(store.activate().await, RefreshOutcome::Refreshed { count: 3 });
        store
    }

    #[tokio::test]
    async fn activation_populates_full_and_displayed_identically() {
        let store = active_store().await;
        assert_eq!(store.full(), store.displayed());
        assert_eq!(names(store.displayed()), vec!["Apple", "Banana", "Avocado"]);
    }

    #[tokio::test]
    async fn failed_activation_leaves_sets_empty_without_error() {
        let service = catalog();
        service.set_unavailable(true);
        let mut store = ProductStore::new(service);

        let outcome = store.activate().await;
        assert!(
            matches!(outcome, RefreshOutcome::Failed(ref e) if e.kind == ServiceErrorKind::Transport)
        );
        assert!(store.full().is_empty());
        assert!(store.displayed().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_sets() {
        let mut store = active_store().await;
        let _ = store.search(&FilterQuery::new("banana"));
        store.service().set_unavailable(true);

        assert!(!store.refresh().await.is_refreshed());
        assert_eq!(store.full().len(), 3);
        assert_eq!(names(store.displayed()), vec!["Banana"]);
    }

    #[tokio::test]
    async fn search_replaces_displayed_with_filtered_subset() {
        let mut store = active_store().await;

        assert_eq!(store.search(&FilterQuery::new("a")), SearchOutcome::Matched { count: 3 });
        assert_eq!(store.search(&FilterQuery::new("2")), SearchOutcome::Matched { count: 1 });
        assert_eq!(names(store.displayed()), vec!["Banana"]);

        let by_brand = FilterQuery::new("").with_brand(Some(BrandId(10)));
        assert_eq!(store.search(&by_brand), SearchOutcome::Matched { count: 2 });
        assert_eq!(names(store.displayed()), vec!["Apple", "Avocado"]);
        assert_eq!(store.full().len(), 3, "search never touches the full set");
    }

    #[tokio::test]
    async fn no_match_keeps_display_until_recovered() {
        let mut store = active_store().await;
        let _ = store.search(&FilterQuery::new("banana"));

        let SearchOutcome::NoMatch(recovery) = store.search(&FilterQuery::new("9")) else {
            panic!("id 9 should not match");
        };
        assert_eq!(recovery.delay(), Duration::from_millis(5));
        assert_eq!(recovery.query().term, "9");
        assert_eq!(names(store.displayed()), vec!["Banana"]);

        store.recover(recovery).await;
        assert_eq!(store.displayed(), store.full());
    }

    #[tokio::test]
    async fn recovery_waits_for_the_delay() {
        let mut store = active_store().await.with_reset_delay(Duration::from_millis(40));
        let _ = store.search(&FilterQuery::new("apple"));
        let SearchOutcome::NoMatch(recovery) = store.search(&FilterQuery::new("zzz")) else {
            panic!("zzz should not match");
        };

        let started = std::time::Instant::now();
        store.recover(recovery).await;
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(store.displayed().len(), 3);
    }

    #[tokio::test]
    async fn delete_requires_confirmation_then_refreshes() {
        let mut store = active_store().await;
        let calls_before = store.service().list_calls();

        let prompt = store.request_delete(ProductId(2)).expect("intent");
        assert_eq!(prompt.message(), "Delete product \"Banana\"?");
        assert_eq!(store.full().len(), 3, "nothing is deleted before confirmation");
        assert_eq!(store.service().list_calls(), calls_before);

        let outcome = store.confirm_delete().await.expect("confirm");
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                product_id: ProductId(2),
                refresh: RefreshOutcome::Refreshed { count: 2 },
            }
        );
        assert_eq!(names(store.displayed()), vec!["Apple", "Avocado"]);
        assert_eq!(store.delete_state(), &DeleteState::Idle);
    }

    #[tokio::test]
    async fn cancelled_delete_sends_nothing() {
        let mut store = active_store().await;
        store.request_delete(ProductId(1)).expect("intent");
        store.cancel_delete().expect("cancel");

        assert_eq!(store.delete_state(), &DeleteState::Idle);
        assert!(matches!(
            store.confirm_delete().await,
            Err(DeleteFlowError::InvalidTransition { .. })
        ));
        assert_eq!(store.service().list_products().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn failed_delete_surfaces_error_and_keeps_display() {
        let mut store = ProductStore::new(
            InMemoryCatalog::new().with_products(vec![product(1, "Apple", 10)]),
        );
        store.activate().await;

        // Product 5 is known locally but already gone server-side.
        let mut stale = store.full().to_vec();
        stale.push(product(5, "Ghost", 10));
        store.full = stale.clone();
        store.displayed = stale;
        let calls_before = store.service().list_calls();

        store.request_delete(ProductId(5)).expect("intent");
        let outcome = store.confirm_delete().await.expect("confirm");

        let DeleteOutcome::Failed { product_id, error } = outcome else {
            panic!("delete of a missing product should fail");
        };
        assert_eq!(product_id, ProductId(5));
        assert_eq!(error.kind, ServiceErrorKind::NotFound);
        assert_eq!(names(store.displayed()), vec!["Apple", "Ghost"]);
        assert_eq!(store.service().list_calls(), calls_before, "no refresh after a failed delete");
        assert_eq!(store.delete_state(), &DeleteState::Idle);
    }

    #[tokio::test]
    async fn prompt_for_unknown_product_falls_back_to_id() {
        let mut store = active_store().await;
        let prompt = store.request_delete(ProductId(42)).expect("intent");
        assert_eq!(prompt.message(), "Delete product #42?");
    }

    #[tokio::test]
    async fn mutations_refetch_the_full_list() {
        let mut store = active_store().await;
        let draft = ProductDraft {
            name: "Cherry".to_string(),
            description: "Dark".to_string(),
            unit_price: Decimal::new(5, 0),
            stock: 9,
            brand_id: BrandId(11),
            category_id: CategoryId(1),
        };

        let created = store.create(&draft).await.expect("create");
        assert_eq!(created.id, ProductId(4));
        assert_eq!(names(store.displayed()), vec!["Apple", "Banana", "Avocado", "Cherry"]);

        let renamed = ProductDraft { name: "Sour Cherry".to_string(), ..draft };
        store.update(created.id, &renamed).await.expect("update");
        assert_eq!(store.find(ProductId(4)).map(|p| p.name.as_str()), Some("Sour Cherry"));
    }
}
