pub mod config;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod flows;
pub mod forms;
pub mod service;
pub mod session;
pub mod store;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::image::{Image, ImageId, ImageUpload};
pub use domain::lookup::{Brand, BrandId, Category, CategoryId};
pub use domain::owner::{Owner, OwnerDraft, OwnerId, SignInCredentials, SignInGrant};
pub use domain::product::{Product, ProductDraft, ProductId};
pub use errors::{AdminError, ServiceError, ServiceErrorKind, ServiceResult};
pub use filter::{filter_products, FilterQuery, SearchTerm};
pub use flows::{DeleteFlow, DeleteFlowError, DeleteState};
pub use forms::{FormErrors, OwnerFormInput, ProductFormInput, SignInFormInput};
pub use service::{ImageService, InMemoryCatalog, LookupService, OwnerService, ProductService};
pub use session::{FileSessionStore, Session, SessionContext, SessionError, SessionStore};
pub use store::{DeleteOutcome, ProductStore, RefreshOutcome, SearchOutcome};
