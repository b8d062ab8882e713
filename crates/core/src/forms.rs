//! Operator input forms.
//!
//! Raw values arrive as optional strings and are turned into typed drafts in
//! one place. Every problem is collected so the operator sees all failing
//! fields at once, and nothing reaches the Product Service until the whole
//! form is valid.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::lookup::{BrandId, CategoryId};
use crate::domain::owner::{OwnerDraft, SignInCredentials};
use crate::domain::product::{Product, ProductDraft};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, Default, Error, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "invalid form: {}", rendered.join("; "))
    }
}

impl FormErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFormInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: Option<String>,
}

impl ProductFormInput {
    /// Pre-fills the form with an existing product, as the edit view does.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            description: Some(product.description.clone()),
            price: Some(product.unit_price.to_string()),
            stock: Some(product.stock.to_string()),
            brand_id: product.brand_id.map(|id| id.to_string()),
            category_id: product.category_id.map(|id| id.to_string()),
        }
    }

    /// Applies every field that is set in `changes` on top of `self`.
    pub fn merge(mut self, changes: ProductFormInput) -> Self {
        if changes.name.is_some() {
            self.name = changes.name;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.price.is_some() {
            self.price = changes.price;
        }
        if changes.stock.is_some() {
            self.stock = changes.stock;
        }
        if changes.brand_id.is_some() {
            self.brand_id = changes.brand_id;
        }
        if changes.category_id.is_some() {
            self.category_id = changes.category_id;
        }
        self
    }

    pub fn validate(&self) -> Result<ProductDraft, FormErrors> {
        let mut errors = FormErrors::default();

        let name = required(&mut errors, "name", &self.name, "Please input the Product Name!");
        let description = required(
            &mut errors,
            "description",
            &self.description,
            "Please input the Description!",
        );

        let unit_price = required(&mut errors, "price", &self.price, "Please input the Price!")
            .and_then(|raw| match Decimal::from_str(&raw) {
                Ok(price) if price.is_sign_negative() && !price.is_zero() => {
                    errors.push("price", "Price must not be negative");
                    None
                }
                Ok(price) => Some(price),
                Err(_) => {
                    errors.push("price", format!("`{raw}` is not a number"));
                    None
                }
            });

        let stock = required(&mut errors, "stock", &self.stock, "Please input the Quantity!")
            .and_then(|raw| {
                parse_or_push::<u32>(&mut errors, "stock", &raw, "a whole number >= 0")
            });

        let brand_id = required(&mut errors, "brand_id", &self.brand_id, "Please select the Brand!")
            .and_then(|raw| parse_id(&mut errors, "brand_id", &raw))
            .map(BrandId);

        let category_id =
            required(&mut errors, "category_id", &self.category_id, "Please select the Category!")
                .and_then(|raw| parse_id(&mut errors, "category_id", &raw))
                .map(CategoryId);

        match (name, description, unit_price, stock, brand_id, category_id) {
            (
                Some(name),
                Some(description),
                Some(unit_price),
                Some(stock),
                Some(brand_id),
                Some(category_id),
            ) => errors.into_result(|| ProductDraft {
                name,
                description,
                unit_price,
                stock,
                brand_id,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignInFormInput {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl SignInFormInput {
    pub fn validate(&self) -> Result<SignInCredentials, FormErrors> {
        let mut errors = FormErrors::default();
        let email = validate_email(&mut errors, &self.email);
        let password = validate_password(&mut errors, &self.password);

        match (email, password) {
            (Some(email), Some(password)) => {
                errors.into_result(|| SignInCredentials { email, password })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct OwnerFormInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub profile_path: Option<String>,
}

impl OwnerFormInput {
    pub fn validate(&self) -> Result<OwnerDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let first_name =
            required(&mut errors, "first_name", &self.first_name, "Please input the First Name!");
        let last_name =
            required(&mut errors, "last_name", &self.last_name, "Please input the Last Name!");
        let email = validate_email(&mut errors, &self.email);
        let password = validate_password(&mut errors, &self.password);
        let profile_path =
            self.profile_path.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(String::from);

        match (first_name, last_name, email, password) {
            (Some(first_name), Some(last_name), Some(email), Some(password)) => {
                errors.into_result(|| OwnerDraft {
                    first_name,
                    last_name,
                    email,
                    password,
                    profile_path,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(
    errors: &mut FormErrors,
    field: &'static str,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Some(trimmed.to_string()),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

fn parse_or_push<T: FromStr>(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &str,
    expected: &str,
) -> Option<T> {
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, format!("`{raw}` is not {expected}"));
            None
        }
    }
}

fn parse_id(errors: &mut FormErrors, field: &'static str, raw: &str) -> Option<u64> {
    match parse_or_push::<u64>(errors, field, raw, "a valid id")? {
        0 => {
            errors.push(field, "id must be positive");
            None
        }
        id => Some(id),
    }
}

fn validate_email(errors: &mut FormErrors, value: &Option<String>) -> Option<String> {
    let email = required(errors, "email", value, "Please input the Email!")?;
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if well_formed {
        Some(email)
    } else {
        errors.push("email", format!("`{email}` is not a valid email address"));
        None
    }
}

fn validate_password(
    errors: &mut FormErrors,
    value: &Option<SecretString>,
) -> Option<SecretString> {
    use secrecy::ExposeSecret;

    match value {
        Some(password) if !password.expose_secret().is_empty() => Some(password.clone()),
        _ => {
            errors.push("password", "Please input the Password!");
            None
        }
    }
}
