//! Customer records and their credit standing

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Customer, NewCustomer};
use shared::validation::validate_amount;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Phone must be 1-50 characters"))]
    pub phone: Option<String>,
    /// Credit the customer may draw on; nothing is owed at creation
    #[serde(default)]
    pub max_credit_limit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    pub total: usize,
}

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn Store>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        input.validate()?;
        validate_amount(input.max_credit_limit).map_err(|m| AppError::Validation {
            field: "maxCreditLimit".to_string(),
            message: m.to_string(),
        })?;

        if let Some(email) = &input.email {
            if self.store.find_customer_by_email(email).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Customer with email {} already exists",
                    email
                )));
            }
        }
        if let Some(phone) = &input.phone {
            if self.store.find_customer_by_phone(phone).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Phone number {} already exists",
                    phone
                )));
            }
        }

        let customer = self
            .store
            .insert_customer(&NewCustomer {
                name: input.name,
                email: input.email,
                phone: input.phone,
                max_credit_limit: input.max_credit_limit,
            })
            .await?;

        tracing::info!(
            customer_id = %customer.id,
            max_credit_limit = %customer.max_credit_limit,
            "Customer created"
        );
        Ok(customer)
    }

    pub async fn list(&self) -> AppResult<CustomerList> {
        let customers = self.store.list_customers().await?;
        Ok(CustomerList {
            total: customers.len(),
            customers,
        })
    }

    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        self.store
            .get_customer(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }
}
