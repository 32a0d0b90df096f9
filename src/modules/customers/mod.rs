use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::api::{ApiClient, ApiError};

/// A customer record as the backend stores it. `birthday` is `YYYY-MM-DD`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub birthday: String,
}

impl Customer {
    /// Build a new record with a client-generated id, the way the web form
    /// did before submitting.
    pub fn new(
        first_name: &str,
        last_name: &str,
        phone: &str,
        email: &str,
        birthday: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            birthday: birthday.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fetch the full customer list. Failures are logged and reported as an empty
/// result of `Err`; the screen keeps whatever it last rendered.
pub fn fetch_all(client: &dyn ApiClient) -> Result<Vec<Customer>, ApiError> {
    match client.get_customers() {
        Ok(customers) => {
            info!("Fetched {} customers", customers.len());
            Ok(customers)
        }
        Err(e) => {
            error!("Error fetching customers: {}", e);
            Err(e)
        }
    }
}

/// Submit a new customer. Failures are logged only.
pub fn add(client: &dyn ApiClient, customer: &Customer) -> Result<(), ApiError> {
    match client.add_customer(customer) {
        Ok(()) => {
            info!("Customer added: {}", customer.id);
            Ok(())
        }
        Err(e) => {
            error!("Error adding customer: {}", e);
            Err(e)
        }
    }
}
