use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use serde::Serialize;

use super::types::{
    ChangePasswordRequest, CustomersResponse, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, SendCodeRequest, SendCodeResponse, VerifyRequest,
};
use super::{ApiClient, ApiError};
use crate::modules::customers::Customer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP implementation of the backend collaborator.
pub struct HttpApiClient {
    base_url: String,
    client: Client,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and map non-2xx answers to `ApiError::Rejected`,
    /// pulling the server's text out of `error_key` in the error body.
    fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        error_key: &str,
    ) -> Result<Response, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        debug!("POST {} rejected: status={}, body={}", path, status, text);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: extract_message(&text, error_key),
        })
    }

    fn get(&self, path: &str, error_key: &str) -> Result<Response, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        debug!("GET {} rejected: status={}, body={}", path, status, text);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: extract_message(&text, error_key),
        })
    }
}

/// Pull a string field out of a JSON error body, if there is one.
fn extract_message(body: &str, key: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get(key)?.as_str().map(|s| s.to_string())
}

impl ApiClient for HttpApiClient {
    fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/login", &body, "message")?
            .json()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        // The registration endpoint reports failures under `detail`.
        self.post_json("/api/register", request, "detail")?;
        Ok(())
    }

    fn send_code(&self, email: &str) -> Result<SendCodeResponse, ApiError> {
        let body = SendCodeRequest {
            email: email.to_string(),
        };
        self.post_json("/api/verifications/send-code", &body, "message")?
            .json()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn verify_code(&self, code: &str, user_id: &str) -> Result<(), ApiError> {
        let body = VerifyRequest {
            code: code.to_string(),
            user_id: user_id.to_string(),
        };
        self.post_json("/api/verifications/verify", &body, "message")?;
        Ok(())
    }

    fn reset_password(&self, user_id: &str, new_password: &str) -> Result<(), ApiError> {
        let body = ResetPasswordRequest {
            user_id: user_id.to_string(),
            new_password: new_password.to_string(),
        };
        self.post_json("/api/passwords/reset", &body, "message")?;
        Ok(())
    }

    fn change_password(
        &self,
        user_id: &str,
        password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = ChangePasswordRequest {
            user_id: user_id.to_string(),
            password: password.to_string(),
            new_password: new_password.to_string(),
        };
        self.post_json("/api/passwords/change", &body, "message")?;
        Ok(())
    }

    fn get_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let response: CustomersResponse = self
            .get("/api/customers/get_all/", "message")?
            .json()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(response.customers)
    }

    fn add_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.post_json("/api/customers/add", customer, "message")?;
        Ok(())
    }
}
