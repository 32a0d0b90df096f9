use serde::{Deserialize, Serialize};

use crate::modules::customers::Customer;

/// Body for `POST /api/login`
#[derive(Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub user: UserRef,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserRef {
    pub user_id: String,
}

/// Body for `POST /api/register`
#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/verifications/send-code`
#[derive(Serialize, Debug)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SendCodeResponse {
    pub user_id: String,
}

/// Body for `POST /api/verifications/verify`
#[derive(Serialize, Debug)]
pub struct VerifyRequest {
    pub code: String,
    pub user_id: String,
}

/// Body for `POST /api/passwords/reset`
#[derive(Serialize, Debug)]
pub struct ResetPasswordRequest {
    pub user_id: String,
    pub new_password: String,
}

/// Body for `POST /api/passwords/change`
#[derive(Serialize, Debug)]
pub struct ChangePasswordRequest {
    pub user_id: String,
    pub password: String,
    pub new_password: String,
}

/// Envelope of `GET /api/customers/get_all/`
#[derive(Deserialize, Debug)]
pub struct CustomersResponse {
    pub customers: Vec<Customer>,
}
