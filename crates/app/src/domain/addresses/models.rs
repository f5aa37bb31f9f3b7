//! Address Models

use jiff::Timestamp;
use uuid::Uuid;

/// Address Model
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub complete_address: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub nickname: Option<String>,
    pub is_default: bool,
    pub created_at: Timestamp,
}

/// New Address Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub complete_address: String,
    pub landmark: Option<String>,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub nickname: Option<String>,
    pub is_default: bool,
}
