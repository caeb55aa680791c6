// User directory response types
//
// Models for the JSONPlaceholder `/users` resource. The shape is externally
// defined and treated as opaque: nothing here is validated or normalized,
// records are stored exactly as received. Fields other than `id` use
// `#[serde(default)]` so a sparse payload still deserializes.

use serde::{Deserialize, Serialize};

/// A single user record from the directory endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Company,
}

/// Postal address nested inside [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub geo: Geo,
}

/// Geographic coordinates. The endpoint serves these as decimal strings
/// (e.g. `"-37.3159"`), kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
}

/// Employer details nested inside [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "catchPhrase")]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}
