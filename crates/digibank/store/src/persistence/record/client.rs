use chrono::{DateTime, Local};
use digibank_domain::{Client, PasswordHash, client::ClientDissolved};
use serde::{Deserialize, Serialize};

use crate::persistence::collection::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    client_id: u64,
    first_name: String,
    last_name: String,
    national_id: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
    email: String,
    password_hash: String,
    registered_at: DateTime<Local>,
}

impl ClientRecord {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }
}

impl Record for ClientRecord {
    const ID_FIELD: &'static str = "client_id";

    fn id(&self) -> u64 {
        self.client_id
    }
}

impl From<Client> for ClientRecord {
    fn from(client: Client) -> Self {
        let ClientDissolved {
            id,
            first_name,
            last_name,
            national_id,
            address,
            phone,
            email,
            password_hash,
            registered_at,
        } = client.dissolve();

        Self {
            client_id: id.get(),
            first_name,
            last_name,
            national_id,
            address,
            phone,
            email,
            password_hash: password_hash.as_str().to_owned(),
            registered_at,
        }
    }
}

impl From<ClientRecord> for Client {
    fn from(record: ClientRecord) -> Self {
        Client::builder()
            .id(record.client_id.into())
            .first_name(record.first_name)
            .last_name(record.last_name)
            .national_id(record.national_id)
            .address(record.address)
            .phone(record.phone)
            .email(record.email)
            .password_hash(PasswordHash::new(record.password_hash))
            .registered_at(record.registered_at)
            .build()
    }
}
