use hdk::prelude::*;

use crate::matcher::DisplayAddress;
use crate::store::KeyValueStore;

/// Key the last selected address is kept under.
pub const STORAGE_KEY: &str = "je-full-address-details";

// The record as the web client writes it. Every field is optional because the
// client also stores bare postcode searches ({"searchBoxAddress": "BS3 4RL"}).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct StoredAddress {
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub postal_code: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    #[serde(rename = "searchBoxAddress", skip_serializing_if = "Option::is_none")]
    pub search_box_address: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

impl StoredAddress {
    /// PostalCode, falling back to ZipCode.
    pub fn postcode(&self) -> Option<&str> {
        present(&self.postal_code).or_else(|| present(&self.zip_code))
    }

    pub fn lines(&self) -> Vec<String> {
        [&self.line1, &self.line2, &self.line3]
            .into_iter()
            .filter_map(present)
            .map(str::to_string)
            .collect()
    }

    pub fn secondary_line(&self) -> String {
        [&self.line2, &self.line3]
            .into_iter()
            .filter_map(present)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<&DisplayAddress> for StoredAddress {
    fn from(address: &DisplayAddress) -> Self {
        let optional = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
        Self {
            city: optional(&address.locality),
            postal_code: optional(&address.postcode),
            line1: optional(&address.line1),
            line2: optional(&address.line2),
            ..Self::default()
        }
    }
}

/// Stored address as handed back to the checkout page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadedAddress {
    pub lines: Vec<String>,
    pub locality: String,
    pub postal_code: String,
}

/// Read and decode the stored record. Every failure reads as "nothing stored".
pub fn read_stored(store: Option<&dyn KeyValueStore>) -> Option<StoredAddress> {
    let store = store?;
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("CHECKOUT DNA: could not read stored address: {:?}", e);
            return None;
        }
    };

    match serde_json::from_str::<StoredAddress>(&raw) {
        Ok(address) => Some(address),
        Err(e) => {
            debug!("CHECKOUT DNA: ignoring malformed stored address: {}", e);
            None
        }
    }
}

pub fn is_stored(store: Option<&dyn KeyValueStore>) -> bool {
    read_stored(store).is_some_and(|address| address.postcode().is_some())
}

pub fn load_stored(store: Option<&dyn KeyValueStore>) -> Option<LoadedAddress> {
    let address = read_stored(store)?;
    let postal_code = address.postcode()?.to_string();
    Some(LoadedAddress {
        lines: address.lines(),
        locality: address.city.clone().unwrap_or_default(),
        postal_code,
    })
}

pub fn save_stored(store: &dyn KeyValueStore, address: &DisplayAddress) -> ExternResult<()> {
    let json = serde_json::to_string(&StoredAddress::from(address))
        .map_err(|e| wasm_error!(WasmErrorInner::Guest(format!("Failed to serialize: {}", e))))?;
    store.set(STORAGE_KEY, &json)
}

pub fn clear_stored(store: &dyn KeyValueStore) -> ExternResult<()> {
    store.clear()
}

/// Whether the stored record and the checkout form describe the same address.
///
/// A record without a postcode (a bare postcode search) never matches, and a
/// missing first line or city never equals an empty form field.
pub fn matches_form(stored: &StoredAddress, form: &DisplayAddress) -> bool {
    let Some(postcode) = stored.postcode() else {
        return false;
    };
    postcode == form.postcode
        && stored.line1.as_deref() == Some(form.line1.as_str())
        && stored.secondary_line() == form.line2
        && stored.city.as_deref() == Some(form.locality.as_str())
}
