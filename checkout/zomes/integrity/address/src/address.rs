use hdi::prelude::*;

// Saved customer address. Field names follow the checkout API payloads
// ("Line1", "ZipCode", ...) so records round-trip with the web client.
#[hdk_entry_helper]
#[derive(Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub city: String,
    #[serde(alias = "PostalCode")]
    pub zip_code: String,
    #[serde(default)]
    pub is_default: bool,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub line3: Option<String>,
}

impl Address {
    /// Secondary lines that carry text, in order.
    pub fn optional_lines(&self) -> impl Iterator<Item = &str> {
        [self.line2.as_deref(), self.line3.as_deref()]
            .into_iter()
            .flatten()
            .filter(|line| !line.trim().is_empty())
    }
}

pub fn validate_address(address: &Address) -> ExternResult<ValidateCallbackResult> {
    if address.line1.trim().is_empty() {
        return Ok(ValidateCallbackResult::Invalid(
            "Address must have a first line".to_string(),
        ));
    }
    if address.zip_code.trim().is_empty() {
        return Ok(ValidateCallbackResult::Invalid(
            "Address must have a postcode".to_string(),
        ));
    }
    Ok(ValidateCallbackResult::Valid)
}
