use hdi::prelude::*;

// One key-value pair of the agent's private checkout storage
#[hdk_entry_helper]
#[derive(Clone, PartialEq)]
pub struct StoredValue {
    pub key: String,
    pub value: String,
}

pub fn validate_stored_value(stored: &StoredValue) -> ExternResult<ValidateCallbackResult> {
    if stored.key.is_empty() {
        return Ok(ValidateCallbackResult::Invalid(
            "Stored value must have a key".to_string(),
        ));
    }
    Ok(ValidateCallbackResult::Valid)
}
