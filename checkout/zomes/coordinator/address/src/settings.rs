use hdk::prelude::*;

/// Market the checkout runs in. Only affects how typed postcodes are shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tenant {
    #[default]
    Uk,
    Ie,
    Au,
    Nz,
    #[serde(other)]
    Other,
}

// DNA properties, e.g.
//   properties:
//     tenant: uk
//     remember_last_address: true
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, SerializedBytes)]
#[serde(default)]
pub struct CheckoutSettings {
    pub tenant: Tenant,
    pub remember_last_address: bool,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            tenant: Tenant::Uk,
            remember_last_address: true,
        }
    }
}

pub fn load_settings() -> CheckoutSettings {
    let properties = match dna_info() {
        Ok(info) => info.modifiers.properties,
        Err(e) => {
            warn!("CHECKOUT DNA: could not read DNA info, using default settings: {:?}", e);
            return CheckoutSettings::default();
        }
    };

    CheckoutSettings::try_from(properties).unwrap_or_else(|e| {
        debug!("CHECKOUT DNA: no usable DNA properties ({:?}), using defaults", e);
        CheckoutSettings::default()
    })
}
