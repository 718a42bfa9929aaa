use address_integrity::Address;
use hdk::prelude::*;

use crate::settings::Tenant;

/// Address in the shape the checkout form binds to.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAddress {
    pub line1: String,
    pub line2: String,
    pub locality: String,
    pub postcode: String,
}

impl DisplayAddress {
    /// Blank form that only carries the postcode the customer typed.
    pub fn with_postcode(postcode: String) -> Self {
        Self {
            postcode,
            ..Self::default()
        }
    }
}

impl From<&Address> for DisplayAddress {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.line1.clone(),
            line2: address.optional_lines().collect::<Vec<_>>().join(", "),
            locality: address.city.clone(),
            postcode: address.zip_code.clone(),
        }
    }
}

/// Comparison key for a postcode: whitespace removed, letters upper-cased.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Display form of a postcode the customer typed.
///
/// UK postcodes typed without a space get one before the inward code (the
/// final three characters). Anything already spaced, too short to split, or
/// from another tenant is echoed trimmed.
pub fn format_postcode(query: &str, tenant: Tenant) -> String {
    let trimmed = query.trim();
    if tenant != Tenant::Uk || trimmed.chars().any(char::is_whitespace) {
        return trimmed.to_string();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= 3 {
        return trimmed.to_string();
    }

    let (outward, inward) = chars.split_at(chars.len() - 3);
    format!(
        "{} {}",
        outward.iter().collect::<String>(),
        inward.iter().collect::<String>()
    )
}

/// Pick the saved address that best fits the postcode the customer searched.
///
/// An empty query falls back to the default address. Otherwise a full
/// postcode match beats a prefix match (an outward code such as "AR51"), and
/// when nothing matches the form is left blank apart from the postcode.
pub fn closest_address(addresses: &[Address], query: &str, tenant: Tenant) -> DisplayAddress {
    if addresses.is_empty() {
        return DisplayAddress::default();
    }

    let needle = normalize_postcode(query);
    if needle.is_empty() {
        return addresses
            .iter()
            .find(|address| address.is_default)
            .map(DisplayAddress::from)
            .unwrap_or_default();
    }

    let exact = addresses
        .iter()
        .find(|address| normalize_postcode(&address.zip_code) == needle);
    let closest = exact.or_else(|| {
        addresses
            .iter()
            .find(|address| normalize_postcode(&address.zip_code).starts_with(&needle))
    });

    match closest {
        Some(address) => {
            debug!("CHECKOUT DNA: postcode {} matched {}", needle, address.zip_code);
            DisplayAddress::from(address)
        }
        None => {
            debug!("CHECKOUT DNA: no saved address for postcode {}", needle);
            DisplayAddress::with_postcode(format_postcode(query, tenant))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn area51_one_line() -> Address {
        Address {
            city: "Area 51".to_string(),
            zip_code: "AR51 1AA".to_string(),
            is_default: false,
            line1: "1 Test Road".to_string(),
            line2: None,
            line3: None,
        }
    }

    fn bristol_two_lines() -> Address {
        Address {
            city: "Bristol".to_string(),
            zip_code: "BS1 1AA".to_string(),
            is_default: false,
            line1: "1 Bristol Road".to_string(),
            line2: Some("Flat 1".to_string()),
            line3: None,
        }
    }

    fn london_three_lines_default() -> Address {
        Address {
            city: "London".to_string(),
            zip_code: "EC4M 7RF".to_string(),
            is_default: true,
            line1: "Fleet Place House".to_string(),
            line2: Some("Farringdon".to_string()),
            line3: Some("City of London".to_string()),
        }
    }

    fn all_addresses() -> Vec<Address> {
        vec![
            area51_one_line(),
            bristol_two_lines(),
            london_three_lines_default(),
        ]
    }

    fn london_display() -> DisplayAddress {
        DisplayAddress {
            line1: "Fleet Place House".to_string(),
            line2: "Farringdon, City of London".to_string(),
            locality: "London".to_string(),
            postcode: "EC4M 7RF".to_string(),
        }
    }

    #[test]
    fn empty_query_without_addresses_is_blank() {
        assert_eq!(
            closest_address(&[], "", Tenant::Uk),
            DisplayAddress::default()
        );
    }

    #[test]
    fn empty_query_returns_default_address() {
        assert_eq!(
            closest_address(&all_addresses(), "", Tenant::Uk),
            london_display()
        );
    }

    #[test]
    fn whitespace_query_returns_default_address() {
        assert_eq!(
            closest_address(&all_addresses(), "   ", Tenant::Uk),
            london_display()
        );
    }

    #[test]
    fn empty_query_without_default_is_blank() {
        let addresses = vec![area51_one_line(), bristol_two_lines()];
        assert_eq!(
            closest_address(&addresses, "", Tenant::Uk),
            DisplayAddress::default()
        );
    }

    #[test]
    fn unmatched_postcode_is_echoed() {
        assert_eq!(
            closest_address(&all_addresses(), "EN1 1AA", Tenant::Uk),
            DisplayAddress::with_postcode("EN1 1AA".to_string())
        );
    }

    #[test]
    fn unmatched_postcode_without_space_is_formatted() {
        assert_eq!(
            closest_address(&all_addresses(), "EN11AA", Tenant::Uk),
            DisplayAddress::with_postcode("EN1 1AA".to_string())
        );
    }

    #[test]
    fn full_postcode_match() {
        assert_eq!(
            closest_address(&all_addresses(), "BS1 1AA", Tenant::Uk),
            DisplayAddress {
                line1: "1 Bristol Road".to_string(),
                line2: "Flat 1".to_string(),
                locality: "Bristol".to_string(),
                postcode: "BS1 1AA".to_string(),
            }
        );
    }

    #[test]
    fn full_postcode_match_ignores_spacing_and_case() {
        assert_eq!(
            closest_address(&all_addresses(), "EC4M7RF", Tenant::Uk),
            london_display()
        );
        assert_eq!(
            closest_address(&all_addresses(), "ec4m 7rf", Tenant::Uk),
            london_display()
        );
    }

    #[test]
    fn partial_postcode_match() {
        assert_eq!(
            closest_address(&all_addresses(), "AR51", Tenant::Uk),
            DisplayAddress {
                line1: "1 Test Road".to_string(),
                line2: String::new(),
                locality: "Area 51".to_string(),
                postcode: "AR51 1AA".to_string(),
            }
        );
    }

    #[test]
    fn exact_match_wins_over_earlier_prefix_match() {
        let mut short = bristol_two_lines();
        short.zip_code = "BS1 1AAX".to_string();
        let addresses = vec![short, bristol_two_lines()];
        assert_eq!(
            closest_address(&addresses, "BS11AA", Tenant::Uk).postcode,
            "BS1 1AA"
        );
    }

    #[test]
    fn other_tenants_echo_query() {
        assert_eq!(
            closest_address(&all_addresses(), "2000", Tenant::Au),
            DisplayAddress::with_postcode("2000".to_string())
        );
    }

    #[test]
    fn format_leaves_short_postcodes_alone() {
        assert_eq!(format_postcode("EN1", Tenant::Uk), "EN1");
        assert_eq!(format_postcode(" en11aa ", Tenant::Uk), "en1 1aa");
    }

    proptest! {
        #[test]
        fn no_addresses_always_blank(query in ".*") {
            prop_assert_eq!(closest_address(&[], &query, Tenant::Uk), DisplayAddress::default());
        }

        #[test]
        fn any_spacing_and_casing_of_saved_postcode_matches(
            index in 0usize..3,
            lowercase in proptest::collection::vec(any::<bool>(), 8),
            spaces in proptest::collection::vec(0usize..3, 9),
        ) {
            let addresses = all_addresses();
            let target = &addresses[index];
            let mut query = String::new();
            for (i, c) in target.zip_code.chars().filter(|c| !c.is_whitespace()).enumerate() {
                query.push_str(&" ".repeat(spaces[i % spaces.len()]));
                if lowercase[i % lowercase.len()] {
                    query.extend(c.to_lowercase());
                } else {
                    query.push(c);
                }
            }
            query.push_str(&" ".repeat(spaces[spaces.len() - 1]));

            prop_assert_eq!(
                closest_address(&addresses, &query, Tenant::Uk),
                DisplayAddress::from(target)
            );
        }

        #[test]
        fn normalized_postcode_has_no_whitespace(postcode in ".*") {
            prop_assert!(!normalize_postcode(&postcode).chars().any(char::is_whitespace));
        }
    }
}
