use address_integrity::*;
use hdk::prelude::*;

mod address;
pub mod matcher;
pub mod settings;
pub mod store;
pub mod stored;

use matcher::DisplayAddress;
use settings::load_settings;
use store::{KeyValueStore, SourceChainStore};
use stored::LoadedAddress;

fn open_store() -> Option<SourceChainStore> {
    SourceChainStore::open(&load_settings())
}

// Address book
#[hdk_extern]
pub fn create_address(address: Address) -> ExternResult<ActionHash> {
    address::create_address_impl(address)
}

#[hdk_extern]
pub fn get_addresses(_: ()) -> ExternResult<Vec<(ActionHash, Address)>> {
    address::get_addresses_impl()
}

#[hdk_extern]
pub fn get_address(action_hash: ActionHash) -> ExternResult<Option<Address>> {
    address::get_address_impl(action_hash)
}

#[hdk_extern]
pub fn update_address(input: (ActionHash, Address)) -> ExternResult<ActionHash> {
    address::update_address_impl(input.0, input.1)
}

#[hdk_extern]
pub fn delete_address(address_hash: ActionHash) -> ExternResult<ActionHash> {
    address::delete_address_impl(address_hash)
}

// Best saved address for the postcode typed at checkout
#[hdk_extern]
pub fn get_closest_address(query: String) -> ExternResult<DisplayAddress> {
    let settings = load_settings();
    let addresses: Vec<Address> = address::get_addresses_impl()?
        .into_iter()
        .map(|(_, address)| address)
        .collect();
    Ok(matcher::closest_address(&addresses, &query, settings.tenant))
}

// Last selected address
#[hdk_extern]
pub fn is_address_stored(_: ()) -> ExternResult<bool> {
    let store = open_store();
    Ok(stored::is_stored(store.as_ref().map(|s| s as &dyn KeyValueStore)))
}

#[hdk_extern]
pub fn get_stored_address(_: ()) -> ExternResult<Option<LoadedAddress>> {
    let store = open_store();
    Ok(stored::load_stored(store.as_ref().map(|s| s as &dyn KeyValueStore)))
}

#[hdk_extern]
pub fn save_selected_address(address: DisplayAddress) -> ExternResult<()> {
    match open_store() {
        Some(store) => stored::save_stored(&store, &address),
        None => {
            warn!("CHECKOUT DNA: address storage unavailable, selection not saved");
            Ok(())
        }
    }
}

#[hdk_extern]
pub fn clear_stored_address(_: ()) -> ExternResult<()> {
    match open_store() {
        Some(store) => stored::clear_stored(&store),
        None => Ok(()),
    }
}

#[hdk_extern]
pub fn does_stored_address_match_form(form: DisplayAddress) -> ExternResult<bool> {
    let store = open_store();
    Ok(stored::read_stored(store.as_ref().map(|s| s as &dyn KeyValueStore))
        .is_some_and(|stored| stored::matches_form(&stored, &form)))
}
