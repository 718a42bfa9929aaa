use address_integrity::*;
use hdk::prelude::*;

fn decode_address(record: &Record) -> ExternResult<Option<Address>> {
    record.entry().to_app_option::<Address>().map_err(|e| {
        wasm_error!(WasmErrorInner::Guest(format!(
            "Failed to deserialize: {}",
            e
        )))
    })
}

fn address_links(agent_pub_key: &AgentPubKey) -> ExternResult<Vec<Link>> {
    get_links(
        GetLinksInputBuilder::try_new(agent_pub_key.clone(), LinkTypes::AgentToAddress)?.build(),
    )
}

// Only one address may be the default: re-link every other default address to
// a non-default copy (entries are immutable).
fn clear_other_defaults(agent_pub_key: &AgentPubKey, keep: &ActionHash) -> ExternResult<()> {
    for link in address_links(agent_pub_key)? {
        let Some(target_hash) = link.target.into_action_hash() else {
            continue;
        };
        if &target_hash == keep {
            continue;
        }
        let Ok(record) = must_get_valid_record(target_hash) else {
            continue;
        };
        let Some(existing_address) = decode_address(&record)? else {
            continue;
        };

        if existing_address.is_default {
            let mut updated = existing_address;
            updated.is_default = false;

            delete_link(link.create_link_hash)?;
            let updated_hash = create_entry(EntryTypes::Address(updated))?;
            create_link(
                agent_pub_key.clone(),
                updated_hash,
                LinkTypes::AgentToAddress,
                LinkTag::new(""),
            )?;
            warn!("🔗 CHECKOUT DNA: Cleared default flag on previous default address");
        }
    }
    Ok(())
}

pub fn create_address_impl(address: Address) -> ExternResult<ActionHash> {
    let agent_pub_key = agent_info()?.agent_initial_pubkey;

    warn!(
        "🏠 CHECKOUT DNA: Creating private address entry: {}, {} {}",
        address.line1, address.city, address.zip_code
    );

    let address_hash = create_entry(EntryTypes::Address(address.clone()))?;

    if address.is_default {
        clear_other_defaults(&agent_pub_key, &address_hash)?;
    }

    create_link(
        agent_pub_key,
        address_hash.clone(),
        LinkTypes::AgentToAddress,
        LinkTag::new(""),
    )?;

    warn!("✅ CHECKOUT DNA: Private address created with hash: {:?}", address_hash);
    Ok(address_hash)
}

pub fn get_addresses_impl() -> ExternResult<Vec<(ActionHash, Address)>> {
    let agent_pub_key = agent_info()?.agent_initial_pubkey;

    let mut addresses = Vec::new();

    for link in address_links(&agent_pub_key)? {
        if let Some(target_hash) = link.target.into_action_hash() {
            if let Ok(record) = must_get_valid_record(target_hash.clone()) {
                if let Some(address) = decode_address(&record)? {
                    addresses.push((target_hash, address));
                }
            }
        }
    }

    Ok(addresses)
}

pub fn get_address_impl(action_hash: ActionHash) -> ExternResult<Option<Address>> {
    match get(action_hash, GetOptions::default())? {
        Some(record) => decode_address(&record),
        None => Ok(None),
    }
}

pub fn update_address_impl(action_hash: ActionHash, address: Address) -> ExternResult<ActionHash> {
    warn!("🔄 CHECKOUT DNA: Updating private address with hash: {:?}", action_hash);

    let agent_pub_key = agent_info()?.agent_initial_pubkey;

    delete_address_link(&agent_pub_key, &action_hash)?;

    let new_address_hash = create_entry(EntryTypes::Address(address.clone()))?;

    if address.is_default {
        clear_other_defaults(&agent_pub_key, &new_address_hash)?;
    }

    create_link(
        agent_pub_key,
        new_address_hash.clone(),
        LinkTypes::AgentToAddress,
        LinkTag::new(""),
    )?;

    warn!("✅ CHECKOUT DNA: Updated private address created with hash: {:?}", new_address_hash);
    Ok(new_address_hash)
}

fn delete_address_link(agent_pub_key: &AgentPubKey, action_hash: &ActionHash) -> ExternResult<()> {
    for link in address_links(agent_pub_key)? {
        if link.target.clone().into_action_hash().as_ref() == Some(action_hash) {
            delete_link(link.create_link_hash)?;
            break;
        }
    }
    Ok(())
}

pub fn delete_address_impl(action_hash: ActionHash) -> ExternResult<ActionHash> {
    warn!("🗑️ CHECKOUT DNA: Deleting private address with hash: {:?}", action_hash);

    let agent_pub_key = agent_info()?.agent_initial_pubkey;

    // Entry stays on the source chain but is no longer reachable
    delete_address_link(&agent_pub_key, &action_hash)?;

    Ok(action_hash)
}
