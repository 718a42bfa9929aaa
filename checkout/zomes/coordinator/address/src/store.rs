use address_integrity::*;
use hdk::prelude::*;

use crate::settings::CheckoutSettings;

/// String key-value storage scoped to the calling agent.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ExternResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ExternResult<()>;
    fn clear(&self) -> ExternResult<()>;
}

// Private StoredValue entries linked from the agent key, link tag = storage key
pub struct SourceChainStore {
    agent: AgentPubKey,
}

impl SourceChainStore {
    /// Store for the calling agent, or `None` when persistence is switched off
    /// in the DNA properties or the agent cannot be resolved.
    pub fn open(settings: &CheckoutSettings) -> Option<Self> {
        if !settings.remember_last_address {
            return None;
        }
        match agent_info() {
            Ok(info) => Some(Self {
                agent: info.agent_initial_pubkey,
            }),
            Err(e) => {
                warn!("CHECKOUT DNA: storage unavailable, no agent info: {:?}", e);
                None
            }
        }
    }

    fn links(&self) -> ExternResult<Vec<Link>> {
        get_links(
            GetLinksInputBuilder::try_new(self.agent.clone(), LinkTypes::AgentToStoredValue)?
                .build(),
        )
    }

    fn links_for_key(&self, key: &str) -> ExternResult<Vec<Link>> {
        let tag = LinkTag::new(key);
        let links = get_links(
            GetLinksInputBuilder::try_new(self.agent.clone(), LinkTypes::AgentToStoredValue)?
                .tag_prefix(tag.clone())
                .build(),
        )?;
        // tag_prefix also returns longer keys sharing the prefix
        Ok(links.into_iter().filter(|link| link.tag == tag).collect())
    }
}

impl KeyValueStore for SourceChainStore {
    fn get(&self, key: &str) -> ExternResult<Option<String>> {
        let Some(link) = self.links_for_key(key)?.into_iter().last() else {
            return Ok(None);
        };
        let target_hash = link
            .target
            .into_action_hash()
            .ok_or(wasm_error!("Invalid target hash"))?;

        match get(target_hash, GetOptions::default())? {
            Some(record) => {
                let stored: Option<StoredValue> = record
                    .entry()
                    .to_app_option()
                    .map_err(|e| wasm_error!(e))?;
                Ok(stored.map(|stored| stored.value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> ExternResult<()> {
        // Replace: drop links to older values for this key, then link the new one
        for link in self.links_for_key(key)? {
            delete_link(link.create_link_hash)?;
        }

        let hash = create_entry(EntryTypes::StoredValue(StoredValue {
            key: key.to_string(),
            value: value.to_string(),
        }))?;
        create_link(
            self.agent.clone(),
            hash,
            LinkTypes::AgentToStoredValue,
            LinkTag::new(key),
        )?;

        warn!("💾 CHECKOUT DNA: stored value for key {}", key);
        Ok(())
    }

    fn clear(&self) -> ExternResult<()> {
        let links = self.links()?;
        let count = links.len();
        for link in links {
            delete_link(link.create_link_hash)?;
        }
        warn!("🗑️ CHECKOUT DNA: cleared {} stored values", count);
        Ok(())
    }
}
