use crate::error::AppError;
use crate::firewall::Firewall;
use netreach_domain::config::EffectiveConfig;
use netreach_inventory::{ChainCache, Inventory, InventoryError, ResolutionError, resolve_chain};

/// One analysis run over an inventory.
///
/// Owns the chain cache: networks fetched through the same `Analysis` share
/// one resolution per (project, network), and nothing outlives the run.
#[derive(Debug)]
pub struct Analysis<I> {
    inventory: I,
    cache: ChainCache,
    config: EffectiveConfig,
}

/// A VPC network and the firewall that governs it.
#[derive(Clone, Debug)]
pub struct Network {
    pub project_id: String,
    pub name: String,
    pub id: Option<String>,
    pub self_link: Option<String>,
    pub firewall: Firewall,
}

impl<I: Inventory> Analysis<I> {
    pub fn new(inventory: I, config: EffectiveConfig) -> Self {
        Self {
            inventory,
            cache: ChainCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn get_network(&self, project_id: &str, name: &str) -> Result<Network, AppError> {
        let not_found = || AppError::NotFound {
            project: project_id.to_string(),
            network: name.to_string(),
        };

        let records = match self.inventory.networks(project_id) {
            Ok(records) => records,
            Err(InventoryError::NotFound(_)) => return Err(not_found()),
            Err(e) => {
                return Err(ResolutionError::Network {
                    project: project_id.to_string(),
                    message: e.to_string(),
                }
                .into());
            }
        };
        let record = records
            .into_iter()
            .find(|n| n.name == name)
            .ok_or_else(not_found)?;

        let chain = self.cache.get_or_resolve(project_id, name, || {
            resolve_chain(&self.inventory, project_id, name, &self.config)
        })?;

        Ok(Network {
            project_id: project_id.to_string(),
            name: record.name,
            id: record.id,
            self_link: record.self_link,
            firewall: Firewall::new(chain, self.config.clone()),
        })
    }
}
