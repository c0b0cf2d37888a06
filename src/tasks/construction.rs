use super::tasksystem::*;
use crate::features::Settings;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Ticks to wait once the host refuses new sites because too many exist.
const SITE_LIMIT_BACKOFF: u32 = 50;

/// Places planned construction sites one per run. Owned by a production
/// facility and only runs every `construction_cadence` ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceConstructionSitesTask {
    sites: Vec<PlannedSite>,
    #[serde(default)]
    next: usize,
}

impl PlaceConstructionSitesTask {
    pub fn new(sites: Vec<PlannedSite>) -> PlaceConstructionSitesTask {
        PlaceConstructionSitesTask { sites, next: 0 }
    }

    pub fn remaining(&self) -> &[PlannedSite] {
        self.sites.get(self.next..).unwrap_or(&[])
    }
}

impl TaskBehavior for PlaceConstructionSitesTask {
    fn label(&self) -> &'static str {
        "plan"
    }

    fn can_execute(&self, entity: &EntitySnapshot) -> bool {
        entity.is_production_facility()
    }

    fn cadence(&self, settings: &Settings) -> u32 {
        settings.construction_cadence
    }

    fn completed(&self, _ctx: &TaskContext) -> bool {
        self.next >= self.sites.len()
    }

    fn execute(&mut self, ctx: &mut TaskContext, _carried: Option<&CarriedState>) -> TaskStatus {
        let site = match self.sites.get(self.next) {
            Some(site) => site,
            None => return TaskStatus::Finished,
        };

        match ctx.host.create_construction_site(site.pos, site.kind) {
            ActionResult::Ok => {
                debug!("Placed {:?} site at {:?}", site.kind, site.pos);

                self.next += 1;
            }
            ActionResult::Full => {
                return TaskStatus::Backoff(SITE_LIMIT_BACKOFF);
            }
            other => {
                debug!("Skipping planned {:?} at {:?}: {:?}", site.kind, site.pos, other);

                self.next += 1;
            }
        }

        TaskStatus::Continue
    }
}
