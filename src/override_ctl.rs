//! Override Controller – operator-entered hazard lists.

use crate::error::Result;
use crate::gateway::Backend;
use crate::service::{DashboardService, PlanOutcome};
use crate::types::HazardList;
use log::info;
use std::sync::Arc;

/// Parse comma-separated operator input into a hazard list.
///
/// Entries are trimmed and empty entries dropped. Blank input yields an
/// empty list, which is a real override ("clear all hazards"), not a no-op.
pub fn parse_hazard_input(text: &str) -> HazardList {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Result of one operator submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideReceipt {
    /// The list exactly as sent to the backend.
    pub hazards: HazardList,
    pub outcome: PlanOutcome,
}

pub struct OverrideController<B> {
    service: Arc<DashboardService<B>>,
}

impl<B: Backend> OverrideController<B> {
    pub fn new(service: Arc<DashboardService<B>>) -> Self {
        Self { service }
    }

    /// Parse `input`, submit it, and render the response immediately.
    ///
    /// Runs independently of the poll loops; it neither waits for nor
    /// delays a tick.
    pub async fn submit(&self, input: &str) -> Result<OverrideReceipt> {
        let hazards = parse_hazard_input(input);
        info!("Operator override: {:?}", hazards);
        let outcome = self.service.submit_override(&hazards).await?;
        Ok(OverrideReceipt { hazards, outcome })
    }
}
