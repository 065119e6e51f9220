//! Backend that records jobs instead of running them.

use crate::error::Result;
use crate::evaluate::{EvaluationBackend, LossJob, ReconstructionJob};
use serde::Serialize;

/// Collects evaluation jobs so they can be handed to an external tool.
#[derive(Debug, Default, Serialize)]
pub struct EvaluationPlan {
    /// Reconstruction request, once dispatched.
    pub reconstruction: Option<ReconstructionJob>,
    /// Loss plot request, once dispatched.
    pub loss: Option<LossJob>,
}

impl EvaluationBackend for EvaluationPlan {
    fn plot_reconstruction(&mut self, job: &ReconstructionJob) -> Result<()> {
        self.reconstruction = Some(job.clone());
        Ok(())
    }

    fn plot_loss(&mut self, job: &LossJob) -> Result<()> {
        self.loss = Some(job.clone());
        Ok(())
    }
}
