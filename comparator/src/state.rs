//! Job identity, phases, and the verifier each phase runs.

use std::fmt;

use certcmp_types::VerifyOutcome;

/// Identity of a trial comparison job within its comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The verifier a job phase calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Trial,
    /// Trial verifier with revocation checking forced on.
    RevocationRecheck,
    /// Primary re-verifier aimed at the chain the trial built.
    PathRecheck,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Primary => "primary",
            Stage::Trial => "trial",
            Stage::RevocationRecheck => "revocation_recheck",
            Stage::PathRecheck => "path_recheck",
        }
    }
}

/// Where a job is in its lifecycle. Outcomes travel with the state that
/// needs them, so a phase cannot read a result that has not arrived yet.
#[derive(Debug)]
pub(crate) enum JobState {
    PrimaryPending,
    TrialPending {
        primary: VerifyOutcome,
    },
    /// Between phases: an outcome is being handled on the stack.
    Comparing,
    RevocationRecheckPending {
        primary: VerifyOutcome,
        trial: VerifyOutcome,
    },
    PathRecheckPending {
        primary: VerifyOutcome,
        trial: VerifyOutcome,
    },
    Finished,
}

impl JobState {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            JobState::PrimaryPending => "primary_pending",
            JobState::TrialPending { .. } => "trial_pending",
            JobState::Comparing => "comparing",
            JobState::RevocationRecheckPending { .. } => "revocation_recheck_pending",
            JobState::PathRecheckPending { .. } => "path_recheck_pending",
            JobState::Finished => "finished",
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        matches!(self, JobState::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_displays_as_number() {
        assert_eq!(JobId(42).to_string(), "42");
    }

    #[test]
    fn stage_labels_are_distinct() {
        let labels = [
            Stage::Primary.as_str(),
            Stage::Trial.as_str(),
            Stage::RevocationRecheck.as_str(),
            Stage::PathRecheck.as_str(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
