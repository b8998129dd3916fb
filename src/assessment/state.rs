//! Wizard step sequencing: which step follows or precedes the current one.

use serde::{Deserialize, Serialize};

use super::model::AssessmentRecord;

/// Total number of wizard steps.
pub const STEP_COUNT: u8 = 5;

/// The steps of the assessment wizard.
///
/// Always starts at `Client` and ends at `Scoring`, which carries the submit
/// action. `Auto` and `Home` are gated by the record's branch flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Client,
    Auto,
    Home,
    General,
    Scoring,
}

/// The record flags that gate whole steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchFlags {
    pub auto_needed: bool,
    pub home_needed: bool,
}

impl From<&AssessmentRecord> for BranchFlags {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            auto_needed: record.auto_needed,
            home_needed: record.home_needed,
        }
    }
}

impl WizardStep {
    /// 1-based position of this step.
    pub fn number(&self) -> u8 {
        match self {
            Self::Client => 1,
            Self::Auto => 2,
            Self::Home => 3,
            Self::General => 4,
            Self::Scoring => 5,
        }
    }

    /// Look up a step by its 1-based position.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Client),
            2 => Some(Self::Auto),
            3 => Some(Self::Home),
            4 => Some(Self::General),
            5 => Some(Self::Scoring),
            _ => None,
        }
    }

    /// Heading shown for this step.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Client => "Client Information",
            Self::Auto => "Auto Insurance Assessment",
            Self::Home => "Homeowners Insurance Assessment",
            Self::General => "General Assessment",
            Self::Scoring => "Agent Scoring & Notes",
        }
    }

    /// Progress bar fill, as a percentage.
    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.number()) * 100 / u16::from(STEP_COUNT)) as u8
    }

    /// Whether this is the submit-bearing final step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Scoring)
    }

    /// Whether this step has content under the given flags.
    pub fn is_shown(&self, flags: BranchFlags) -> bool {
        match self {
            Self::Auto => flags.auto_needed,
            Self::Home => flags.home_needed,
            _ => true,
        }
    }

    /// The step reached by pressing Next.
    ///
    /// A gated step whose flag is off hands straight over to the step after
    /// it. `Scoring` stays put; submission is a separate action.
    pub fn next(&self, flags: BranchFlags) -> WizardStep {
        use WizardStep::*;
        match self {
            Auto if !flags.auto_needed => Home,
            Home if !flags.home_needed => General,
            _ => Self::from_number(self.number() + 1).unwrap_or(Scoring),
        }
    }

    /// The step reached by pressing Back.
    ///
    /// Always the immediately preceding step, even when that step's flag is
    /// off. `Client` stays put.
    pub fn previous(&self) -> WizardStep {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::Client)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Client
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Client => "client",
            Self::Auto => "auto",
            Self::Home => "home",
            Self::General => "general",
            Self::Scoring => "scoring",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::WizardStep::*;

    const ALL_STEPS: [WizardStep; 5] = [Client, Auto, Home, General, Scoring];

    fn all_flags() -> Vec<BranchFlags> {
        let mut flags = Vec::new();
        for auto_needed in [false, true] {
            for home_needed in [false, true] {
                flags.push(BranchFlags {
                    auto_needed,
                    home_needed,
                });
            }
        }
        flags
    }

    #[test]
    fn numbers_roundtrip() {
        for step in ALL_STEPS {
            assert_eq!(WizardStep::from_number(step.number()), Some(step));
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(6), None);
    }

    #[test]
    fn next_and_previous_stay_in_range() {
        for flags in all_flags() {
            for step in ALL_STEPS {
                let next = step.next(flags);
                let prev = step.previous();
                assert!((1..=STEP_COUNT).contains(&next.number()));
                assert!((1..=STEP_COUNT).contains(&prev.number()));
                assert!(next >= step, "next must not move backward from {step}");
                assert!(prev <= step, "previous must not move forward from {step}");
            }
        }
    }

    #[test]
    fn next_walks_all_steps_when_both_flags_set() {
        let flags = BranchFlags {
            auto_needed: true,
            home_needed: true,
        };
        let mut current = Client;
        for expected in [Auto, Home, General, Scoring] {
            current = current.next(flags);
            assert_eq!(current, expected);
        }
        assert_eq!(current.next(flags), Scoring);
    }

    #[test]
    fn next_skips_gated_steps() {
        let none = BranchFlags::default();
        assert_eq!(Auto.next(none), Home);
        assert_eq!(Home.next(none), General);

        let auto_only = BranchFlags {
            auto_needed: true,
            home_needed: false,
        };
        assert_eq!(Auto.next(auto_only), Home);
        assert_eq!(Home.next(auto_only), General);

        // Client always moves on to the auto slot; the session passes through it.
        assert_eq!(Client.next(none), Auto);
    }

    #[test]
    fn previous_never_skips() {
        assert_eq!(General.previous(), Home);
        assert_eq!(Home.previous(), Auto);
        assert_eq!(Auto.previous(), Client);
        assert_eq!(Client.previous(), Client);
        assert_eq!(Scoring.previous(), General);
    }

    #[test]
    fn visibility_follows_flags() {
        let none = BranchFlags::default();
        assert!(Client.is_shown(none));
        assert!(!Auto.is_shown(none));
        assert!(!Home.is_shown(none));
        assert!(General.is_shown(none));
        assert!(Scoring.is_shown(none));

        let home_only = BranchFlags {
            auto_needed: false,
            home_needed: true,
        };
        assert!(Home.is_shown(home_only));
    }

    #[test]
    fn only_scoring_is_terminal() {
        for step in ALL_STEPS {
            assert_eq!(step.is_terminal(), step == Scoring);
        }
    }

    #[test]
    fn progress_and_titles() {
        assert_eq!(Client.progress_percent(), 20);
        assert_eq!(General.progress_percent(), 80);
        assert_eq!(Scoring.progress_percent(), 100);
        assert_eq!(Home.title(), "Homeowners Insurance Assessment");
        assert_eq!(Scoring.title(), "Agent Scoring & Notes");
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL_STEPS {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json, "mismatch for {step:?}");
        }
    }

    #[test]
    fn flags_come_from_record() {
        let mut record = AssessmentRecord::default();
        record.home_needed = true;
        let flags = BranchFlags::from(&record);
        assert!(!flags.auto_needed);
        assert!(flags.home_needed);
    }
}
