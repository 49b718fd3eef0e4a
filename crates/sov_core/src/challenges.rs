//! Daily challenge catalog.
//!
//! Static definitions for the one-per-day challenges the ledger credits.
//! The catalog is data only; completion and dedup live in the ledger.

use crate::ledger::ChallengeType;

/// One challenge definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeDef {
    pub id: &'static str,
    pub challenge_type: ChallengeType,
    pub xp_reward: i64,
    pub description: &'static str,
}

/// The built-in daily challenges.
pub const DAILY_CHALLENGES: &[ChallengeDef] = &[
    ChallengeDef {
        id: "morning_meditation",
        challenge_type: ChallengeType::Meditation,
        xp_reward: 30,
        description: "Meditate for ten minutes before noon",
    },
    ChallengeDef {
        id: "gratitude_note",
        challenge_type: ChallengeType::Gratitude,
        xp_reward: 20,
        description: "Write down three things you are grateful for",
    },
    ChallengeDef {
        id: "full_workout",
        challenge_type: ChallengeType::Exercise,
        xp_reward: 40,
        description: "Complete 40 minutes of exercise",
    },
    ChallengeDef {
        id: "cook_at_home",
        challenge_type: ChallengeType::Nutrition,
        xp_reward: 25,
        description: "Cook every meal at home today",
    },
    ChallengeDef {
        id: "no_spend_day",
        challenge_type: ChallengeType::Financial,
        xp_reward: 30,
        description: "Spend nothing beyond essentials",
    },
    ChallengeDef {
        id: "deep_reading",
        challenge_type: ChallengeType::Learning,
        xp_reward: 25,
        description: "Read or study for thirty minutes",
    },
    ChallengeDef {
        id: "leave_no_trace",
        challenge_type: ChallengeType::Environmental,
        xp_reward: 20,
        description: "Take one concrete environmental action",
    },
];

/// Look up a challenge by id.
pub fn find_challenge(id: &str) -> Option<&'static ChallengeDef> {
    DAILY_CHALLENGES.iter().find(|c| c.id == id)
}
