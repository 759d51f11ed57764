//! Demo startups inserted into an empty database.

use funding_ledger::parse_ether;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::errors::Result;

struct DemoStartup {
    owner_digit: char,
    name: &'static str,
    description: &'static str,
    goal_eth: &'static str,
}

const DEMO_STARTUPS: &[DemoStartup] = &[
    DemoStartup {
        owner_digit: 'a',
        name: "NeuroFlow AI",
        description: "AI-powered cognitive wellness platform with real-time mental health insights.",
        goal_eth: "15",
    },
    DemoStartup {
        owner_digit: 'b',
        name: "GreenGrow Labs",
        description: "Precision agriculture tech reducing crop water usage by 40% using IoT sensors.",
        goal_eth: "12",
    },
    DemoStartup {
        owner_digit: 'c',
        name: "FinEdge",
        description: "Decentralized micro-lending platform enabling SMEs to access capital instantly.",
        goal_eth: "20",
    },
    DemoStartup {
        owner_digit: 'd',
        name: "HealthLoop",
        description: "Virtual care platform connecting rural patients with specialist doctors.",
        goal_eth: "10",
    },
    DemoStartup {
        owner_digit: 'e',
        name: "CleanSea",
        description: "Autonomous underwater drones for ocean cleanup and marine biodiversity restoration.",
        goal_eth: "25",
    },
    DemoStartup {
        owner_digit: 'f',
        name: "ByteShield",
        description: "Quantum-resistant cybersecurity infrastructure for enterprise data protection.",
        goal_eth: "18",
    },
    DemoStartup {
        owner_digit: '1',
        name: "EcoDrive",
        description: "Last-mile delivery optimization using AI routing and electric vehicle fleet.",
        goal_eth: "22",
    },
];

/// Insert the demo startups if no campaign exists yet. Returns how many
/// were inserted.
pub async fn seed_demo_campaigns(pool: &SqlitePool) -> Result<usize> {
    if db::count_campaigns(pool).await? > 0 {
        return Ok(0);
    }

    for startup in DEMO_STARTUPS {
        let owner = format!("0x{}", startup.owner_digit.to_string().repeat(40));
        let goal = parse_ether(startup.goal_eth)?;
        db::insert_campaign(pool, &owner, startup.name, startup.description, goal).await?;
    }
    info!("Seeded {} demo campaigns", DEMO_STARTUPS.len());
    Ok(DEMO_STARTUPS.len())
}
