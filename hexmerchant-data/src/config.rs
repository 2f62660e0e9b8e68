use serde::{Deserialize, Serialize};

use crate::calendar::ImperialDate;
use crate::crew::{CrewMember, CrewRole, Skill};
use crate::errors::Errcode;
use crate::ship::model::ShipModel;
use crate::syslog::SYSLOG_DEFAULT_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub starting_balance: i64,
    pub starting_date: String,
    pub ship_model: String,
    pub ship_name: String,
    pub jump_range: Option<u32>,
    pub syslog_capacity: usize,
    pub home_name: String,
    pub home_uwp: Option<String>,
    pub crew: Vec<CrewMember>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: 0,
            starting_balance: 1_000_000,
            starting_date: "001-1105".to_string(),
            ship_model: "free_trader".to_string(),
            ship_name: "Weasel".to_string(),
            jump_range: None,
            syslog_capacity: SYSLOG_DEFAULT_CAPACITY,
            home_name: "Regina".to_string(),
            home_uwp: Some("A788899-C".to_string()),
            crew: vec![
                CrewMember::new("Jamison", CrewRole::Pilot).with_skill(Skill::Broker, 1),
                CrewMember::new("Kinsky", CrewRole::Engineer),
                CrewMember::new("Aleph", CrewRole::Steward),
                CrewMember::new("Marrow", CrewRole::Medic),
            ],
        }
    }
}

impl GameConfig {
    /// Parses a JSON configuration, every missing field keeps its default value
    pub fn from_json(s: &str) -> Result<GameConfig, Errcode> {
        let config: GameConfig =
            serde_json::from_str(s).map_err(|e| Errcode::InvalidConfig(e.to_string()))?;
        config.start_date()?;
        config.model()?;
        Ok(config)
    }

    pub fn start_date(&self) -> Result<ImperialDate, Errcode> {
        self.starting_date.parse()
    }

    pub fn model(&self) -> Result<ShipModel, Errcode> {
        ShipModel::from_name(&self.ship_model)
    }

    /// How many parsecs a single jump reaches
    pub fn jump_range(&self) -> Result<u32, Errcode> {
        Ok(self.jump_range.unwrap_or(self.model()?.jump_rating()))
    }
}

#[test]
fn test_config_defaults() {
    let config = GameConfig::from_json("{}").unwrap();
    assert_eq!(config.starting_balance, 1_000_000);
    assert_eq!(config.model().unwrap(), ShipModel::FreeTrader);
    assert_eq!(config.jump_range().unwrap(), 1);
    assert_eq!(config.crew.len(), 4);

    let config = GameConfig::from_json(
        r#"{"seed": 42, "ship_model": "far_trader", "starting_date": "100-1106", "crew": []}"#,
    )
    .unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.jump_range().unwrap(), 2);
    assert_eq!(config.start_date().unwrap(), ImperialDate::new(100, 1106).unwrap());
    assert!(config.crew.is_empty());
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        GameConfig::from_json("{\"seed\": \"abc\"}"),
        Err(Errcode::InvalidConfig(_))
    ));
    assert_eq!(
        GameConfig::from_json("{\"ship_model\": \"scout\"}").unwrap_err(),
        Errcode::UnknownShipModel("scout".to_string())
    );
    assert_eq!(
        GameConfig::from_json("{\"starting_date\": \"366-1105\"}").unwrap_err(),
        Errcode::DayOutOfRange("366-1105".to_string())
    );
}
