//! Application-level configuration constants.

// Remote endpoints
pub const TEAMS_URL: &str = "https://api.blaseball-reference.com/v2/teams";
pub const CONFIG_URL: &str = "https://api.blaseball-reference.com/v2/config";
pub const STADIUMS_URL: &str = "https://api.sibr.dev/chronicler/v1/stadiums";
pub const DATABASE_URL: &str = "https://cors-proxy.blaseball-reference.com/database";
pub const IDOLS_URL: &str = "https://cors-proxy.blaseball-reference.com/api/getIdols";

// Status log timings
pub const STATUS_SUCCESS_DELAY_MS: u32 = 1_000;
pub const STATUS_FAIL_DELAY_MS: u32 = 5_000;
pub const STATUS_REMOVE_DELAY_MS: u32 = 5_000;

// Selection
pub const DEFAULT_TEAM: &str = "flowers";

/// The set of URLs the data store fetches from.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub teams: String,
    pub config: String,
    pub stadiums: String,
    pub database: String,
    pub idols: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            teams: TEAMS_URL.to_string(),
            config: CONFIG_URL.to_string(),
            stadiums: STADIUMS_URL.to_string(),
            database: DATABASE_URL.to_string(),
            idols: IDOLS_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn season(&self, number: u32) -> String {
        format!("{}/season?number={}", self.database, number)
    }

    pub fn standings(&self, id: &str) -> String {
        format!("{}/standings?id={}", self.database, id)
    }

    pub fn playoffs(&self, season: u32) -> String {
        format!("{}/playoffs?number={}", self.database, season)
    }

    pub fn team(&self, id: &str) -> String {
        format!("{}/team?id={}", self.database, id)
    }

    pub fn players(&self, ids: &[String]) -> String {
        format!("{}/players?ids={}", self.database, ids.join(","))
    }
}
