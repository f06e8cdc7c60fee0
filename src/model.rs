//! Records returned by the remote APIs, and the merged per-team record.

use crate::utils::decode_emoji;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub url_slug: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub team_abbreviation: String,
    #[serde(default)]
    pub team_emoji: String,
    #[serde(default)]
    pub team_main_color: String,
    #[serde(default)]
    pub team_secondary_color: String,
    #[serde(default)]
    pub current_team_status: String,
}

impl Team {
    pub fn is_active(&self) -> bool {
        self.current_team_status == "active"
    }
}

/// Active teams in API order, indexed by URL slug.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Teams {
    order: Vec<Rc<Team>>,
    by_slug: HashMap<String, Rc<Team>>,
}

impl Teams {
    /// Keep only active teams, with their emoji decoded.
    pub fn from_active(teams: Vec<Team>) -> Self {
        let mut out = Teams::default();
        for mut team in teams {
            if !team.is_active() {
                continue;
            }
            team.team_emoji = decode_emoji(&team.team_emoji);
            out.insert(Rc::new(team));
        }
        out
    }

    fn insert(&mut self, team: Rc<Team>) {
        // a repeated slug keeps its original position
        match self.order.iter().position(|t| t.url_slug == team.url_slug) {
            Some(index) => self.order[index] = Rc::clone(&team),
            None => self.order.push(Rc::clone(&team)),
        }
        self.by_slug.insert(team.url_slug.clone(), team);
    }

    pub fn get(&self, slug: &str) -> Option<&Rc<Team>> {
        self.by_slug.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Team>> {
        self.order.iter()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|team| team.url_slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Chronicler wraps every record in `{ "data": [{ "data": … }] }`.
#[derive(Debug, Deserialize)]
pub struct ChroniclerPage<T> {
    pub data: Vec<ChroniclerEntry<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ChroniclerEntry<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    pub team_id: String,
    /// Filled in from the team list once loaded.
    #[serde(default)]
    pub team_slug: String,
    /// Numeric stadium attributes (mysticism, viscosity, …).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Stadiums keyed by team slug.
pub type Stadiums = HashMap<String, Stadium>;

/// Championship counts keyed by team slug.
pub type ChampCounts = HashMap<String, u32>;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub defaults: SiteDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteDefaults {
    pub season: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default)]
    pub id: String,
    pub season_number: u32,
    #[serde(default)]
    pub standings: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub wins: HashMap<String, f64>,
    #[serde(default)]
    pub losses: HashMap<String, f64>,
    #[serde(default)]
    pub runs: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Playoffs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub lineup: Vec<String>,
    #[serde(default)]
    pub rotation: Vec<String>,
    #[serde(default)]
    pub shadows: Vec<String>,
    #[serde(default)]
    pub championships: u32,
    #[serde(default)]
    pub total_shames: i64,
    #[serde(default)]
    pub total_shamings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdolBoard {
    pub data: IdolData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdolData {
    pub strictly_confidential: f64,
}

/// Everything the simulation shows for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamData {
    pub name: String,
    pub team: TeamDetails,
    pub stadium: Option<Stadium>,
    pub champs: u32,
    pub runs: Option<f64>,
    pub wins: Option<f64>,
    pub net_shame: i64,
    pub roster: Vec<Player>,
}
