//! The cache graph behind the simulation.
//!
//! ```text
//! teams ──┬──────────────► stadiums ─┐
//!         │                          │
//! season ─┼─► standings ─────────────┼─► team_data (per slug)
//!         └─► champs ◄── teams       │
//!                 └──────────────────┘
//! noodle (independent)
//! ```
//!
//! Each loader awaits the caches it depends on itself, so any cache can be
//! loaded first. A forced load forces its dependencies too.
//!
//! Concurrent dependencies are joined with `join!` and checked afterwards.
//! A failure still fails the load, but the requests beside it run to the
//! end so their status entries settle and their caches get filled.

use crate::cache::{LazyData, LoadResult, MemoizedData};
use crate::config::Endpoints;
use crate::error::LoadError;
use crate::fetch::JsonClient;
use crate::model::{
    ChampCounts, ChroniclerPage, IdolBoard, Player, Playoffs, Season, SiteConfig, Stadium,
    Stadiums, Standings, Team, TeamData, TeamDetails, Teams,
};
use crate::utils::{net_shame, roster_ids};
use futures::future::{join_all, LocalBoxFuture};
use log::{debug, info};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The team list plus a reverse index by team id.
///
/// The index is rebuilt from scratch after every load and can only be read
/// once the team list itself has loaded.
#[derive(Clone)]
pub struct TeamStore {
    data: LazyData<Teams>,
    by_id: Rc<RefCell<HashMap<String, Rc<Team>>>>,
}

impl TeamStore {
    pub fn new(client: JsonClient, endpoints: Rc<Endpoints>) -> Self {
        let data = LazyData::new("teams", move |_force| {
            let client = client.clone();
            let endpoints = Rc::clone(&endpoints);
            async move {
                let teams: Option<Vec<Team>> =
                    client.request(&endpoints.teams, "Fetching teams list").await?;
                Ok(teams.map(Teams::from_active))
            }
        });

        let by_id = Rc::new(RefCell::new(HashMap::new()));
        let index = Rc::clone(&by_id);
        data.on_loaded(move |teams: &Rc<Teams>| {
            let mut index = index.borrow_mut();
            index.clear();
            for team in teams.iter() {
                index.insert(team.team_id.clone(), Rc::clone(team));
            }
            info!("Loaded {} active teams", teams.len());
        });

        Self { data, by_id }
    }

    pub fn load(&self, force: bool) -> LocalBoxFuture<'static, LoadResult<Teams>> {
        self.data.load(force)
    }

    pub fn get(&self) -> Result<Rc<Teams>, LoadError> {
        self.data.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_loaded()
    }

    /// Look a team up by its id rather than its slug.
    pub fn by_id(&self, team_id: &str) -> Result<Option<Rc<Team>>, LoadError> {
        self.data.get()?;
        Ok(self.by_id.borrow().get(team_id).cloned())
    }

    /// Run `hook` after each load, once the id index is up to date.
    pub fn on_loaded(&self, hook: impl Fn(&Rc<Teams>) + 'static) {
        self.data.on_loaded(hook);
    }
}

/// Owns every cache. Cloning shares the same caches.
#[derive(Clone)]
pub struct DataStore {
    pub teams: TeamStore,
    pub season: LazyData<Season>,
    pub standings: LazyData<Standings>,
    pub stadiums: LazyData<Stadiums>,
    pub champs: LazyData<ChampCounts>,
    pub noodle: LazyData<f64>,
    pub team_data: MemoizedData<String, TeamData>,
}

impl DataStore {
    pub fn new(client: JsonClient, endpoints: Endpoints) -> Self {
        let endpoints = Rc::new(endpoints);
        let teams = TeamStore::new(client.clone(), Rc::clone(&endpoints));
        let season = season_cache(client.clone(), Rc::clone(&endpoints));
        let standings = standings_cache(client.clone(), Rc::clone(&endpoints), season.clone());
        let stadiums = stadiums_cache(client.clone(), Rc::clone(&endpoints), teams.clone());
        let champs = champs_cache(
            client.clone(),
            Rc::clone(&endpoints),
            season.clone(),
            teams.clone(),
        );
        let noodle = noodle_cache(client.clone(), Rc::clone(&endpoints));
        let team_data = team_data_cache(
            client,
            endpoints,
            TeamDataSources {
                teams: teams.clone(),
                stadiums: stadiums.clone(),
                standings: standings.clone(),
                champs: champs.clone(),
            },
        );

        Self {
            teams,
            season,
            standings,
            stadiums,
            champs,
            noodle,
            team_data,
        }
    }
}

fn season_cache(client: JsonClient, endpoints: Rc<Endpoints>) -> LazyData<Season> {
    LazyData::new("season", move |_force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        async move {
            let Some(config) = client
                .request::<SiteConfig>(&endpoints.config, "Fetching current season")
                .await?
            else {
                return Ok(None);
            };
            client
                .request(
                    &endpoints.season(config.defaults.season),
                    "Fetching season information",
                )
                .await
        }
    })
}

fn standings_cache(
    client: JsonClient,
    endpoints: Rc<Endpoints>,
    season: LazyData<Season>,
) -> LazyData<Standings> {
    LazyData::new("standings", move |force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        let season = season.load(force);
        async move {
            let Some(season) = season.await? else {
                return Ok(None);
            };
            let Some(id) = season.standings.as_deref() else {
                debug!("Season {} has no standings yet", season.season_number);
                return Ok(None);
            };
            client
                .request(&endpoints.standings(id), "Fetching standings")
                .await
        }
    })
}

fn stadiums_cache(
    client: JsonClient,
    endpoints: Rc<Endpoints>,
    teams: TeamStore,
) -> LazyData<Stadiums> {
    LazyData::new("stadiums", move |force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        let teams = teams.clone();
        async move {
            let (page, loaded) = futures::join!(
                client.request::<ChroniclerPage<Stadium>>(
                    &endpoints.stadiums,
                    "Fetching stadium information"
                ),
                teams.load(force),
            );
            let (page, _) = (page?, loaded?);
            let Some(page) = page else {
                return Ok(None);
            };

            let mut stadiums = Stadiums::new();
            for entry in page.data {
                let mut stadium = entry.data;
                let Some(team) = teams.by_id(&stadium.team_id)? else {
                    debug!("Skipping unused stadium {}", stadium.name);
                    continue;
                };
                stadium.team_slug = team.url_slug.clone();
                stadiums.insert(team.url_slug.clone(), stadium);
            }
            Ok(Some(stadiums))
        }
    })
}

fn champs_cache(
    client: JsonClient,
    endpoints: Rc<Endpoints>,
    season: LazyData<Season>,
    teams: TeamStore,
) -> LazyData<ChampCounts> {
    LazyData::new("championships", move |force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        let season = season.load(force);
        let teams = teams.clone();
        async move {
            let Some(season) = season.await? else {
                return Ok(None);
            };
            let playoffs = (0..=season.season_number).map(|number| {
                let client = client.clone();
                let url = endpoints.playoffs(number);
                async move {
                    client
                        .request::<Playoffs>(&url, &format!("Fetching season {} playoffs", number))
                        .await
                }
            });
            let (playoffs, loaded) = futures::join!(join_all(playoffs), teams.load(force));
            let playoffs = playoffs.into_iter().collect::<Result<Vec<_>, _>>()?;
            let Some(loaded) = loaded? else {
                return Ok(None);
            };

            let mut champs: ChampCounts = loaded.slugs().map(|slug| (slug.to_string(), 0)).collect();
            for playoff in playoffs.into_iter().flatten() {
                let Some(winner) = playoff.winner else {
                    continue;
                };
                match teams.by_id(&winner)? {
                    Some(team) => *champs.entry(team.url_slug.clone()).or_insert(0) += 1,
                    None => debug!("Skipping championship won by inactive team {}", winner),
                }
            }
            Ok(Some(champs))
        }
    })
}

fn noodle_cache(client: JsonClient, endpoints: Rc<Endpoints>) -> LazyData<f64> {
    LazyData::new("noodle", move |_force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        async move {
            let board: Option<IdolBoard> =
                client.request(&endpoints.idols, "Fetching idols board").await?;
            Ok(board.map(|board| board.data.strictly_confidential))
        }
    })
}

struct TeamDataSources {
    teams: TeamStore,
    stadiums: LazyData<Stadiums>,
    standings: LazyData<Standings>,
    champs: LazyData<ChampCounts>,
}

fn team_data_cache(
    client: JsonClient,
    endpoints: Rc<Endpoints>,
    sources: TeamDataSources,
) -> MemoizedData<String, TeamData> {
    let sources = Rc::new(sources);
    MemoizedData::new("team data", move |slug: String, force| {
        let client = client.clone();
        let endpoints = Rc::clone(&endpoints);
        let sources = Rc::clone(&sources);
        async move {
            let teams = sources.teams.load(force).await?;
            let team = teams
                .as_ref()
                .and_then(|teams| teams.get(&slug))
                .cloned()
                .ok_or_else(|| LoadError::Missing(format!("team \"{}\"", slug)))?;

            let details_and_roster = async {
                let details: TeamDetails = client
                    .request(
                        &endpoints.team(&team.team_id),
                        &format!("Fetching {} information", team.nickname),
                    )
                    .await?
                    .ok_or_else(|| LoadError::Missing(format!("{} information", team.nickname)))?;
                let roster = fetch_roster(&client, &endpoints, &details, &team.nickname).await?;
                Ok::<_, LoadError>((details, roster))
            };

            let (stadiums, standings, champs, details_and_roster) = futures::join!(
                sources.stadiums.load(force),
                sources.standings.load(force),
                sources.champs.load(force),
                details_and_roster,
            );
            let (stadiums, standings, champs, (details, roster)) =
                (stadiums?, standings?, champs?, details_and_roster?);

            let runs = standings
                .as_ref()
                .and_then(|standings| standings.runs.get(&team.team_id).copied());
            let wins = standings
                .as_ref()
                .and_then(|standings| standings.wins.get(&team.team_id).copied());

            Ok(Some(TeamData {
                stadium: stadiums.and_then(|stadiums| stadiums.get(&slug).cloned()),
                champs: champs
                    .and_then(|champs| champs.get(&slug).copied())
                    .unwrap_or(details.championships),
                runs,
                wins,
                net_shame: net_shame(&details),
                roster,
                team: details,
                name: slug,
            }))
        }
    })
}

async fn fetch_roster(
    client: &JsonClient,
    endpoints: &Endpoints,
    details: &TeamDetails,
    nickname: &str,
) -> Result<Vec<Player>, LoadError> {
    let ids = roster_ids(details);
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let roster: Option<Vec<Player>> = client
        .request(&endpoints.players(&ids), &format!("Fetching {} roster", nickname))
        .await?;
    Ok(roster.unwrap_or_default())
}
