//! Test doubles: a scripted transport and a manually driven scheduler.

use crate::config::Endpoints;
use crate::error::LoadError;
use crate::fetch::{HttpResponse, JsonClient, Transport};
use crate::status::{Scheduler, StatusLog};
use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    tasks: RefCell<Vec<(f64, u64, Box<dyn FnOnce()>)>>,
    seq: Cell<u64>,
}

impl ManualScheduler {
    /// Move the clock forward, running due tasks in order.
    pub fn advance(&self, ms: u32) {
        let target = self.now.get() + ms as f64;
        loop {
            let next = self
                .tasks
                .borrow()
                .iter()
                .enumerate()
                .filter(|(_, (due, _, _))| *due <= target)
                .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(index, _)| index);
            let Some(index) = next else {
                break;
            };
            let (due, _, task) = self.tasks.borrow_mut().remove(index);
            self.now.set(due);
            task();
        }
        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.tasks
            .borrow_mut()
            .push((self.now.get() + delay_ms as f64, seq, task));
    }
}

enum Route {
    Respond(HttpResponse),
    Fail(String),
}

/// Answers requests from a fixed table; unknown URLs get a 404.
#[derive(Default)]
pub struct StubTransport {
    routes: RefCell<HashMap<String, Route>>,
    hooks: RefCell<HashMap<String, Rc<dyn Fn()>>>,
    held: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        let status_text = match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Error",
        };
        self.routes.borrow_mut().insert(
            url.to_string(),
            Route::Respond(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }),
        );
    }

    pub fn json(&self, url: &str, value: serde_json::Value) {
        self.respond(url, 200, &value.to_string());
    }

    pub fn fail_with(&self, url: &str, message: &str) {
        self.routes
            .borrow_mut()
            .insert(url.to_string(), Route::Fail(message.to_string()));
    }

    /// Run `hook` whenever `url` is requested.
    pub fn on_request(&self, url: &str, hook: impl Fn() + 'static) {
        self.hooks
            .borrow_mut()
            .insert(url.to_string(), Rc::new(hook));
    }

    /// Hold back the next response for `url` until the returned sender fires.
    pub fn hold(&self, url: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.held.borrow_mut().insert(url.to_string(), held);
        release
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str) -> LocalBoxFuture<'static, Result<HttpResponse, LoadError>> {
        self.requests.borrow_mut().push(url.to_string());
        let hook = self.hooks.borrow().get(url).cloned();
        if let Some(hook) = hook {
            hook();
        }
        let result = match self.routes.borrow().get(url) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail(message)) => Err(LoadError::Network(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }),
        };
        match self.held.borrow_mut().remove(url) {
            Some(held) => async move {
                let _ = held.await;
                result
            }
            .boxed_local(),
            None => future::ready(result).boxed_local(),
        }
    }
}

pub fn client() -> (Rc<StubTransport>, Rc<ManualScheduler>, JsonClient) {
    let transport = Rc::new(StubTransport::default());
    let scheduler = Rc::new(ManualScheduler::default());
    let status = StatusLog::new(scheduler.clone());
    let client = JsonClient::new(transport.clone(), status);
    (transport, scheduler, client)
}

pub fn endpoints() -> Endpoints {
    Endpoints {
        teams: "https://test/teams".into(),
        config: "https://test/config".into(),
        stadiums: "https://test/stadiums".into(),
        database: "https://test/db".into(),
        idols: "https://test/idols".into(),
    }
}

/// A small league: two active teams (flowers, tacos), one retired (mints),
/// season 2 with standings, and a flowers roster of three players.
pub fn seed_league(transport: &StubTransport) {
    transport.json(
        "https://test/teams",
        json!([
            {
                "team_id": "id-flowers",
                "url_slug": "flowers",
                "nickname": "Flowers",
                "full_name": "Boston Flowers",
                "team_emoji": "0x1F339",
                "team_main_color": "#f7d1ff",
                "current_team_status": "active",
            },
            {
                "team_id": "id-tacos",
                "url_slug": "tacos",
                "nickname": "Tacos",
                "full_name": "Unlimited Tacos",
                "team_emoji": "🌮",
                "team_main_color": "#64376e",
                "current_team_status": "active",
            },
            {
                "team_id": "id-mints",
                "url_slug": "mints",
                "nickname": "Mints",
                "full_name": "Breath Mints",
                "team_emoji": "0x1F36C",
                "team_main_color": "#178f55",
                "current_team_status": "former",
            },
        ]),
    );
    transport.json("https://test/config", json!({ "defaults": { "season": 2 } }));
    transport.json(
        "https://test/db/season?number=2",
        json!({ "id": "season-2", "seasonNumber": 2, "standings": "st-2" }),
    );
    transport.json(
        "https://test/db/standings?id=st-2",
        json!({
            "id": "st-2",
            "wins": { "id-flowers": 10.0, "id-tacos": 4.0 },
            "losses": { "id-flowers": 2.0, "id-tacos": 8.0 },
            "runs": { "id-flowers": 500.5, "id-tacos": 220.0 },
        }),
    );
    transport.json(
        "https://test/stadiums",
        json!({ "data": [
            { "id": "s-1", "data": {
                "id": "s-1", "name": "Fenway Garden", "teamId": "id-flowers", "mysticism": 0.7,
            }},
            { "id": "s-2", "data": {
                "id": "s-2", "name": "Taco Stand", "teamId": "id-tacos", "mysticism": 0.2,
            }},
            { "id": "s-3", "data": {
                "id": "s-3", "name": "Abandoned Lot", "teamId": "id-nobody",
            }},
        ]}),
    );
    transport.json("https://test/db/playoffs?number=0", json!({ "winner": "id-flowers" }));
    transport.json("https://test/db/playoffs?number=1", json!({ "winner": "id-mints" }));
    transport.respond("https://test/db/playoffs?number=2", 200, "");
    transport.json(
        "https://test/db/team?id=id-flowers",
        json!({
            "id": "id-flowers",
            "fullName": "Boston Flowers",
            "lineup": ["p1", "p2"],
            "rotation": ["p3"],
            "shadows": [],
            "championships": 1,
            "totalShames": 3,
            "totalShamings": 9,
        }),
    );
    transport.json(
        "https://test/db/players?ids=p1,p2,p3",
        json!([
            { "id": "p1", "name": "Ortiz Lopez", "buoyancy": 0.8 },
            { "id": "p2", "name": "Nagomi Mcdaniel", "buoyancy": 0.3 },
            { "id": "p3", "name": "Jaylen Hotdogfingers", "buoyancy": 1.1 },
        ]),
    );
    transport.json(
        "https://test/idols",
        json!({ "data": { "strictlyConfidential": 0.25 } }),
    );
}
