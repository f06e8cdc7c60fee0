//! Pure Yew view components for the float UI.
//!
//! Everything here renders from props; state lives in `main.rs`.

use blaseball_float::model::{Team, Teams};
use blaseball_float::status::StatusEntry;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TeamSelectorProps {
    pub teams: Option<Rc<Teams>>,
    pub selected: String,
    pub on_select: Callback<String>,
}

/// One button per active team, coloured with the team's main colour.
#[function_component(TeamSelector)]
pub fn team_selector(props: &TeamSelectorProps) -> Html {
    let Some(teams) = &props.teams else {
        return html! {
            <div class="team-selector loading">{ "Loading teams..." }</div>
        };
    };

    html! {
        <div class="team-selector">
            { teams.iter().map(|team| {
                let slug = team.url_slug.clone();
                let on_select = props.on_select.clone();
                let pressed = props.selected == team.url_slug;
                html! {
                    <button
                        key={team.url_slug.clone()}
                        id={team.url_slug.clone()}
                        class={classes!("team", pressed.then_some("selected"))}
                        style={format!("background-color: {}", team.team_main_color)}
                        title={team.full_name.clone()}
                        aria-label={team.full_name.clone()}
                        aria-pressed={pressed.to_string()}
                        onclick={Callback::from(move |_| on_select.emit(slug.clone()))}
                    >
                        { team.team_emoji.clone() }
                    </button>
                }
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TeamHeaderProps {
    pub team: Option<Rc<Team>>,
}

#[function_component(TeamHeader)]
pub fn team_header(props: &TeamHeaderProps) -> Html {
    match &props.team {
        Some(team) => html! {
            <h1 class="team-name" style={format!("color: {}", team.team_main_color)}>
                <span class="team-emoji">{ team.team_emoji.clone() }</span>
                { " " }
                { team.full_name.clone() }
            </h1>
        },
        None => html! { <h1 class="team-name">{ "Blaseball Float" }</h1> },
    }
}

#[derive(Properties, PartialEq)]
pub struct ControlBarProps {
    pub on_reload: Callback<()>,
    pub on_reset: Callback<()>,
}

/// Reload (bypassing every cache) and reset buttons.
#[function_component(ControlBar)]
pub fn control_bar(props: &ControlBarProps) -> Html {
    let on_reload = props.on_reload.reform(|_: MouseEvent| ());
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());
    html! {
        <div class="controls">
            <button class="reload" title="Fetch everything again" onclick={on_reload}>
                { "Reload" }
            </button>
            <button class="reset" title="Back to the default team" onclick={on_reset}>
                { "Reset" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusPanelProps {
    pub entries: Vec<StatusEntry>,
}

/// Progress and error messages, oldest first. Hidden entries stay in the
/// DOM until removed so they can fade out.
#[function_component(StatusPanel)]
pub fn status_panel(props: &StatusPanelProps) -> Html {
    html! {
        <div class="status" role="status" aria-live="polite">
            { props.entries.iter().map(|entry| html! {
                <div
                    key={entry.id.to_string()}
                    class={classes!(
                        "status-msg",
                        entry.state.class(),
                        entry.hidden.then_some("hidden"),
                    )}
                >
                    { entry.text.clone() }
                </div>
            }).collect::<Html>() }
        </div>
    }
}
