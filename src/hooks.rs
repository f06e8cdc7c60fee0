use blaseball_float::status::{StatusEntry, StatusLog};
use yew::prelude::*;

/// Current status entries, re-rendering whenever the log changes.
#[hook]
pub fn use_status_log(log: &StatusLog) -> Vec<StatusEntry> {
    let entries = use_state(|| log.entries());

    {
        let entries = entries.clone();
        use_effect_with(log.clone(), move |log| {
            // pick up anything logged between first render and subscribing
            entries.set(log.entries());
            let source = log.clone();
            let subscription = log.subscribe(move || entries.set(source.entries()));
            let log = log.clone();
            move || log.unsubscribe(subscription)
        });
    }

    (*entries).clone()
}
