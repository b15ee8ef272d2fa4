use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::command::CommandState;
use crate::model::{IrrigationSchedule, IrrigationZone, TriggerMetric, UpdateScheduleRequest};
use crate::req;
use crate::validate;

#[derive(Properties, PartialEq)]
pub struct ScheduleEditorProps {
    pub zone: IrrigationZone,
    pub on_update: Callback<()>,
}

fn initial_metric(schedule: Option<&IrrigationSchedule>) -> TriggerMetric {
    schedule
        .map(|s| s.trigger_metric)
        .unwrap_or(TriggerMetric::SwtWm1)
}

fn initial_threshold(schedule: Option<&IrrigationSchedule>) -> String {
    schedule
        .map(|s| s.threshold_kpa.to_string())
        .unwrap_or_else(|| "30".to_owned())
}

fn initial_duration(schedule: Option<&IrrigationSchedule>) -> String {
    schedule
        .and_then(|s| s.duration_minutes)
        .unwrap_or(validate::DEFAULT_DURATION_MINUTES)
        .to_string()
}

/// Per-zone trigger rule form. The schedule itself is evaluated by the
/// backend; this only edits the stored rule.
#[function_component(ScheduleEditor)]
pub fn schedule_editor(props: &ScheduleEditorProps) -> Html {
    let schedule = props.zone.schedule.as_ref();
    // seeded from the zone prop at mount; later polls must not clobber edits
    let metric = use_state(|| initial_metric(schedule));
    let threshold = use_state(|| initial_threshold(schedule));
    let enabled = use_state(|| schedule.map(|s| s.enabled).unwrap_or(true));
    let duration = use_state(|| initial_duration(schedule));
    let save = use_state(CommandState::<()>::default);

    let on_metric = {
        let metric = metric.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            if let Some(parsed) = TriggerMetric::from_value(&value) {
                metric.set(parsed);
            }
        })
    };
    let on_threshold = {
        let threshold = threshold.clone();
        Callback::from(move |e: InputEvent| {
            threshold.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_duration = {
        let duration = duration.clone();
        Callback::from(move |e: InputEvent| {
            duration.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let toggle_enabled = {
        let enabled = enabled.clone();
        Callback::from(move |_: MouseEvent| enabled.set(!*enabled))
    };

    let parsed_threshold = threshold.trim().parse::<f64>().unwrap_or(f64::NAN);
    let can_save = validate::threshold_kpa(parsed_threshold).is_ok();

    let on_save = {
        let metric = metric.clone();
        let enabled = enabled.clone();
        let duration = duration.clone();
        let save = save.clone();
        let on_update = props.on_update.clone();
        let zone_id = props.zone.id;
        Callback::from(move |_: MouseEvent| {
            if save.is_pending() {
                return;
            }
            let threshold_kpa = match validate::threshold_kpa(parsed_threshold) {
                Ok(v) => v,
                Err(err) => {
                    save.set(CommandState::Settled(Err(err.to_owned())));
                    return;
                }
            };
            let body = UpdateScheduleRequest {
                trigger_metric: *metric,
                threshold_kpa,
                enabled: *enabled,
                duration_minutes: validate::duration_minutes(&duration),
            };
            save.set(CommandState::Pending);
            let save = save.clone();
            let on_update = on_update.clone();
            spawn_local(async move {
                match req::update_schedule(zone_id, &body).await {
                    Ok(_) => {
                        save.set(CommandState::Settled(Ok(())));
                        on_update.emit(());
                    }
                    Err(err) => save.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    let reload = {
        let metric = metric.clone();
        let threshold = threshold.clone();
        let enabled = enabled.clone();
        let duration = duration.clone();
        let save = save.clone();
        let on_update = props.on_update.clone();
        let schedule = props.zone.schedule.clone();
        Callback::from(move |_: MouseEvent| {
            let schedule = schedule.as_ref();
            metric.set(initial_metric(schedule));
            threshold.set(initial_threshold(schedule));
            enabled.set(schedule.map(|s| s.enabled).unwrap_or(true));
            duration.set(initial_duration(schedule));
            save.set(CommandState::Idle);
            on_update.emit(());
        })
    };

    html! {
        <div class="schedule">
            <div class="schedule-header">
                <h4>{"Irrigation Schedule"}</h4>
                <div class="row">
                    <span class="muted">{"Enabled"}</span>
                    <button type="button"
                        class={classes!("btn", "btn-toggle", (*enabled).then_some("on"))}
                        onclick={toggle_enabled}>
                        { if *enabled { "On" } else { "Off" } }
                    </button>
                </div>
            </div>

            if let Some(error) = save.error() {
                <div class="banner banner-error">{error}</div>
            }
            if save.succeeded() {
                <div class="banner banner-success">{"Saved."}</div>
            }

            <div class="schedule-grid">
                <div>
                    <label>{"Trigger Metric"}</label>
                    <select onchange={on_metric}>
                        { for TriggerMetric::ALL.iter().map(|m| html! {
                            <option value={m.as_str()} selected={*metric == *m}>{m.label()}</option>
                        }) }
                    </select>
                </div>
                <div>
                    <label>{"Threshold (kPa)"}</label>
                    <input type="number" min="1" max="300" step="1"
                        value={(*threshold).clone()} oninput={on_threshold} />
                    <p class="hint">
                        {format!("Trigger if {} ≥ {} kPa (once/day, 06:00).",
                            metric.label(),
                            if parsed_threshold.is_finite() { parsed_threshold.to_string() } else { "…".to_owned() })}
                    </p>
                </div>
                <div>
                    <label>{"Irrigation duration (min)"}</label>
                    <input type="number" min="1" max="240" step="1"
                        value={(*duration).clone()} oninput={on_duration} />
                </div>
            </div>

            <div class="row">
                <button type="button" class="btn btn-primary"
                    onclick={on_save} disabled={!can_save || save.is_pending()}>
                    { if save.is_pending() { "Saving..." } else { "Save schedule" } }
                </button>
                <button type="button" class="btn btn-secondary"
                    onclick={reload} disabled={save.is_pending()}>
                    {"Reload"}
                </button>
            </div>
        </div>
    }
}
