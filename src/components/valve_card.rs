use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::command::CommandState;
use crate::model::{Device, ValveAction, ValveState};
use crate::req;
use crate::utils;

#[derive(Properties, PartialEq)]
pub struct ValveCardProps {
    pub device: Device,
    pub on_update: Callback<()>,
}

#[function_component(ValveCard)]
pub fn valve_card(props: &ValveCardProps) -> Html {
    // which of the two actions is on the wire, so the buttons stay
    // independently labeled
    let pending = use_state(|| Option::<ValveAction>::None);
    let error = use_state(|| Option::<String>::None);
    let remove = use_state(CommandState::<()>::default);
    let show_confirm = use_state(|| false);

    let device = &props.device;
    let is_open = device.current_state == Some(ValveState::Open);

    let control = {
        let pending = pending.clone();
        let error = error.clone();
        let on_update = props.on_update.clone();
        let deveui = device.deveui.clone();
        Callback::from(move |action: ValveAction| {
            if pending.is_some() {
                return;
            }
            pending.set(Some(action));
            error.set(None);
            let pending = pending.clone();
            let error = error.clone();
            let on_update = on_update.clone();
            let deveui = deveui.clone();
            spawn_local(async move {
                match req::control_valve(&deveui, action).await {
                    Ok(()) => on_update.emit(()),
                    Err(err) => error.set(Some(err.to_string())),
                }
                pending.set(None);
            });
        })
    };
    let on_open = {
        let control = control.clone();
        Callback::from(move |_: MouseEvent| control.emit(ValveAction::Open))
    };
    let on_close = {
        let control = control.clone();
        Callback::from(move |_: MouseEvent| control.emit(ValveAction::Close))
    };

    let confirm_remove = {
        let show_confirm = show_confirm.clone();
        Callback::from(move |_: MouseEvent| show_confirm.set(true))
    };
    let cancel_remove = {
        let show_confirm = show_confirm.clone();
        Callback::from(move |_: MouseEvent| show_confirm.set(false))
    };
    let do_remove = {
        let remove = remove.clone();
        let on_update = props.on_update.clone();
        let deveui = device.deveui.clone();
        Callback::from(move |_: MouseEvent| {
            if remove.is_pending() {
                return;
            }
            remove.set(CommandState::Pending);
            let remove = remove.clone();
            let on_update = on_update.clone();
            let deveui = deveui.clone();
            spawn_local(async move {
                match req::remove_device(&deveui).await {
                    Ok(()) => {
                        remove.set(CommandState::Settled(Ok(())));
                        on_update.emit(());
                    }
                    Err(err) => remove.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    let busy = pending.is_some() || remove.is_pending();

    // the valve is still moving when the backend's target disagrees with
    // the last reported state
    let divergent_target = match (device.target_state, device.current_state) {
        (Some(target), current) if current != Some(target) => Some(target),
        _ => None,
    };

    html! {
        <div class="card">
            <div class="card-header">
                <div>
                    <h3>{device.name.clone()}</h3>
                    <p class="deveui">{device.deveui.clone()}</p>
                </div>
                <div class="card-actions">
                    <span class="badge badge-valve">{"STREGA VALVE"}</span>
                    <button class="btn btn-danger btn-small" title="Remove device"
                        onclick={confirm_remove} disabled={busy}>{"✕"}</button>
                </div>
            </div>

            if let Some(error) = (*error).clone() {
                <div class="banner banner-error">{error}</div>
            }
            if let Some(error) = remove.error() {
                <div class="banner banner-error">{error}</div>
            }

            if *show_confirm {
                <div class="banner banner-warn">
                    <p class="bold">{"Remove this device?"}</p>
                    <p>{"This will unlink the device from your account."}</p>
                    <div class="row">
                        <button class="btn btn-danger" onclick={do_remove} disabled={remove.is_pending()}>
                            { if remove.is_pending() { "Removing..." } else { "Yes, Remove" } }
                        </button>
                        <button class="btn btn-secondary" onclick={cancel_remove} disabled={remove.is_pending()}>
                            {"Cancel"}
                        </button>
                    </div>
                </div>
            }

            <div class="valve-status">
                <p class="metric-label">{"STATUS"}</p>
                <div class="row">
                    <div class={classes!("lamp", is_open.then_some("lamp-on"))} />
                    <p class={classes!("valve-state", is_open.then_some("open"))}>
                        { if is_open { "OPEN" } else { "CLOSED" } }
                    </p>
                </div>
                if let Some(target) = divergent_target {
                    <p class="muted">{format!("Target: {}", target.as_str())}</p>
                }
            </div>

            <div class="valve-controls">
                <button class="btn btn-primary" onclick={on_open} disabled={busy}>
                    { if *pending == Some(ValveAction::Open) { "Opening..." } else { "OPEN" } }
                </button>
                <button class="btn btn-secondary" onclick={on_close} disabled={busy}>
                    { if *pending == Some(ValveAction::Close) { "Closing..." } else { "CLOSE" } }
                </button>
            </div>

            <div class="card-footer">
                <p class="muted">
                    {format!("Last seen: {}", utils::last_seen_label(device.last_seen, Utc::now()))}
                </p>
            </div>
        </div>
    }
}
