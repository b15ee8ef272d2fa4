use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::command::CommandState;
use crate::model::Device;
use crate::req;
use crate::utils;

#[derive(Properties, PartialEq)]
pub struct SensorCardProps {
    pub device: Device,
    pub on_update: Callback<()>,
}

fn metric(label: &'static str, value: String) -> Html {
    html! {
        <div class="metric">
            <span class="metric-label">{label}</span>
            <span class="metric-value">{value}</span>
        </div>
    }
}

#[function_component(SensorCard)]
pub fn sensor_card(props: &SensorCardProps) -> Html {
    let remove = use_state(CommandState::<()>::default);
    let show_confirm = use_state(|| false);

    let device = &props.device;
    let readings = &device.latest_data;

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

    let mut metrics: Vec<Html> = Vec::new();
    let swt1 = match readings.swt_wm1 {
        Some(v) => format!("{v:.1} kPa"),
        None => "N/A".to_owned(),
    };
    metrics.push(metric("SOIL WATER TENSION 1", swt1));
    if let Some(v) = readings.swt_wm2 {
        metrics.push(metric("SOIL WATER TENSION 2", format!("{v:.1} kPa")));
    }
    if let Some(v) = readings.light_lux {
        metrics.push(metric("LIGHT INTENSITY", format!("{v:.0} lux")));
    }
    if let Some(v) = readings.ambient_temperature {
        metrics.push(metric("TEMPERATURE", format!("{v:.1} °C")));
    }
    if let Some(v) = readings.relative_humidity {
        metrics.push(metric("HUMIDITY", format!("{v:.0} %")));
    }

    html! {
        <div class={classes!("card", device.needs_water().then_some("card-alert"))}>
            <div class="card-header">
                <div>
                    <h3>{device.name.clone()}</h3>
                    <p class="deveui">{device.deveui.clone()}</p>
                </div>
                <div class="card-actions">
                    <span class="badge badge-sensor">{"KIWI SENSOR"}</span>
                    <button class="btn btn-danger btn-small" title="Remove device"
                        onclick={confirm_remove} disabled={remove.is_pending()}>{"✕"}</button>
                </div>
            </div>

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

            if device.needs_water() {
                <div class="banner banner-alert">
                    <p class="bold">{"TOO DRY!"}</p>
                    <p>{"Soil needs watering"}</p>
                </div>
            }

            <div class="metrics">
                { for metrics }
            </div>

            <div class="card-footer">
                <p class="muted">
                    {format!("Last seen: {}", utils::last_seen_label(device.last_seen, Utc::now()))}
                </p>
            </div>
        </div>
    }
}
