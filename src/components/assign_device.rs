use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::command::CommandState;
use crate::model::Device;
use crate::req;

#[derive(Properties, PartialEq)]
pub struct AssignDeviceModalProps {
    pub zone_id: i64,
    pub zone_name: String,
    /// Unassigned devices only; assignment is exclusive.
    pub available: Vec<Device>,
    pub on_close: Callback<()>,
    pub on_assigned: Callback<()>,
}

#[function_component(AssignDeviceModal)]
pub fn assign_device_modal(props: &AssignDeviceModalProps) -> Html {
    let selected = use_state(String::new);
    let state = use_state(CommandState::<()>::default);

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            selected.set(e.target_unchecked_into::<HtmlSelectElement>().value());
        })
    };

    let onsubmit = {
        let selected = selected.clone();
        let state = state.clone();
        let zone_id = props.zone_id;
        let on_assigned = props.on_assigned.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.is_pending() {
                return;
            }
            if selected.is_empty() {
                state.set(CommandState::Settled(Err("Please select a device".to_owned())));
                return;
            }
            let deveui = (*selected).clone();
            state.set(CommandState::Pending);
            let state = state.clone();
            let on_assigned = on_assigned.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match req::assign_device(zone_id, &deveui).await {
                    Ok(()) => {
                        state.set(CommandState::Settled(Ok(())));
                        on_assigned.emit(());
                        on_close.emit(());
                    }
                    Err(err) => state.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-overlay">
            <div class="modal">
                <div class="modal-header">
                    <h2>{format!("Assign Device to {}", props.zone_name)}</h2>
                    <button class="modal-close" onclick={close.clone()}>{"×"}</button>
                </div>

                if let Some(error) = state.error() {
                    <div class="banner banner-error">{error}</div>
                }

                if props.available.is_empty() {
                    <div class="banner banner-warn">
                        <p class="bold">{"No unassigned devices"}</p>
                        <p>{"All your devices are already assigned to zones. Add more devices or remove them from other zones first."}</p>
                    </div>
                } else {
                    <form {onsubmit}>
                        <label for="device">{"Select Device"}</label>
                        <select id="device" onchange={on_select} required={true}>
                            <option value="" selected={selected.is_empty()}>{"-- Select a device --"}</option>
                            { for props.available.iter().map(|device| html! {
                                <option value={device.deveui.clone()}
                                    selected={*selected == device.deveui}>
                                    {format!("{} ({})", device.name, device.type_id.as_str())}
                                </option>
                            }) }
                        </select>

                        <div class="row">
                            <button type="button" class="btn btn-secondary" onclick={close}>{"Cancel"}</button>
                            <button type="submit" class="btn btn-primary" disabled={state.is_pending()}>
                                { if state.is_pending() { "Assigning..." } else { "Assign Device" } }
                            </button>
                        </div>
                    </form>
                }
            </div>
        </div>
    }
}
