use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_hooks::use_mount;

use crate::command::CommandState;
use crate::model::{AddDeviceRequest, DeviceCatalogItem, DeviceType};
use crate::req;
use crate::validate;

#[derive(Properties, PartialEq)]
pub struct AddDeviceModalProps {
    pub on_close: Callback<()>,
    pub on_added: Callback<()>,
}

#[function_component(AddDeviceModal)]
pub fn add_device_modal(props: &AddDeviceModalProps) -> Html {
    let catalog = use_state(Vec::<DeviceCatalogItem>::new);
    let selected = use_state(|| DeviceType::KiwiSensor);
    let name = use_state(String::new);
    let deveui = use_state(String::new);
    let state = use_state(CommandState::<()>::default);

    {
        let catalog = catalog.clone();
        let selected = selected.clone();
        use_mount(move || {
            spawn_local(async move {
                match req::device_catalog().await {
                    Ok(items) => {
                        if let Some(first) = items.first() {
                            selected.set(first.id);
                        }
                        catalog.set(items);
                    }
                    Err(err) => log::error!("failed to load device catalog: {err}"),
                }
            });
        });
    }

    let on_type = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            if let Some(parsed) = DeviceType::from_value(&value) {
                selected.set(parsed);
            }
        })
    };
    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            name.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_deveui = {
        let deveui = deveui.clone();
        Callback::from(move |e: InputEvent| {
            // uppercased as you type, like the printed device labels
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            deveui.set(value.to_ascii_uppercase());
        })
    };

    let onsubmit = {
        let selected = selected.clone();
        let name = name.clone();
        let deveui = deveui.clone();
        let state = state.clone();
        let on_added = props.on_added.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.is_pending() {
                return;
            }
            let deveui = match validate::normalize_deveui(&deveui) {
                Ok(v) => v,
                Err(err) => {
                    state.set(CommandState::Settled(Err(err.to_owned())));
                    return;
                }
            };
            let name = match validate::trimmed_name(&name) {
                Ok(v) => v,
                Err(_) => {
                    state.set(CommandState::Settled(Err("a device name is required".to_owned())));
                    return;
                }
            };
            let request = AddDeviceRequest {
                deveui,
                name,
                type_id: *selected,
            };
            state.set(CommandState::Pending);
            let state = state.clone();
            let on_added = on_added.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match req::add_device(&request).await {
                    Ok(_) => {
                        state.set(CommandState::Settled(Ok(())));
                        on_added.emit(());
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
                    <h2>{"Add Device"}</h2>
                    <button class="modal-close" onclick={close.clone()}>{"×"}</button>
                </div>

                if let Some(error) = state.error() {
                    <div class="banner banner-error">{error}</div>
                }

                <form {onsubmit}>
                    <label for="type">{"Device Type"}</label>
                    <select id="type" onchange={on_type}>
                        { for catalog.iter().map(|item| html! {
                            <option value={item.id.as_str()} selected={*selected == item.id}>
                                {item.name.clone()}
                            </option>
                        }) }
                    </select>

                    <label for="name">{"Device Name"}</label>
                    <input id="name" type="text" value={(*name).clone()} oninput={on_name}
                        required={true} placeholder="e.g., North Field, Main Valve" />

                    <label for="deveui">{"DevEUI"}</label>
                    <input id="deveui" type="text" value={(*deveui).clone()} oninput={on_deveui}
                        required={true} maxlength="16" placeholder="16 hex characters" class="mono" />
                    <p class="hint">{"Enter exactly 16 hexadecimal characters (0-9, A-F)"}</p>

                    <div class="row">
                        <button type="button" class="btn btn-secondary" onclick={close}>{"Cancel"}</button>
                        <button type="submit" class="btn btn-primary" disabled={state.is_pending()}>
                            { if state.is_pending() { "Adding..." } else { "Add Device" } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
