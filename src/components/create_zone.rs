use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::command::CommandState;
use crate::req;
use crate::validate;

#[derive(Properties, PartialEq)]
pub struct CreateZoneModalProps {
    pub on_close: Callback<()>,
    pub on_created: Callback<()>,
}

#[function_component(CreateZoneModal)]
pub fn create_zone_modal(props: &CreateZoneModalProps) -> Html {
    let name = use_state(String::new);
    let state = use_state(CommandState::<()>::default);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            name.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let onsubmit = {
        let name = name.clone();
        let state = state.clone();
        let on_created = props.on_created.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.is_pending() {
                return;
            }
            let zone_name = match validate::trimmed_name(&name) {
                Ok(v) => v,
                Err(_) => {
                    state.set(CommandState::Settled(Err("Zone name is required".to_owned())));
                    return;
                }
            };
            state.set(CommandState::Pending);
            let state = state.clone();
            let on_created = on_created.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match req::create_zone(&zone_name).await {
                    Ok(_) => {
                        state.set(CommandState::Settled(Ok(())));
                        on_created.emit(());
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
                    <h2>{"Create Irrigation Zone"}</h2>
                    <button class="modal-close" onclick={close.clone()}>{"×"}</button>
                </div>

                if let Some(error) = state.error() {
                    <div class="banner banner-error">{error}</div>
                }

                <form {onsubmit}>
                    <label for="zone-name">{"Zone Name"}</label>
                    <input id="zone-name" type="text" value={(*name).clone()} oninput={on_name}
                        required={true} placeholder="e.g., Garden A, North Orchard" />

                    <div class="row">
                        <button type="button" class="btn btn-secondary" onclick={close}>{"Cancel"}</button>
                        <button type="submit" class="btn btn-primary" disabled={state.is_pending()}>
                            { if state.is_pending() { "Creating..." } else { "Create Zone" } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
