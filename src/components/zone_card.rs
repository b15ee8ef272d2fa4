use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::command::CommandState;
use crate::components::assign_device::AssignDeviceModal;
use crate::components::dashboard::device_card;
use crate::components::schedule::ScheduleEditor;
use crate::model::{Device, DeviceType, IrrigationZone};
use crate::req;

#[derive(Properties, PartialEq)]
pub struct ZoneCardProps {
    pub zone: IrrigationZone,
    /// Members of this zone, in device-list order.
    pub members: Vec<Device>,
    /// Devices without a zone, offered by the assign modal.
    pub unassigned: Vec<Device>,
    pub on_update: Callback<()>,
}

#[function_component(ZoneCard)]
pub fn zone_card(props: &ZoneCardProps) -> Html {
    let delete = use_state(CommandState::<()>::default);
    let unassign = use_state(CommandState::<()>::default);
    // deveui currently being unassigned, so only that button shows progress
    let unassigning = use_state(|| Option::<String>::None);
    let show_delete_confirm = use_state(|| false);
    let show_assign = use_state(|| false);

    let zone = &props.zone;

    let open_delete_confirm = {
        let show_delete_confirm = show_delete_confirm.clone();
        Callback::from(move |_: MouseEvent| show_delete_confirm.set(true))
    };
    let cancel_delete = {
        let show_delete_confirm = show_delete_confirm.clone();
        Callback::from(move |_: MouseEvent| show_delete_confirm.set(false))
    };
    let do_delete = {
        let delete = delete.clone();
        let on_update = props.on_update.clone();
        let zone_id = zone.id;
        Callback::from(move |_: MouseEvent| {
            if delete.is_pending() {
                return;
            }
            delete.set(CommandState::Pending);
            let delete = delete.clone();
            let on_update = on_update.clone();
            spawn_local(async move {
                match req::delete_zone(zone_id).await {
                    Ok(()) => {
                        delete.set(CommandState::Settled(Ok(())));
                        on_update.emit(());
                    }
                    Err(err) => delete.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    let do_unassign = {
        let unassign = unassign.clone();
        let unassigning = unassigning.clone();
        let on_update = props.on_update.clone();
        let zone_id = zone.id;
        Callback::from(move |deveui: String| {
            if unassigning.is_some() {
                return;
            }
            unassigning.set(Some(deveui.clone()));
            unassign.set(CommandState::Pending);
            let unassign = unassign.clone();
            let unassigning = unassigning.clone();
            let on_update = on_update.clone();
            spawn_local(async move {
                match req::unassign_device(zone_id, &deveui).await {
                    Ok(()) => {
                        unassign.set(CommandState::Settled(Ok(())));
                        on_update.emit(());
                    }
                    Err(err) => unassign.set(CommandState::Settled(Err(err.to_string()))),
                }
                unassigning.set(None);
            });
        })
    };

    let open_assign = {
        let show_assign = show_assign.clone();
        Callback::from(move |_: MouseEvent| show_assign.set(true))
    };
    let close_assign = {
        let show_assign = show_assign.clone();
        Callback::from(move |_| show_assign.set(false))
    };

    let member = |device: &Device| -> Html {
        let deveui = device.deveui.clone();
        let onclick = {
            let do_unassign = do_unassign.clone();
            let deveui = deveui.clone();
            Callback::from(move |_: MouseEvent| do_unassign.emit(deveui.clone()))
        };
        let busy = unassigning.as_deref() == Some(deveui.as_str());
        html! {
            <div class="zone-member" key={deveui.clone()}>
                { device_card(device, &props.on_update) }
                <button class="btn btn-secondary btn-small" {onclick}
                    disabled={unassigning.is_some()}>
                    { if busy { "Unassigning..." } else { "Unassign from zone" } }
                </button>
            </div>
        }
    };

    let sensors: Vec<&Device> = props
        .members
        .iter()
        .filter(|d| d.type_id == DeviceType::KiwiSensor)
        .collect();
    let valves: Vec<&Device> = props
        .members
        .iter()
        .filter(|d| d.type_id == DeviceType::StregaValve)
        .collect();

    let error = delete.error().or(unassign.error());

    html! {
        <div class="zone-card">
            <div class="card-header">
                <div>
                    <h3>{zone.name.clone()}</h3>
                    <p class="muted">
                        {format!("{} device{}", zone.device_count, if zone.device_count == 1 { "" } else { "s" })}
                    </p>
                </div>
                <div class="card-actions">
                    <button class="btn btn-primary" title="Assign device to zone" onclick={open_assign.clone()}>
                        {"+ Device"}
                    </button>
                    <button class="btn btn-danger" title="Delete zone"
                        onclick={open_delete_confirm} disabled={delete.is_pending()}>
                        {"Delete"}
                    </button>
                </div>
            </div>

            if let Some(error) = error {
                <div class="banner banner-error">{error}</div>
            }

            if *show_delete_confirm {
                <div class="banner banner-warn">
                    <p class="bold">{"Delete this zone?"}</p>
                    <p>{"All devices will be unassigned from this zone. This action cannot be undone."}</p>
                    <div class="row">
                        <button class="btn btn-danger" onclick={do_delete} disabled={delete.is_pending()}>
                            { if delete.is_pending() { "Deleting..." } else { "Yes, Delete" } }
                        </button>
                        <button class="btn btn-secondary" onclick={cancel_delete} disabled={delete.is_pending()}>
                            {"Cancel"}
                        </button>
                    </div>
                </div>
            }

            <ScheduleEditor zone={zone.clone()} on_update={props.on_update.clone()} />

            if props.members.is_empty() {
                <div class="notice">
                    <p class="muted">{"No devices in this zone yet"}</p>
                    <button class="btn btn-primary" onclick={open_assign}>
                        {"Assign First Device"}
                    </button>
                </div>
            } else {
                <h4>{"Devices in this zone:"}</h4>
                if !sensors.is_empty() {
                    <div class="card-grid">
                        { for sensors.iter().map(|d| member(*d)) }
                    </div>
                }
                if !valves.is_empty() {
                    <div class="card-grid">
                        { for valves.iter().map(|d| member(*d)) }
                    </div>
                }
            }

            if *show_assign {
                <AssignDeviceModal
                    zone_id={zone.id}
                    zone_name={zone.name.clone()}
                    available={props.unassigned.clone()}
                    on_close={close_assign}
                    on_assigned={props.on_update.clone()} />
            }
        </div>
    }
}
