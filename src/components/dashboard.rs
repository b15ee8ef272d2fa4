use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::add_device::AddDeviceModal;
use crate::components::create_zone::CreateZoneModal;
use crate::components::sensor_card::SensorCard;
use crate::components::valve_card::ValveCard;
use crate::components::zone_card::ZoneCard;
use crate::model::{Device, DeviceType};
use crate::session::{SessionAction, SessionHandle};
use crate::sync::use_farm_sync;
use crate::Route;

/// Renders the card matching the device's hardware type.
pub fn device_card(device: &Device, on_update: &Callback<()>) -> Html {
    match device.type_id {
        DeviceType::KiwiSensor => html! {
            <SensorCard key={device.deveui.clone()} device={device.clone()}
                on_update={on_update.clone()} />
        },
        DeviceType::StregaValve => html! {
            <ValveCard key={device.deveui.clone()} device={device.clone()}
                on_update={on_update.clone()} />
        },
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let session = use_context::<SessionHandle>().expect("no session context");
    let navigator = use_navigator().unwrap();
    let sync = use_farm_sync();
    let show_add_device = use_state(|| false);
    let show_create_zone = use_state(|| false);

    let on_update = sync.refresh.clone();
    let snapshot = &sync.snapshot;

    let logout = {
        let session = session.clone();
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            session.dispatch(SessionAction::LoggedOut);
            navigator.push(&Route::Login);
        })
    };
    let retry = {
        let refresh = sync.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };
    let open_add = {
        let show_add_device = show_add_device.clone();
        Callback::from(move |_: MouseEvent| show_add_device.set(true))
    };
    let close_add = {
        let show_add_device = show_add_device.clone();
        Callback::from(move |_| show_add_device.set(false))
    };
    let open_create = {
        let show_create_zone = show_create_zone.clone();
        Callback::from(move |_: MouseEvent| show_create_zone.set(true))
    };
    let close_create = {
        let show_create_zone = show_create_zone.clone();
        Callback::from(move |_| show_create_zone.set(false))
    };

    let username = session.username.clone().unwrap_or_default();

    html! {
        <div class="dashboard">
            <header class="topbar">
                <div>
                    <h1>{"Open Smart Irrigation"}</h1>
                    <p class="welcome">{format!("Welcome, {username}")}</p>
                </div>
                <div class="card-actions">
                    <button class="btn btn-primary" onclick={open_add}>{"+ Add Device"}</button>
                    <button class="btn btn-primary" onclick={open_create}>{"+ New Zone"}</button>
                    <button class="btn btn-secondary" onclick={logout}>{"Logout"}</button>
                </div>
            </header>

            <main class="content">
                if snapshot.is_initial() {
                    <div class="notice">{"Loading devices..."}</div>
                }

                if let Some(error) = snapshot.error.clone() {
                    <div class="banner banner-error">
                        <p class="bold">{"Failed to refresh"}</p>
                        <p>{error}</p>
                        <button class="btn btn-danger" onclick={retry}>{"Retry"}</button>
                    </div>
                }

                if let Some(zones) = snapshot.zones.as_ref() {
                    <section>
                        <h2>{"Irrigation Zones"}</h2>
                        if zones.is_empty() {
                            <p class="muted">{"No zones yet. Create one to group your devices."}</p>
                        }
                        { for zones.iter().map(|zone| {
                            let members = snapshot.grouping.by_zone.get(&zone.id).cloned().unwrap_or_default();
                            html! {
                                <ZoneCard key={zone.id} zone={zone.clone()} {members}
                                    unassigned={snapshot.grouping.unassigned.clone()}
                                    on_update={on_update.clone()} />
                            }
                        }) }
                    </section>
                }

                if snapshot.devices.is_some() {
                    <section>
                        <h2>{"Unassigned Devices"}</h2>
                        if snapshot.grouping.unassigned.is_empty() {
                            <p class="muted">{"Every device is assigned to a zone."}</p>
                        } else {
                            <div class="card-grid">
                                { for snapshot.grouping.unassigned.iter().map(|d| device_card(d, &on_update)) }
                            </div>
                        }
                    </section>

                    <footer class="muted center">{"Auto-refreshing every 10 seconds"}</footer>
                }
            </main>

            if *show_add_device {
                <AddDeviceModal on_close={close_add} on_added={on_update.clone()} />
            }
            if *show_create_zone {
                <CreateZoneModal on_close={close_create} on_created={on_update.clone()} />
            }
        </div>
    }
}
