//! Polling synchronizer for the device and zone collections. There is no
//! push channel; the dashboard refetches both lists on a fixed interval, on
//! window focus and after every mutation, and the state machine here keeps
//! the view consistent while responses overlap or fail.

use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::{use_event_with_window, use_interval, use_is_mounted, use_mount};

use crate::model::{Device, IrrigationZone};
use crate::req;
use crate::session::{self, SessionAction, SessionHandle};

pub const POLL_INTERVAL_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Devices,
    Zones,
}

/// Proof that a fetch was issued. A completion is only applied while no
/// newer fetch for the same resource has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

#[derive(Debug, Default)]
struct Channel {
    issued: u64,
    applied: u64,
    in_flight: bool,
}

/// Derived grouping, recomputed in one pass whenever either list changes.
/// Device-list order is preserved within each bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneView {
    pub by_zone: HashMap<i64, Vec<Device>>,
    pub unassigned: Vec<Device>,
}

pub fn group_by_zone(devices: &[Device], zones: &[IrrigationZone]) -> ZoneView {
    let mut view = ZoneView {
        by_zone: zones.iter().map(|z| (z.id, Vec::new())).collect(),
        unassigned: Vec::new(),
    };
    for device in devices {
        // a dangling zone id (zone deleted, device list not yet caught up)
        // counts as unassigned
        let bucket = device
            .irrigation_zone_id
            .and_then(|id| view.by_zone.get_mut(&id));
        match bucket {
            Some(members) => members.push(device.clone()),
            None => view.unassigned.push(device.clone()),
        }
    }
    view
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncSnapshot {
    pub devices: Option<Vec<Device>>,
    pub zones: Option<Vec<IrrigationZone>>,
    pub error: Option<String>,
    pub grouping: ZoneView,
}

impl SyncSnapshot {
    /// Nothing fetched yet and nothing failed: the very first load.
    pub fn is_initial(&self) -> bool {
        self.devices.is_none() && self.zones.is_none() && self.error.is_none()
    }
}

#[derive(Debug)]
pub enum Fetched {
    Devices(Vec<Device>),
    Zones(Vec<IrrigationZone>),
}

#[derive(Debug, Default)]
pub struct SyncState {
    snapshot: SyncSnapshot,
    devices: Channel,
    zones: Channel,
}

impl SyncState {
    fn channel_mut(&mut self, resource: Resource) -> &mut Channel {
        match resource {
            Resource::Devices => &mut self.devices,
            Resource::Zones => &mut self.zones,
        }
    }

    /// Interval/focus/mount entry point. Skipped while a fetch for the
    /// resource is still outstanding, so overlapping polls are never issued.
    pub fn poll(&mut self, resource: Resource) -> Option<Ticket> {
        if self.channel_mut(resource).in_flight {
            return None;
        }
        Some(self.issue(resource))
    }

    /// Mutation entry point. Always fetches; an in-flight request keeps
    /// running but its response loses to this one.
    pub fn refresh(&mut self, resource: Resource) -> Ticket {
        self.issue(resource)
    }

    fn issue(&mut self, resource: Resource) -> Ticket {
        let ch = self.channel_mut(resource);
        ch.issued += 1;
        ch.in_flight = true;
        Ticket {
            resource,
            seq: ch.issued,
        }
    }

    /// Returns whether the result was applied. The most recently issued
    /// fetch wins: completions superseded by an already-applied newer one
    /// are discarded outright.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Fetched, String>) -> bool {
        let ch = self.channel_mut(ticket.resource);
        if ticket.seq == ch.issued {
            ch.in_flight = false;
        }
        if ticket.seq <= ch.applied {
            return false;
        }
        ch.applied = ticket.seq;

        match result {
            Ok(Fetched::Devices(devices)) => {
                debug_assert_eq!(ticket.resource, Resource::Devices);
                self.snapshot.devices = Some(devices);
                self.snapshot.error = None;
                self.regroup();
            }
            Ok(Fetched::Zones(zones)) => {
                debug_assert_eq!(ticket.resource, Resource::Zones);
                self.snapshot.zones = Some(zones);
                self.snapshot.error = None;
                self.regroup();
            }
            Err(message) => {
                // stale-but-available: the last good lists stay readable
                self.snapshot.error = Some(message);
            }
        }
        true
    }

    fn regroup(&mut self) {
        let devices = self.snapshot.devices.as_deref().unwrap_or(&[]);
        let zones = self.snapshot.zones.as_deref().unwrap_or(&[]);
        self.snapshot.grouping = group_by_zone(devices, zones);
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.snapshot.clone()
    }
}

#[derive(Clone)]
pub struct FarmSync {
    pub snapshot: SyncSnapshot,
    /// Forced revalidation of both collections, for use after mutations.
    pub refresh: Callback<()>,
}

#[hook]
pub fn use_farm_sync() -> FarmSync {
    let session = use_context::<SessionHandle>().expect("no session context");
    let machine = use_mut_ref(SyncState::default);
    let snapshot = use_state(SyncSnapshot::default);
    let is_mounted = use_is_mounted();

    let run: Rc<dyn Fn(bool)> = {
        let machine = machine.clone();
        let snapshot = snapshot.clone();
        let session = session.clone();
        let is_mounted = is_mounted.clone();
        Rc::new(move |forced: bool| {
            for resource in [Resource::Devices, Resource::Zones] {
                let ticket = {
                    let mut machine = machine.borrow_mut();
                    if forced {
                        Some(machine.refresh(resource))
                    } else {
                        machine.poll(resource)
                    }
                };
                let Some(ticket) = ticket else { continue };

                let machine = machine.clone();
                let snapshot = snapshot.clone();
                let session = session.clone();
                let is_mounted = is_mounted.clone();
                spawn_local(async move {
                    let result = match resource {
                        Resource::Devices => req::devices().await.map(Fetched::Devices),
                        Resource::Zones => req::zones().await.map(Fetched::Zones),
                    }
                    .map_err(|err| err.to_string());

                    // the dashboard may be gone by the time this resolves
                    if !is_mounted() {
                        return;
                    }

                    let failed = result.is_err();
                    let applied = machine.borrow_mut().complete(ticket, result);
                    if applied {
                        snapshot.set(machine.borrow().snapshot());
                    }
                    // a 401 eviction only touches durable storage; mirror it
                    // into the in-memory session so the route guard reacts
                    if failed && session.token.is_some() && session::browser().token().is_none() {
                        session.dispatch(SessionAction::TokenEvicted);
                    }
                });
            }
        })
    };

    {
        let run = run.clone();
        use_mount(move || run(false));
    }
    {
        let run = run.clone();
        use_interval(move || run(false), POLL_INTERVAL_MS);
    }
    {
        let run = run.clone();
        use_event_with_window("focus", move |_: web_sys::FocusEvent| run(false));
    }

    let refresh = {
        let run = run.clone();
        Callback::from(move |_| run(true))
    };

    FarmSync {
        snapshot: (*snapshot).clone(),
        refresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceType, SensorReadings};
    use chrono::Utc;

    fn device(deveui: &str, zone: Option<i64>) -> Device {
        Device {
            deveui: deveui.to_owned(),
            name: format!("device {deveui}"),
            type_id: DeviceType::KiwiSensor,
            last_seen: Utc::now(),
            latest_data: SensorReadings::default(),
            current_state: None,
            target_state: None,
            irrigation_zone_id: zone,
        }
    }

    fn zone(id: i64, device_count: i64) -> IrrigationZone {
        IrrigationZone {
            id,
            name: format!("zone {id}"),
            device_count,
            created_at: "2026-08-01 00:00:00".to_owned(),
            updated_at: "2026-08-01 00:00:00".to_owned(),
            schedule: None,
        }
    }

    #[test]
    fn polls_are_deduplicated_while_in_flight() {
        let mut state = SyncState::default();
        let ticket = state.poll(Resource::Devices).unwrap();
        assert_eq!(state.poll(Resource::Devices), None);
        // the other resource is independent
        assert!(state.poll(Resource::Zones).is_some());

        assert!(state.complete(ticket, Ok(Fetched::Devices(vec![]))));
        assert!(state.poll(Resource::Devices).is_some());
    }

    #[test]
    fn most_recently_issued_fetch_wins() {
        let mut state = SyncState::default();
        let older = state.refresh(Resource::Devices);
        let newer = state.refresh(Resource::Devices);

        assert!(state.complete(newer, Ok(Fetched::Devices(vec![device("AA", None)]))));
        // the superseded response resolves late and must be discarded
        assert!(!state.complete(older, Ok(Fetched::Devices(vec![device("BB", None)]))));

        let snapshot = state.snapshot();
        let devices = snapshot.devices.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].deveui, "AA");
    }

    #[test]
    fn failed_poll_keeps_snapshot_and_sets_error() {
        let mut state = SyncState::default();
        let ticket = state.poll(Resource::Devices).unwrap();
        state.complete(ticket, Ok(Fetched::Devices(vec![device("AA", None)])));

        let ticket = state.poll(Resource::Devices).unwrap();
        state.complete(ticket, Err("connection refused".to_owned()));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("connection refused"));
        assert!(snapshot.devices.is_some(), "stale data must stay readable");
        assert!(!snapshot.is_initial());

        // next successful poll clears the flag and updates the data
        let ticket = state.poll(Resource::Devices).unwrap();
        state.complete(
            ticket,
            Ok(Fetched::Devices(vec![device("AA", None), device("BB", None)])),
        );
        let snapshot = state.snapshot();
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.devices.unwrap().len(), 2);
    }

    #[test]
    fn never_loaded_is_distinguishable_from_stale() {
        let mut state = SyncState::default();
        assert!(state.snapshot().is_initial());

        let ticket = state.poll(Resource::Zones).unwrap();
        state.complete(ticket, Err("timeout".to_owned()));
        let snapshot = state.snapshot();
        assert!(!snapshot.is_initial());
        assert!(snapshot.zones.is_none());
    }

    #[test]
    fn grouping_follows_device_list_order() {
        let devices = [
            device("AA", Some(1)),
            device("BB", None),
            device("CC", Some(1)),
            device("DD", Some(2)),
        ];
        let zones = [zone(1, 2), zone(2, 1)];

        let view = group_by_zone(&devices, &zones);
        let members: Vec<_> = view.by_zone[&1].iter().map(|d| d.deveui.as_str()).collect();
        assert_eq!(members, ["AA", "CC"]);
        assert_eq!(view.by_zone[&2].len(), 1);
        assert_eq!(view.unassigned.len(), 1);
        assert_eq!(view.unassigned[0].deveui, "BB");

        // pure and idempotent
        assert_eq!(view, group_by_zone(&devices, &zones));
    }

    #[test]
    fn unassigning_last_device_moves_it_out_of_the_zone() {
        let mut state = SyncState::default();
        let t = state.refresh(Resource::Devices);
        state.complete(t, Ok(Fetched::Devices(vec![device("AA", Some(1))])));
        let t = state.refresh(Resource::Zones);
        state.complete(t, Ok(Fetched::Zones(vec![zone(1, 1)])));
        assert_eq!(state.snapshot().grouping.by_zone[&1].len(), 1);

        // post-mutation refresh: device unassigned, count decremented
        let t = state.refresh(Resource::Devices);
        state.complete(t, Ok(Fetched::Devices(vec![device("AA", None)])));
        let t = state.refresh(Resource::Zones);
        state.complete(t, Ok(Fetched::Zones(vec![zone(1, 0)])));

        let snapshot = state.snapshot();
        assert!(snapshot.grouping.by_zone[&1].is_empty());
        assert_eq!(snapshot.grouping.unassigned.len(), 1);
        assert_eq!(snapshot.zones.unwrap()[0].device_count, 0);
    }

    #[test]
    fn deleting_a_zone_unassigns_its_members() {
        let mut state = SyncState::default();
        let t = state.refresh(Resource::Devices);
        state.complete(
            t,
            Ok(Fetched::Devices(vec![
                device("AA", Some(1)),
                device("BB", Some(1)),
            ])),
        );
        let t = state.refresh(Resource::Zones);
        state.complete(t, Ok(Fetched::Zones(vec![zone(1, 2)])));

        // zone list refreshes first; members still carry the dangling id
        let t = state.refresh(Resource::Zones);
        state.complete(t, Ok(Fetched::Zones(vec![])));
        let snapshot = state.snapshot();
        assert!(snapshot.grouping.by_zone.is_empty());
        assert_eq!(snapshot.grouping.unassigned.len(), 2);

        // device list catches up with nulled assignments
        let t = state.refresh(Resource::Devices);
        state.complete(
            t,
            Ok(Fetched::Devices(vec![device("AA", None), device("BB", None)])),
        );
        assert_eq!(state.snapshot().grouping.unassigned.len(), 2);
    }
}
