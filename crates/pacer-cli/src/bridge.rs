//! Environment bridge between the front end and the library.
//!
//! `to_library` runs exactly once before the command, `reflect` exactly
//! once after a normal return. A raised batch skips reflection entirely:
//! blobs produced by a failed call are considered inconsistent and must not
//! be surfaced.

use pacer_lib::env::LibraryEnvironment;

use crate::front_env::FrontEndEnvironment;

/// Build the per-call library environment.
///
/// Each resource with an override blob present in the front environment is
/// seeded mocked; the rest stay live behind the front end's store.
pub fn to_library(front: &FrontEndEnvironment) -> LibraryEnvironment {
    let mut env = LibraryEnvironment::new(
        front.sink.clone(),
        front.store.clone(),
        front.user.clone(),
        front.groups.clone(),
        front.request_timeout,
    );
    if let Some(cib) = &front.cib_data {
        env = env.mock_cib(cib.clone());
    }
    if let Some(conf) = &front.corosync_conf_data {
        env = env.mock_corosync_conf(conf.clone());
    }
    if let Some(booth) = &front.booth {
        env = env.mock_booth(
            booth.name.clone(),
            booth.config_data.clone(),
            booth.key_data.clone(),
        );
    }
    if let Some(getter) = &front.known_hosts {
        env = env.with_known_hosts(getter.clone());
    }
    env
}

/// Copy final mocked blobs back into the front environment.
///
/// Only called on normal return. Live resources are left untouched: their
/// writes already went through the external accessor during the call.
pub fn reflect(lib: &LibraryEnvironment, front: &mut FrontEndEnvironment) {
    use pacer_lib::resource::ResourceKind;

    if let Some(cib) = lib.final_mocked_content(ResourceKind::Cib) {
        front.cib_data = Some(cib);
    }
    if let Some(conf) = lib.final_mocked_content(ResourceKind::CorosyncConf) {
        front.corosync_conf_data = Some(conf);
    }
    export_ticket_manager_modified(lib, front);
}

/// The ticket-manager auxiliary export.
///
/// Booth is reflected through its own `modified` view instead of the
/// general mocked-resource path; callers that ship the environment over the
/// network sanitize this view separately, so the two paths stay distinct.
pub fn export_ticket_manager_modified(lib: &LibraryEnvironment, front: &mut FrontEndEnvironment) {
    if let Some(booth) = front.booth.as_mut() {
        booth.modified = lib.export_booth_modified();
    }
}
