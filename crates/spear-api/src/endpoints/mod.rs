// Odin API endpoint collaborators
//
// Thin parameter marshaling over the dispatcher, one file per resource.
// Each file adds inherent methods to `Dispatcher`; none of them retry or
// interpret errors, that is left to the caller.

pub mod auto_attendants;
pub mod call_centers;
pub mod groups;
pub mod hunt_groups;
pub mod session;
pub mod users;

/// Query pair for the two identifiers nearly every group endpoint needs.
pub(crate) fn group_params(
    service_provider_id: &str,
    group_id: &str,
) -> [(&'static str, String); 2] {
    [
        ("serviceProviderId", service_provider_id.to_owned()),
        ("groupId", group_id.to_owned()),
    ]
}
