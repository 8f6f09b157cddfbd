// Call center endpoints
//
// Basic, standard and premium call centers all come back from the same
// listing; the detail body differs per type but always carries the
// `serviceInstanceProfile` the resolver reads.

use crate::dispatcher::Dispatcher;
use crate::endpoints::group_params;
use crate::error::Error;
use crate::models::{ServiceInstanceDetail, ServiceInstanceSummary};

impl Dispatcher {
    /// List every call center in a group.
    ///
    /// `GET /groups/call-centers?serviceProviderId=..&groupId=..`
    pub async fn get_group_call_centers(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Vec<ServiceInstanceSummary>, Error> {
        self.get(
            "/groups/call-centers",
            &group_params(service_provider_id, group_id),
        )
        .await
    }

    /// Fetch one call center by service user ID.
    ///
    /// `GET /groups/call-centers?serviceUserId=..`
    pub async fn get_group_call_center(
        &self,
        service_user_id: &str,
    ) -> Result<ServiceInstanceDetail, Error> {
        self.get(
            "/groups/call-centers",
            &[("serviceUserId", service_user_id.to_owned())],
        )
        .await
    }
}
