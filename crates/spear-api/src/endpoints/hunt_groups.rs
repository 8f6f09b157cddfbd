// Hunt group endpoints

use crate::dispatcher::Dispatcher;
use crate::endpoints::group_params;
use crate::error::Error;
use crate::models::{ServiceInstanceDetail, ServiceInstanceSummary};

impl Dispatcher {
    /// `GET /groups/hunt-groups?serviceProviderId=..&groupId=..`
    pub async fn get_group_hunt_groups(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Vec<ServiceInstanceSummary>, Error> {
        self.get(
            "/groups/hunt-groups",
            &group_params(service_provider_id, group_id),
        )
        .await
    }

    /// `GET /groups/hunt-groups?serviceUserId=..`
    pub async fn get_group_hunt_group(
        &self,
        service_user_id: &str,
    ) -> Result<ServiceInstanceDetail, Error> {
        self.get(
            "/groups/hunt-groups",
            &[("serviceUserId", service_user_id.to_owned())],
        )
        .await
    }
}
