// Auto attendant endpoints
//
// Listing and detail share `/groups/auto-attendants`; the query decides
// which one the API answers with.

use crate::dispatcher::Dispatcher;
use crate::endpoints::group_params;
use crate::error::Error;
use crate::models::{ServiceInstanceDetail, ServiceInstanceSummary};

const PATH: &str = "/groups/auto-attendants";

impl Dispatcher {
    /// List every auto attendant in a group.
    ///
    /// `GET /groups/auto-attendants?serviceProviderId=..&groupId=..`
    pub async fn get_auto_attendants(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Vec<ServiceInstanceSummary>, Error> {
        self.get(PATH, &group_params(service_provider_id, group_id))
            .await
    }

    /// Full profile of one auto attendant, including its aliases.
    ///
    /// `GET /groups/auto-attendants?serviceUserId=..`
    pub async fn get_auto_attendant(
        &self,
        service_user_id: &str,
    ) -> Result<ServiceInstanceDetail, Error> {
        self.get(PATH, &[("serviceUserId", service_user_id.to_owned())])
            .await
    }
}
