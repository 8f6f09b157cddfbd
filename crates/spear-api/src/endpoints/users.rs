// User listing endpoint

use crate::dispatcher::Dispatcher;
use crate::endpoints::group_params;
use crate::error::Error;
use crate::models::UserSummary;

impl Dispatcher {
    /// List the users of a group, in the order the API returns them.
    ///
    /// With `extended` set the API includes per-user detail such as
    /// aliases, which the plain listing omits.
    ///
    /// `GET /users?serviceProviderId=..&groupId=..[&extended=true]`
    pub async fn get_users(
        &self,
        service_provider_id: &str,
        group_id: &str,
        extended: bool,
    ) -> Result<Vec<UserSummary>, Error> {
        let mut params = group_params(service_provider_id, group_id).to_vec();
        if extended {
            params.push(("extended", "true".to_owned()));
        }
        self.get("/users", &params).await
    }
}
