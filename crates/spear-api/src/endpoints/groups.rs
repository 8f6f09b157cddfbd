// Group endpoints
//
// The one resource exposed with its full GET/POST/PUT/DELETE surface.

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::dispatcher::Dispatcher;
use crate::endpoints::group_params;
use crate::error::Error;
use crate::models::{Group, GroupCreate};

impl Dispatcher {
    /// List the groups of a service provider.
    ///
    /// `GET /groups?serviceProviderId=..`
    pub async fn get_groups(&self, service_provider_id: &str) -> Result<Vec<Group>, Error> {
        self.get(
            "/groups",
            &[("serviceProviderId", service_provider_id.to_owned())],
        )
        .await
    }

    /// Settings of a single group.
    ///
    /// `GET /groups?serviceProviderId=..&groupId=..`
    pub async fn get_group(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Group, Error> {
        self.get("/groups", &group_params(service_provider_id, group_id))
            .await
    }

    /// Create a group.
    ///
    /// `POST /groups`
    pub async fn post_group(&self, group: &GroupCreate) -> Result<Group, Error> {
        self.post("/groups", group).await
    }

    /// Update a group. `updates` is merged over the identifying fields.
    ///
    /// `PUT /groups`
    pub async fn put_group(
        &self,
        service_provider_id: &str,
        group_id: &str,
        updates: &Map<String, Value>,
    ) -> Result<Group, Error> {
        let mut body = Map::new();
        body.insert("serviceProviderId".into(), json!(service_provider_id));
        body.insert("groupId".into(), json!(group_id));
        body.extend(updates.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.put("/groups", &body).await
    }

    /// Delete a group with all its users, services and numbers.
    ///
    /// `DELETE /groups` (identifiers in the body)
    pub async fn delete_group(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Group, Error> {
        warn!(service_provider_id, group_id, "deleting group");
        let body = json!({
            "serviceProviderId": service_provider_id,
            "groupId": group_id,
        });
        self.delete_with_body("/groups", &body).await
    }
}
