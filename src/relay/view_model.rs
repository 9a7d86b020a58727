use serde::Serialize;
use serde_json::json;

use crate::event::EventDescriptor;
use crate::portal::{PortalApi, PortalError, UserProfile};

/// Flat field set a message template is rendered against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub api_id: Option<String>,
    pub application_id: Option<String>,
    pub approvals_link: String,
    pub user_link: String,
    /// Only set when the event names an application
    pub application_link: Option<String>,
}

impl ViewModel {
    /// Assemble the fields for `user_id` from the event and the resolved profile.
    pub fn new(
        event: &EventDescriptor,
        user_id: &str,
        profile: UserProfile,
        portal_url: &str,
    ) -> Self {
        let data = event.data.as_ref();
        let api_id = data.and_then(|d| d.api_id.clone());
        let application_id = data.and_then(|d| d.application_id.clone());
        let application_link = application_id
            .as_ref()
            .map(|id| format!("{}/applications/{}", portal_url, id));

        Self {
            user_id: user_id.to_string(),
            name: profile.name,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            api_id,
            application_id,
            approvals_link: format!("{}/admin/approvals", portal_url),
            user_link: format!("{}/users/{}", portal_url, user_id),
            application_link,
        }
    }

    /// Template fields; absent values are JSON `null`.
    pub fn to_fields(&self) -> serde_json::Value {
        json!({
            "userId": self.user_id,
            "name": self.name,
            "email": self.email,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "apiId": self.api_id,
            "applicationId": self.application_id,
            "approvalsLink": self.approvals_link,
            "userLink": self.user_link,
            "applicationLink": self.application_link,
        })
    }
}

/// Resolve the acting user and build the view model.
///
/// Returns `Ok(None)` when the event has no user to notify about; a failed
/// profile lookup is returned as an error.
pub async fn build_view_model(
    portal: &dyn PortalApi,
    event: &EventDescriptor,
    portal_url: &str,
) -> Result<Option<ViewModel>, PortalError> {
    let Some(user_id) = event.user_id() else {
        return Ok(None);
    };

    let profile = portal.get_user(user_id).await?;
    Ok(Some(ViewModel::new(event, user_id, profile, portal_url)))
}
