use log::info;

use crate::models::core::{Id, SuccessResponse};
use crate::models::notification::{
    Notification, NotificationFeed, SendNotificationRequest, SendNotificationResponse, UnreadCount,
};
use crate::{Credentials, Gateway, Result};

impl Gateway {
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_notification_by_id(
        &self,
        credentials: &Credentials,
        notification_id: Id,
    ) -> Result<Notification> {
        self.get(credentials, &format!("/v1/notification/{notification_id}"), &[])
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn send_notification(
        &self,
        credentials: &Credentials,
        request: &SendNotificationRequest,
    ) -> Result<SendNotificationResponse> {
        let response: SendNotificationResponse = self
            .post(credentials, "/v1/notification/send", request)
            .await?;
        info!(
            "Sent '{}' notification {} to user {}",
            request.notification_type, response.notification_id, request.user_id
        );
        Ok(response)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn read_notification(
        &self,
        credentials: &Credentials,
        notification_id: Id,
    ) -> Result<SuccessResponse> {
        let response: Option<SuccessResponse> = self
            .put::<_, ()>(
                credentials,
                &format!("/v1/notification/{notification_id}/read"),
                None,
            )
            .await?;
        Ok(response.unwrap_or_default())
    }

    /// Only the recipient may remove a notification
    #[allow(clippy::missing_errors_doc)]
    pub async fn remove_notification(
        &self,
        credentials: &Credentials,
        notification_id: Id,
    ) -> Result<SuccessResponse> {
        let response: Option<SuccessResponse> = self
            .delete(credentials, &format!("/v1/notification/{notification_id}"))
            .await?;
        info!("Removed notification {notification_id}");
        Ok(response.unwrap_or_default())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn read_all_notifications(
        &self,
        credentials: &Credentials,
        user_id: Id,
    ) -> Result<SuccessResponse> {
        let response: Option<SuccessResponse> = self
            .put::<_, ()>(
                credentials,
                &format!("/v1/notification/read-all/{user_id}"),
                None,
            )
            .await?;
        Ok(response.unwrap_or_default())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_unread_count(&self, credentials: &Credentials, user_id: Id) -> Result<i64> {
        let unread: UnreadCount = self
            .get(
                credentials,
                &format!("/v1/notification/unread-count/{user_id}"),
                &[],
            )
            .await?;
        Ok(unread.count)
    }

    /// Page and limit are only sent when positive
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_notification_feed(
        &self,
        credentials: &Credentials,
        user_id: Id,
        page: i32,
        limit: i32,
    ) -> Result<NotificationFeed> {
        let mut query = Vec::new();
        if page > 0 {
            query.push(("page", page.to_string()));
        }
        if limit > 0 {
            query.push(("limit", limit.to_string()));
        }
        self.get(credentials, &format!("/v1/notification/feed/{user_id}"), &query)
            .await
    }
}
