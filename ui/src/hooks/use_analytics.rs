use futures::future::try_join;
use payloads::responses;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, use_api};

#[hook]
pub fn use_dashboard_stats() -> ApiHandle<responses::DashboardStats> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().dashboard_stats().await
    })
}

#[hook]
pub fn use_recent_activity(limit: u32) -> ApiHandle<Vec<responses::ActivityItem>> {
    use_api(limit, ApiOptions::default(), |limit| async move {
        get_api_client().recent_activity(limit).await
    })
}

#[hook]
pub fn use_exercise_analytics(
    days: u32,
) -> ApiHandle<responses::ExerciseAnalytics> {
    use_api(days, ApiOptions::default(), |days| async move {
        get_api_client().exercise_analytics(days).await
    })
}

#[hook]
pub fn use_appointment_analytics(
    days: u32,
) -> ApiHandle<responses::AppointmentAnalytics> {
    use_api(days, ApiOptions::default(), |days| async move {
        get_api_client().appointment_analytics(days).await
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub stats: responses::DashboardStats,
    pub activity: Vec<responses::ActivityItem>,
}

/// Stats and recent activity fetched together; either failing fails both.
#[hook]
pub fn use_dashboard_data(activity_limit: u32) -> ApiHandle<DashboardData> {
    use_api(activity_limit, ApiOptions::default(), |limit| async move {
        let client = get_api_client();
        let (stats, activity) =
            try_join(client.dashboard_stats(), client.recent_activity(limit))
                .await?;
        Ok::<_, payloads::ClientError>(DashboardData { stats, activity })
    })
}
