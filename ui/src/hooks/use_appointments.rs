use jiff::civil::Date;
use payloads::{
    AppointmentId, AppointmentStatus, ClientError, UserId, requests, responses,
};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, MutationHandle, use_api, use_mutation};

#[hook]
pub fn use_appointments(
    query: requests::AppointmentQuery,
) -> ApiHandle<Vec<responses::Appointment>> {
    use_api(query, ApiOptions::default(), |query| async move {
        get_api_client().list_appointments(&query).await
    })
}

/// The appointment views offered by the list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentFilter {
    #[default]
    All,
    Upcoming,
    Today,
    Status(AppointmentStatus),
}

impl AppointmentFilter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Upcoming => "Upcoming",
            Self::Today => "Today",
            Self::Status(status) => status.label(),
        }
    }
}

/// Appointments for the chosen filter. Switching filters while a request is
/// in flight shows the result for the newest filter only.
#[hook]
pub fn use_filtered_appointments(
    filter: AppointmentFilter,
) -> ApiHandle<Vec<responses::Appointment>> {
    use_api(filter, ApiOptions::default(), |filter| async move {
        let client = get_api_client();
        match filter {
            AppointmentFilter::All => {
                client
                    .list_appointments(&requests::AppointmentQuery::default())
                    .await
            }
            AppointmentFilter::Upcoming => client.upcoming_appointments().await,
            AppointmentFilter::Today => client.todays_appointments().await,
            AppointmentFilter::Status(status) => {
                client
                    .list_appointments(&requests::AppointmentQuery {
                        status: Some(status),
                        ..Default::default()
                    })
                    .await
            }
        }
    })
}

#[hook]
pub fn use_upcoming_appointments() -> ApiHandle<Vec<responses::Appointment>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().upcoming_appointments().await
    })
}

#[hook]
pub fn use_todays_appointments() -> ApiHandle<Vec<responses::Appointment>> {
    use_api((), ApiOptions::default(), |_| async move {
        get_api_client().todays_appointments().await
    })
}

#[hook]
pub fn use_appointment(
    appointment_id: AppointmentId,
) -> ApiHandle<responses::Appointment> {
    use_api(appointment_id, ApiOptions::default(), |id| async move {
        get_api_client().get_appointment(&id).await
    })
}

/// Bookable slots. Waits until both a physiotherapist and a date are chosen.
#[hook]
pub fn use_available_slots(
    physiotherapist: Option<UserId>,
    date: Option<Date>,
) -> ApiHandle<Vec<responses::TimeSlot>> {
    let ready = physiotherapist.is_some() && date.is_some();
    use_api(
        (physiotherapist, date),
        ApiOptions::when(ready),
        |(physiotherapist, date)| async move {
            let (Some(physiotherapist_id), Some(date)) = (physiotherapist, date)
            else {
                return Ok(Vec::new());
            };
            get_api_client()
                .available_time_slots(&requests::TimeSlotQuery {
                    physiotherapist_id,
                    date,
                })
                .await
        },
    )
}

#[hook]
pub fn use_create_appointment() -> MutationHandle<
    requests::CreateAppointment,
    responses::Appointment,
    ClientError,
> {
    use_mutation(|details: requests::CreateAppointment| async move {
        get_api_client().create_appointment(&details).await
    })
}

#[hook]
pub fn use_update_appointment() -> MutationHandle<
    (AppointmentId, requests::UpdateAppointment),
    responses::Appointment,
    ClientError,
> {
    use_mutation(
        |(id, details): (AppointmentId, requests::UpdateAppointment)| async move {
            get_api_client().update_appointment(&id, &details).await
        },
    )
}

#[hook]
pub fn use_cancel_appointment() -> MutationHandle<
    (AppointmentId, Option<String>),
    responses::Appointment,
    ClientError,
> {
    use_mutation(|(id, reason): (AppointmentId, Option<String>)| async move {
        get_api_client()
            .cancel_appointment(&id, &requests::CancelAppointment { reason })
            .await
    })
}

#[hook]
pub fn use_confirm_appointment()
-> MutationHandle<AppointmentId, responses::Appointment, ClientError> {
    use_mutation(|id: AppointmentId| async move {
        get_api_client().confirm_appointment(&id).await
    })
}

#[hook]
pub fn use_complete_appointment()
-> MutationHandle<AppointmentId, responses::Appointment, ClientError> {
    use_mutation(|id: AppointmentId| async move {
        get_api_client().complete_appointment(&id).await
    })
}
