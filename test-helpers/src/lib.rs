pub mod mock;
pub mod stub;
pub mod telemetry;

use std::sync::Mutex;

use actix_web::web;
use jiff::civil::{Date, Time};
use payloads::{
    AppointmentType, ConversationId, Difficulty, PlanStatus, Role, UserId,
    requests, responses,
};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use stub::store::today;
use stub::store::{LoginReply, NewPlan, NewPlanItem, lock};
use stub::{Config, SharedStore, Store};

pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    /// Shares its auth token with every clone; use [`TestApp::new_client`]
    /// for an independent session.
    pub client: payloads::APIClient,
    pub store: SharedStore,
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    pub fn api_address(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    /// A client for the same backend with no token of its own.
    pub fn new_client(&self) -> payloads::APIClient {
        payloads::APIClient::new(self.api_address(), reqwest::Client::new())
    }

    /// Register Alice (a patient) and leave the app client logged in as her.
    pub async fn create_alice_user(&self) -> anyhow::Result<responses::UserSummary> {
        self.register_and_login(&alice_credentials()).await
    }

    /// Register Bob (a physiotherapist) without touching the current session.
    pub async fn create_bob_user(&self) -> anyhow::Result<responses::UserSummary> {
        self.register(&bob_credentials()).await
    }

    /// Register Carol (a second patient) without touching the current
    /// session.
    pub async fn create_carol_user(&self) -> anyhow::Result<responses::UserSummary> {
        self.register(&carol_credentials()).await
    }

    /// Admins cannot self-register, so the account goes straight into the
    /// store.
    pub fn create_admin_user(&self) -> anyhow::Result<responses::UserSummary> {
        Ok(lock(&self.store).create_account(&admin_credentials())?)
    }

    pub async fn register(
        &self,
        details: &requests::RegisterAccount,
    ) -> anyhow::Result<responses::UserSummary> {
        let response = self.new_client().register(details).await?;
        response
            .user
            .ok_or_else(|| anyhow::anyhow!("registration returned no user"))
    }

    pub async fn register_and_login(
        &self,
        details: &requests::RegisterAccount,
    ) -> anyhow::Result<responses::UserSummary> {
        let user = self.register(details).await?;
        self.login(&details.username).await?;
        Ok(user)
    }

    /// Log the app client in, replacing any previous token.
    pub async fn login(
        &self,
        username: &str,
    ) -> anyhow::Result<responses::UserSummary> {
        self.client.clear_token();
        let response = self.client.login(&login_credentials(username)).await?;
        self.client.set_token(response.token);
        match response.user {
            Some(user) => Ok(user),
            None => Ok(self.client.current_user().await?),
        }
    }

    pub async fn login_alice(&self) -> anyhow::Result<responses::UserSummary> {
        self.login(&alice_credentials().username).await
    }

    pub async fn login_bob(&self) -> anyhow::Result<responses::UserSummary> {
        self.login(&bob_credentials().username).await
    }

    pub async fn login_carol(&self) -> anyhow::Result<responses::UserSummary> {
        self.login(&carol_credentials().username).await
    }

    pub async fn login_admin(&self) -> anyhow::Result<responses::UserSummary> {
        self.login(&admin_credentials().username).await
    }

    /// Make later logins answer with the token only, as older backends do.
    pub fn omit_user_on_login(&self) {
        lock(&self.store).set_login_reply(LoginReply::TokenOnly);
    }

    /// Make later logins answer with a token the backend then rejects.
    pub fn issue_dead_tokens_on_login(&self) {
        lock(&self.store).set_login_reply(LoginReply::DeadToken);
    }

    /// Invalidate every issued token, as a server-side session expiry would.
    pub fn revoke_all_tokens(&self) {
        lock(&self.store).revoke_all_tokens();
    }

    /// Book a one hour appointment starting at `hour` as the current user.
    pub async fn book_appointment(
        &self,
        physiotherapist: UserId,
        date: Date,
        hour: i8,
    ) -> anyhow::Result<responses::Appointment> {
        let details = appointment_details(physiotherapist, date, hour);
        Ok(self.client.create_appointment(&details).await?)
    }

    /// Create two exercises and an active plan scheduling both on today's
    /// weekday.
    pub fn create_test_plan(
        &self,
        patient: &responses::UserSummary,
        physiotherapist: &responses::UserSummary,
    ) -> anyhow::Result<(responses::ExercisePlan, Vec<responses::PlanItem>)> {
        let mut store = lock(&self.store);
        let category = store
            .exercise_categories()
            .first()
            .map(|c| c.id)
            .ok_or_else(|| anyhow::anyhow!("no exercise categories"))?;
        let plan = store.insert_plan(NewPlan {
            name: "Knee rehabilitation".into(),
            patient: patient.id,
            physiotherapist: physiotherapist.id,
            start_date: today(),
            status: PlanStatus::Active,
            goals: "Restore full range of motion".into(),
            frequency_per_week: 3,
        });
        let weekday = today().weekday().to_monday_zero_offset() as u8;

        let mut items = Vec::new();
        for (order, exercise) in [exercise_a(category), exercise_b(category)]
            .iter()
            .enumerate()
        {
            let exercise = store.create_exercise(physiotherapist, exercise)?;
            items.push(store.insert_plan_item(NewPlanItem {
                exercise_plan: plan.id,
                exercise: exercise.id,
                day_of_week: weekday,
                week_number: 1,
                order: order as u32,
            })?);
        }
        Ok((plan, items))
    }

    pub fn start_conversation(&self, participants: &[UserId]) -> ConversationId {
        lock(&self.store).start_conversation(participants.to_vec())
    }

    pub fn push_notification(&self, recipient: UserId, title: &str, message: &str) {
        lock(&self.store).push_notification(
            recipient,
            payloads::NotificationType::System,
            title,
            message,
        );
    }
}

pub fn account(
    username: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
) -> requests::RegisterAccount {
    requests::RegisterAccount {
        username: username.into(),
        email: format!("{username}@example.com"),
        password: TEST_PASSWORD.into(),
        password_confirm: TEST_PASSWORD.into(),
        first_name: first_name.into(),
        last_name: last_name.into(),
        role,
        phone_number: None,
    }
}

pub fn alice_credentials() -> requests::RegisterAccount {
    account("alice", "Alice", "Anderson", Role::Patient)
}

pub fn bob_credentials() -> requests::RegisterAccount {
    account("bob", "Bob", "Brown", Role::Physiotherapist)
}

pub fn carol_credentials() -> requests::RegisterAccount {
    account("carol", "Carol", "Clark", Role::Patient)
}

pub fn admin_credentials() -> requests::RegisterAccount {
    account("admin", "Ada", "Admin", Role::Admin)
}

pub fn login_credentials(username: &str) -> requests::LoginCredentials {
    requests::LoginCredentials {
        username: username.into(),
        password: TEST_PASSWORD.into(),
    }
}

pub fn appointment_details(
    physiotherapist: UserId,
    date: Date,
    hour: i8,
) -> requests::CreateAppointment {
    requests::CreateAppointment {
        physiotherapist,
        patient: None,
        date,
        start_time: Time::constant(hour, 0, 0, 0),
        end_time: Time::constant(hour + 1, 0, 0, 0),
        appointment_type: AppointmentType::Therapy,
        reason: "Knee pain after running".into(),
        symptoms: None,
    }
}

fn exercise_a(
    category: payloads::ExerciseCategoryId,
) -> requests::NewExercise {
    requests::NewExercise {
        name: "Straight Leg Raise".into(),
        description: "Strengthens the quadriceps without bending the knee"
            .into(),
        instructions: "Lie on your back and lift the straight leg slowly"
            .into(),
        category,
        difficulty: Difficulty::Beginner,
        target_body_parts: vec!["knee".into(), "quadriceps".into()],
        duration: 10,
        repetitions: Some(12),
        sets: Some(3),
    }
}

fn exercise_b(
    category: payloads::ExerciseCategoryId,
) -> requests::NewExercise {
    requests::NewExercise {
        name: "Wall Squat".into(),
        description: "Builds strength around the knee joint".into(),
        instructions: "Slide down the wall until the knees are bent".into(),
        category,
        difficulty: Difficulty::Intermediate,
        target_body_parts: vec!["knee".into(), "glutes".into()],
        duration: 15,
        repetitions: Some(10),
        sets: Some(2),
    }
}

pub fn spawn_app_on_port(port: u16) -> TestApp {
    spawn_app_with_config(Config {
        port,
        ..Config::default()
    })
}

/// Start the stub backend with an empty store on a background task.
pub fn spawn_app_with_config(mut config: Config) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let store = web::Data::new(Mutex::new(Store::new()));
    let server = stub::build(&mut config, store.clone())
        .expect("failed to bind the stub backend");
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{}/api", config.port);
    TestApp {
        port: config.port,
        client: payloads::APIClient::new(address, reqwest::Client::new()),
        store,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0)
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        Err(other) => panic!("Expected APIError, got {other:?}"),
        Ok(_) => panic!("Expected APIError, got success"),
    };
}
