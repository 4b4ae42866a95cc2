use secrecy::SecretString;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::LazyLock;
use uuid::Uuid;
use wiremock::MockServer;

use payment_gateway::{
    configuration::{DatabaseSettings, get_configuration},
    startup::{Application, get_connection_pool},
    telemetry::{get_subscriber, init_subscriber},
};

// ensure the `tracing` task is only initialized once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// A merchant seeded into the test database, with its api key ready to use
/// as the `Authorization` header value (spec.md §3: the key *is* the lookup,
/// there's no separate credential).
pub struct TestMerchant {
    pub id: Uuid,
    pub api_key: Uuid,
}

impl TestMerchant {
    async fn store(pool: &PgPool) -> Self {
        let id = Uuid::new_v4();
        let api_key = Uuid::new_v4();

        sqlx::query!(
            "INSERT INTO merchants (id, apikey, active) VALUES ($1, $2, true)",
            id,
            api_key,
        )
        .execute(pool)
        .await
        .expect("Failed to store test merchant.");

        Self { id, api_key }
    }
}

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub merchant: TestMerchant,
    pub acquirer: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn create_payment(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/payments", &self.address))
            .header("Authorization", self.merchant.api_key.to_string())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_payment_with_key(
        &self,
        body: &serde_json::Value,
        idempotency_key: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/payments", &self.address))
            .header("Authorization", self.merchant.api_key.to_string())
            .header("X-Idempotency-Key", idempotency_key)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_payment_unauthenticated(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/payments", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_payment(&self, id: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/payments/{}", &self.address, id))
            .header("Authorization", self.merchant.api_key.to_string())
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn health_check(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// A full card-purchase request body, valid by construction. Tests mutate
/// fields off this baseline to hit the specific boundary being exercised.
pub fn valid_payment_body() -> serde_json::Value {
    serde_json::json!({
        "amount": 1000,
        "currency": "USD",
        "reference": "order-001",
        "credit_card": {
            "first_name": "John",
            "last_name": "Doe",
            "number": "4485040371536584",
            "cvv": "123",
            "expiry_month": "10",
            "expiry_year": "2222",
        }
    })
}

pub fn approved_acquirer_response() -> serde_json::Value {
    serde_json::json!({
        "code": "00",
        "message": "approved",
        "status": "approved",
        "source": {
            "bin": "44850",
            "card_type": "credit_card",
            "expiry_month": "10",
            "expiry_year": "2222",
            "first_name": "John",
            "last_name": "Doe",
            "number": "6584",
        }
    })
}

pub fn declined_acquirer_response() -> serde_json::Value {
    serde_json::json!({
        "code": "05",
        "message": "insufficient funds",
        "status": "failed",
        "source": {
            "bin": "40240",
            "card_type": "credit_card",
            "expiry_month": "10",
            "expiry_year": "2222",
            "first_name": "John",
            "last_name": "Doe",
            "number": "5015",
        }
    })
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let acquirer = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.application.port = 0;
        c.acquirer.base_url = acquirer.uri();
        c.acquirer.api_key = SecretString::new("test-acquirer-key".into());
        c
    };

    configure_database(&configuration.database).await;

    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application.");

    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let db_pool = get_connection_pool(&configuration.database);
    let merchant = TestMerchant::store(&db_pool).await;

    TestApp {
        address: format!("http://localhost:{application_port}"),
        db_pool,
        merchant,
        acquirer,
        api_client: client,
    }
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let maintenance_settings = DatabaseSettings {
        database_name: "postgres".to_string(),
        username: "postgres".to_string(),
        password: SecretString::new("password".into()),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");

    connection_pool
}
