use once_cell::sync::Lazy;
use reqwest::Response;
use serde_json::Value;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use subs_tracker::{
    config::{get_configuration, DatabaseSettings},
    startup::{get_connection_db_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};

// The global subscriber can only be installed once per test binary.
static TRACING: Lazy<()> = Lazy::new(|| {
    let name = String::from("test");
    let env_filter = String::from("debug");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, env_filter, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init subscriber.");
    } else {
        let subscriber = get_subscriber(name, env_filter, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init subscriber.");
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

        // Port 0 asks the OS for any free port, so tests can run in parallel.
        config.set_app_port(0);

        let db_pool = configure_db(&mut config.database, db_test_name).await;

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            db_pool,
            api_client: reqwest::Client::new(),
        }
    }

    pub async fn post_subscription(&self, body: &Value) -> Response {
        self.api_client
            .post(format!("{}/api/v1/subscriptions", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Posts `body` and returns the stored record, failing the test on any non-201.
    pub async fn create_subscription(&self, body: Value) -> Value {
        let response = self.post_subscription(&body).await;

        assert_eq!(201, response.status().as_u16(), "payload: {}", body);

        response.json().await.expect("Invalid JSON response.")
    }

    pub async fn list_subscriptions(&self, query: &[(&str, &str)]) -> Response {
        self.api_client
            .get(format!("{}/api/v1/subscriptions", self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_cost(&self, query: &[(&str, &str)]) -> Response {
        self.api_client
            .get(format!("{}/api/v1/subscriptions/cost", self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscription(&self, id: &str) -> Response {
        self.api_client
            .get(format!("{}/api/v1/subscriptions/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_subscription(&self, id: &str, body: &Value) -> Response {
        self.api_client
            .put(format!("{}/api/v1/subscriptions/{}", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_subscription(&self, id: &str) -> Response {
        self.api_client
            .delete(format!("{}/api/v1/subscriptions/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    let mut connection = PgConnection::connect_with(&db_config.get_db_options_without_name())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
