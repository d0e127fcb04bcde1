use billing_service::config::BillingConfig;
use billing_service::services::TaxBasis;
use billing_service::startup::Application;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_tax_basis(TaxBasis::BeforeInvoiceDiscount).await
    }

    pub async fn spawn_with_tax_basis(tax_basis: TaxBasis) -> Self {
        let mut config = BillingConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.billing.tax_basis = tax_basis;
        config.billing.default_tax_rate = Decimal::from(18);
        config.billing.currency = "INR".to_string();
        config.billing.invoice_prefix = "INV".to_string();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Read a money field serialized as a decimal string.
pub fn money(value: &Value) -> Decimal {
    let raw = value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {}", value));
    Decimal::from_str(raw).expect("valid decimal")
}
