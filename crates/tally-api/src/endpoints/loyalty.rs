//! # Loyalty Endpoints
//!
//! The program config and a customer's balance are fetched separately and
//! combined into the [`LoyaltyAccount`] snapshot checkout works from.

use tracing::{debug, info};

use tally_core::LoyaltyAccount;

use crate::client::ApiClient;
use crate::dto::{CustomerLoyalty, LoyaltyConfig};
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct LoyaltyApi {
    client: ApiClient,
}

impl LoyaltyApi {
    pub fn new(client: ApiClient) -> Self {
        LoyaltyApi { client }
    }

    /// `GET /loyalty/config`
    pub async fn config(&self) -> ApiResult<LoyaltyConfig> {
        self.client.get("loyalty/config").await
    }

    /// `GET /loyalty/customer/:id`
    pub async fn customer(&self, customer_id: i64) -> ApiResult<CustomerLoyalty> {
        self.client
            .get(&format!("loyalty/customer/{}", customer_id))
            .await
    }

    /// Snapshot of `customer_id`'s redeemable balance.
    ///
    /// When the program is disabled the balance is reported as zero points
    /// without asking for the customer record.
    pub async fn account(&self, customer_id: i64) -> ApiResult<LoyaltyAccount> {
        debug!(customer_id, "Loading loyalty account");

        let config = self.config().await?;
        let points = if config.enabled {
            self.customer(customer_id).await?.points
        } else {
            0
        };

        let account = LoyaltyAccount {
            customer_id,
            points,
            point_rate: config.point_rate(),
            min_redeem_points: config.min_redeem_points,
        };

        info!(
            customer_id,
            points = account.points,
            value = %account.balance_value(),
            "Loyalty account loaded"
        );
        Ok(account)
    }
}
