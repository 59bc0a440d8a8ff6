//! # Coupon Endpoints
//!
//! Eligibility is decided entirely by the backend. The client only sends
//! the code with the current order total and uses the discount it gets back.

use tracing::{debug, info, warn};

use tally_core::validation::validate_coupon_code;
use tally_core::{AppliedCoupon, Money};

use crate::client::ApiClient;
use crate::dto::{CouponValidation, ValidateCouponRequest};
use crate::error::{ApiClientError, ApiResult};

const INVALID_DISCOUNT_MESSAGE: &str = "Coupon returned an invalid discount";

#[derive(Debug, Clone)]
pub struct CouponsApi {
    client: ApiClient,
}

impl CouponsApi {
    pub fn new(client: ApiClient) -> Self {
        CouponsApi { client }
    }

    /// Validates `code` against `order_total`.
    ///
    /// A `valid: false` answer is reported as a rejection carrying the
    /// backend's message, the same as an error status. So is a negative
    /// discount. A missing discount applies as $0.00.
    pub async fn validate(&self, code: &str, order_total: Money) -> ApiResult<AppliedCoupon> {
        let code = validate_coupon_code(code)?;

        debug!(code = %code, order_total = %order_total, "Validating coupon");

        let request = ValidateCouponRequest {
            code: code.clone(),
            order_total,
        };
        let validation: CouponValidation = self.client.post("coupons/validate", &request).await?;

        if !validation.valid {
            return Err(ApiClientError::Rejected {
                status: 200,
                message: validation
                    .message
                    .unwrap_or_else(|| "Coupon is not valid".to_string()),
            });
        }

        let discount = match validation.discount_amount {
            Some(amount) if amount.is_negative() => {
                warn!(code = %code, discount = %amount, "Coupon returned a negative discount");
                return Err(ApiClientError::Rejected {
                    status: 200,
                    message: INVALID_DISCOUNT_MESSAGE.to_string(),
                });
            }
            Some(amount) => amount,
            None => {
                warn!(code = %code, "Coupon response has no discount_amount, applying $0.00");
                Money::zero()
            }
        };

        info!(code = %code, discount = %discount, "Coupon accepted");

        Ok(AppliedCoupon {
            code: validation.code.unwrap_or(code),
            discount,
        })
    }
}
