/// Monthly price of a subscription. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct SubscriptionCost(i64);

impl SubscriptionCost {
    pub fn parse(cost: i64) -> Result<SubscriptionCost, String> {
        if cost <= 0 {
            return Err(format!("cost must be > 0, got {}", cost));
        }

        Ok(Self(cost))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
